//! Invoice
//!
//! A checkout summary derived from the cart. Invoices are never stored; they
//! are rebuilt each time checkout is viewed.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    io,
};

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rand::Rng;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Serialize;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    books::{BookId, BookRef},
    cart::Cart,
};

/// Flat tax rate applied to every invoice, in percent.
pub const TAX_RATE_PERCENT: i64 = 10;

/// Prefix of every generated order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD";

/// Currency prices are quoted in.
pub const INVOICE_CURRENCY: &Currency = iso::VND;

/// The tax rate as a fraction.
#[must_use]
pub fn tax_rate() -> Percentage {
    Percentage::from(Decimal::new(TAX_RATE_PERCENT, 2))
}

/// Errors that can occur when rendering an invoice.
#[derive(Debug, Error)]
pub enum InvoiceRenderError {
    /// Writing to the output failed.
    #[error("failed to write invoice")]
    Io(#[from] io::Error),
}

/// Human-facing order reference, e.g. `ORD12345678-0042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate an order number from the last eight digits of the
    /// millisecond timestamp and a four digit random suffix.
    pub fn generate(now: Timestamp, rng: &mut impl Rng) -> Self {
        let millis = now.as_millisecond().rem_euclid(100_000_000);
        let suffix: u16 = rng.gen_range(0..10_000);

        Self(format!("{ORDER_NUMBER_PREFIX}{millis:08}-{suffix:04}"))
    }

    /// Borrow the order number text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// One invoice row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    /// Catalog id.
    pub id: BookId,

    /// Title.
    pub name: String,

    /// Author.
    pub author: String,

    /// Unit price, zero when the cached price was unusable.
    pub unit_price: Decimal,

    /// Copies.
    pub quantity: u32,

    /// `unit_price * quantity`.
    pub line_total: Decimal,
}

impl From<&BookRef> for InvoiceLine {
    fn from(book: &BookRef) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            author: book.author.clone(),
            unit_price: book.unit_price(),
            quantity: book.quantity,
            line_total: book.line_total(),
        }
    }
}

/// Checkout summary for the current cart.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    order_number: OrderNumber,
    issued_at: Timestamp,
    lines: Vec<InvoiceLine>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
}

impl Invoice {
    /// Project a cart into an invoice.
    ///
    /// Everything except `order_number` and `issued_at` is a pure function of
    /// the cart.
    #[must_use]
    pub fn build(cart: &Cart, order_number: OrderNumber, issued_at: Timestamp) -> Self {
        let lines: Vec<InvoiceLine> = cart.iter().map(InvoiceLine::from).collect();
        let subtotal = lines
            .iter()
            .map(|line| line.line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let tax = tax_rate() * subtotal;

        Self {
            order_number,
            issued_at,
            lines,
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }

    /// Order reference.
    #[must_use]
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// When the invoice was computed.
    #[must_use]
    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    /// Rows in cart order.
    #[must_use]
    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    /// Whether there is nothing to pay for.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line totals before tax.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Tax on the subtotal.
    #[must_use]
    pub fn tax(&self) -> Decimal {
        self.tax
    }

    /// Amount payable.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Amount payable as money in the invoice currency.
    #[must_use]
    pub fn total_money(&self) -> Money<'static, Currency> {
        money(self.total)
    }

    /// Compare two invoices ignoring the order number and issue time.
    #[must_use]
    pub fn same_totals(&self, other: &Invoice) -> bool {
        self.lines == other.lines
            && self.subtotal == other.subtotal
            && self.tax == other.tax
            && self.total == other.total
    }

    /// Render the invoice as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), InvoiceRenderError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Title", "Author", "Unit Price", "Qty", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                (idx + 1).to_string(),
                line.name.clone(),
                line.author.clone(),
                money(line.unit_price).to_string(),
                line.quantity.to_string(),
                money(line.line_total).to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

        table.with(theme);
        table.modify(Rows::first(), Alignment::center());
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "Order:    {}", self.order_number)?;
        writeln!(out, "Date:     {}", self.issued_at.strftime("%Y-%m-%d %H:%M"))?;
        writeln!(out, "{table}")?;
        writeln!(out, " Subtotal: {}", money(self.subtotal))?;
        writeln!(out, " Tax ({TAX_RATE_PERCENT}%): {}", money(self.tax))?;
        writeln!(out, " Total:    {}", money(self.total))?;

        Ok(())
    }
}

/// An amount in the invoice currency.
#[must_use]
pub fn money(amount: Decimal) -> Money<'static, Currency> {
    Money::from_decimal(amount, INVOICE_CURRENCY)
}
