//! Books

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Stable catalog identifier of a book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Wrap a raw catalog identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BookId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BookId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A price as it appears in cached or remote data.
///
/// Older cache entries store prices as strings, newer ones as numbers. Neither
/// is trusted: [`Price::amount`] coerces anything unusable to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    /// Numeric JSON price.
    Number(Number),

    /// Textual price, e.g. `"120000"` or `"99.50"`.
    Text(String),
}

impl Price {
    /// Build a price from an exact decimal amount.
    #[must_use]
    pub fn from_decimal(amount: Decimal) -> Self {
        Self::Text(amount.normalize().to_string())
    }

    /// The numeric amount, or zero when the value is malformed or negative.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        let parsed = match self {
            Price::Number(number) => parse_amount(&number.to_string()),
            Price::Text(text) => parse_amount(text),
        };

        parsed
            .filter(|amount| !amount.is_sign_negative())
            .unwrap_or(Decimal::ZERO)
    }

    /// Interpret a loosely typed JSON value as a price.
    ///
    /// Accepts numbers, strings and the `{"$numberDecimal": "..."}` wrapper
    /// emitted by the catalog service. Anything else is treated as absent.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(Self::Number(number.clone())),
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Object(fields) => fields.get("$numberDecimal").and_then(Self::from_json),
            Value::Null | Value::Bool(_) | Value::Array(_) => None,
        }
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::from_decimal(amount)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self::Number(Number::from(amount))
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Optional price amount, zero when absent.
pub(crate) fn amount_of(price: Option<&Price>) -> Decimal {
    price.map_or(Decimal::ZERO, Price::amount)
}

/// A denormalized snapshot of a catalog book, captured when it was added to
/// the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRef {
    /// Catalog identifier, unique within a cart.
    pub id: BookId,

    /// Display title at add time.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,

    /// Author name at add time.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub author: String,

    /// Price at add time.
    #[serde(
        default,
        deserialize_with = "deserialize_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Price>,

    /// Cover image URL. Older entries may hold a list of URLs; the first
    /// usable one is kept.
    #[serde(
        default,
        deserialize_with = "deserialize_image",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,

    /// Number of copies, always at least one.
    #[serde(
        default = "default_quantity",
        deserialize_with = "deserialize_quantity"
    )]
    pub quantity: u32,
}

impl BookRef {
    /// Create a reference with a quantity of one.
    pub fn new(
        id: impl Into<BookId>,
        name: impl Into<String>,
        author: impl Into<String>,
        price: Option<Price>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author: author.into(),
            price,
            image,
            quantity: 1,
        }
    }

    /// Unit price, zero when missing or malformed.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        amount_of(self.price.as_ref())
    }

    /// Unit price multiplied by quantity, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price()
            .saturating_mul(Decimal::from(self.quantity))
    }
}

const fn default_quantity() -> u32 {
    1
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(Price::from_json(&value))
}

// Numbers are rendered as text; null and other shapes read as empty.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let text = match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => String::new(),
    };

    Ok(text)
}

fn deserialize_image<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let image = match value {
        Value::String(url) => usable_url(&url),
        Value::Array(urls) => urls
            .iter()
            .filter_map(Value::as_str)
            .find_map(usable_url),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Object(_) => None,
    };

    Ok(image)
}

fn usable_url(url: &str) -> Option<String> {
    let url = url.trim();

    (!url.is_empty() && url != "null").then(|| url.to_string())
}

// Positive integers and numeric strings are copies; anything else is a single
// copy.
fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    let count = match &value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };

    let quantity = count
        .filter(|count| *count > 0)
        .map_or(1, |count| u32::try_from(count).unwrap_or(u32::MAX));

    Ok(quantity)
}
