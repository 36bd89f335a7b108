use std::io;

use bookshelf::invoice::money;
use bookshelf_app::{
    context::AppContext,
    domain::invoice::{Checkout, InvoiceError},
};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub(crate) struct InvoiceCommand {
    #[command(subcommand)]
    command: InvoiceSubcommand,
}

#[derive(Debug, Subcommand)]
enum InvoiceSubcommand {
    /// Show the invoice for the current cart
    Show,

    /// Pay for the current cart
    Pay(PayArgs),
}

#[derive(Debug, Args)]
struct PayArgs {
    /// Confirm the payment; without it the invoice is only shown
    #[arg(long)]
    yes: bool,
}

pub(crate) async fn run(command: InvoiceCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        InvoiceSubcommand::Show => show(ctx).await,
        InvoiceSubcommand::Pay(args) => pay(args, ctx).await,
    }
}

async fn show(ctx: &AppContext) -> Result<(), String> {
    let checkout = build(ctx).await?;

    print_invoice(&checkout)
}

async fn pay(args: PayArgs, ctx: &AppContext) -> Result<(), String> {
    let checkout = build(ctx).await?;

    print_invoice(&checkout)?;

    if !args.yes {
        println!();
        println!("re-run with --yes to confirm payment");
        return Ok(());
    }

    let receipt = ctx
        .invoices
        .confirm_payment(&checkout)
        .await
        .map_err(|error| match error {
            InvoiceError::EmptyCart => "cart is empty, nothing to pay".to_string(),
            InvoiceError::StaleInvoice => "cart changed, review the invoice again".to_string(),
            InvoiceError::Cart(source) => format!("payment was not completed: {source}"),
        })?;

    println!();
    println!(
        "payment confirmed for order {}: {}",
        receipt.order_number,
        money(receipt.total)
    );

    Ok(())
}

async fn build(ctx: &AppContext) -> Result<Checkout, String> {
    ctx.invoices
        .build()
        .await
        .map_err(|error| format!("failed to build invoice: {error}"))
}

fn print_invoice(checkout: &Checkout) -> Result<(), String> {
    if checkout.invoice.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    checkout
        .invoice
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print invoice: {error}"))
}
