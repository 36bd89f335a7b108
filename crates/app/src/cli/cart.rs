use bookshelf::{books::BookId, cart::Cart, invoice::money};
use bookshelf_app::context::AppContext;
use clap::{Args, Subcommand};
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart contents
    List,

    /// Add a catalog book to the cart
    Add(BookArgs),

    /// Remove a book from the cart
    Remove(BookArgs),

    /// Empty the cart
    Clear,

    /// Show the cart total
    Total,
}

#[derive(Debug, Args)]
struct BookArgs {
    /// Catalog book id
    id: String,
}

pub(crate) async fn run(command: CartCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        CartSubcommand::List => list(ctx).await,
        CartSubcommand::Add(args) => add(&BookId::new(args.id), ctx).await,
        CartSubcommand::Remove(args) => remove(&BookId::new(args.id), ctx).await,
        CartSubcommand::Clear => clear(ctx).await,
        CartSubcommand::Total => total(ctx).await,
    }
}

async fn list(ctx: &AppContext) -> Result<(), String> {
    let cart = ctx
        .carts
        .load()
        .await
        .map_err(|error| format!("failed to load cart: {error}"))?
        .value;

    print_cart(&cart);

    Ok(())
}

async fn add(id: &BookId, ctx: &AppContext) -> Result<(), String> {
    let book = ctx.catalog.get_book(id).await.map_err(|error| {
        if error.is_not_found() {
            format!("book {id} is unavailable")
        } else {
            format!("failed to load book {id}: {error}")
        }
    })?;

    let outcome = ctx
        .carts
        .add(book.to_book_ref())
        .await
        .map_err(|error| format!("{} was not added to the cart: {error}", book.title))?;

    if outcome.added {
        println!("added {} to the cart", book.title);
    } else {
        println!("{} is already in the cart", book.title);
    }

    Ok(())
}

async fn remove(id: &BookId, ctx: &AppContext) -> Result<(), String> {
    let cart = ctx
        .carts
        .remove(id)
        .await
        .map_err(|error| format!("book {id} was not removed: {error}"))?
        .value;

    print_cart(&cart);

    Ok(())
}

async fn clear(ctx: &AppContext) -> Result<(), String> {
    ctx.carts
        .clear()
        .await
        .map_err(|error| format!("cart was not cleared: {error}"))?;

    println!("cart cleared");

    Ok(())
}

async fn total(ctx: &AppContext) -> Result<(), String> {
    let total = ctx
        .carts
        .total()
        .await
        .map_err(|error| format!("failed to load cart: {error}"))?;

    println!("{}", money(total));

    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    let mut builder = Builder::default();

    builder.push_record(["Id", "Title", "Author", "Price"]);

    for book in cart {
        builder.push_record([
            book.id.to_string(),
            book.name.clone(),
            book.author.clone(),
            money(book.unit_price()).to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    println!("{table}");
    println!("total: {}", money(cart.total()));
}
