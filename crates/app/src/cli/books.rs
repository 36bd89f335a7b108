use bookshelf::{books::BookId, catalog::search, invoice::money};
use bookshelf_app::context::AppContext;
use clap::{Args, Subcommand};

use super::books_table;

#[derive(Debug, Args)]
pub(crate) struct BooksCommand {
    #[command(subcommand)]
    command: BooksSubcommand,
}

#[derive(Debug, Subcommand)]
enum BooksSubcommand {
    /// List catalog books
    List(ListBooksArgs),

    /// Show a single book
    Show(ShowBookArgs),
}

#[derive(Debug, Args)]
struct ListBooksArgs {
    /// Only show books whose title contains this text
    #[arg(long, short)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct ShowBookArgs {
    /// Catalog book id
    id: String,
}

pub(crate) async fn run(command: BooksCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        BooksSubcommand::List(args) => list(args, ctx).await,
        BooksSubcommand::Show(args) => show(&BookId::new(args.id), ctx).await,
    }
}

async fn list(args: ListBooksArgs, ctx: &AppContext) -> Result<(), String> {
    let books = ctx
        .catalog
        .list_books()
        .await
        .map_err(|error| format!("failed to load books: {error}"))?;

    let found = search(&books, args.search.as_deref().unwrap_or_default());

    if found.is_empty() {
        println!("no books found");
        return Ok(());
    }

    println!("{}", books_table(found));

    Ok(())
}

pub(crate) async fn show(id: &BookId, ctx: &AppContext) -> Result<(), String> {
    let book = ctx.catalog.get_book(id).await.map_err(|error| {
        if error.is_not_found() {
            format!("book {id} is unavailable")
        } else {
            format!("failed to load book {id}: {error}")
        }
    })?;

    let favorite = ctx
        .favorites
        .is_favorite(id)
        .await
        .map_err(|error| format!("failed to read favorites: {error}"))?;

    println!("id: {}", book.id);
    println!("title: {}", book.title);
    println!("author: {}", book.author);
    println!("category: {}", book.category);
    println!("price: {}", money(book.price));
    println!("in_stock: {}", book.stock);
    println!("image: {}", book.image);
    println!("favorite: {}", if favorite { "yes" } else { "no" });

    if let Some(description) = &book.description {
        println!();
        println!("{description}");
    }

    Ok(())
}
