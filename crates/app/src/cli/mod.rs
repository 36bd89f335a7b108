use bookshelf::{catalog::Book, invoice::money};
use bookshelf_app::{config::AppConfig, context::AppContext, observability};
use clap::{Parser, Subcommand};
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

mod books;
mod cart;
mod favorites;
mod invoice;
mod scan;

#[derive(Debug, Parser)]
#[command(name = "bookshelf", about = "Bookshelf store CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Books(books::BooksCommand),

    /// Open the book encoded in a scanned QR payload
    Scan(scan::ScanArgs),

    /// Manage the cart
    Cart(cart::CartCommand),

    /// Manage favorites
    Favorites(favorites::FavoritesCommand),

    /// Check out the cart
    Invoice(invoice::InvoiceCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_logging(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let ctx = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Books(command) => books::run(command, &ctx).await,
            Commands::Scan(args) => scan::run(args, &ctx).await,
            Commands::Cart(command) => cart::run(command, &ctx).await,
            Commands::Favorites(command) => favorites::run(command, &ctx).await,
            Commands::Invoice(command) => invoice::run(command, &ctx).await,
        }
    }
}

/// Render books as a table, one row per book.
pub(crate) fn books_table<'a>(books: impl IntoIterator<Item = &'a Book>) -> Table {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Title", "Author", "Category", "Price"]);

    for book in books {
        builder.push_record([
            book.id.to_string(),
            book.title.clone(),
            book.author.clone(),
            book.category.clone(),
            money(book.price).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());
    table.modify(Columns::new(4..5), Alignment::right());

    table
}
