use bookshelf::books::BookId;
use bookshelf_app::context::AppContext;
use clap::{Args, Subcommand};

use super::books_table;

#[derive(Debug, Args)]
pub(crate) struct FavoritesCommand {
    #[command(subcommand)]
    command: FavoritesSubcommand,
}

#[derive(Debug, Subcommand)]
enum FavoritesSubcommand {
    /// Show favorite books
    List,

    /// Mark or unmark a book as favorite
    Toggle(BookArgs),

    /// Check whether a book is a favorite
    Check(BookArgs),
}

#[derive(Debug, Args)]
struct BookArgs {
    /// Catalog book id
    id: String,
}

pub(crate) async fn run(command: FavoritesCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        FavoritesSubcommand::List => list(ctx).await,
        FavoritesSubcommand::Toggle(args) => toggle(BookId::new(args.id), ctx).await,
        FavoritesSubcommand::Check(args) => check(&BookId::new(args.id), ctx).await,
    }
}

async fn list(ctx: &AppContext) -> Result<(), String> {
    let hydration = ctx
        .favorites
        .hydrate()
        .await
        .map_err(|error| format!("failed to load favorites: {error}"))?;

    if hydration.books.is_empty() && hydration.failed.is_empty() {
        println!("no favorites yet");
        return Ok(());
    }

    if !hydration.books.is_empty() {
        println!("{}", books_table(&hydration.books));
    }

    if hydration.failure_count() > 0 {
        eprintln!(
            "{} favorite(s) could not be loaded: {}",
            hydration.failure_count(),
            hydration
                .failed
                .iter()
                .map(BookId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(())
}

async fn toggle(id: BookId, ctx: &AppContext) -> Result<(), String> {
    let label = id.to_string();

    let toggled = ctx
        .favorites
        .toggle(id)
        .await
        .map_err(|error| format!("favorite for {label} was not updated: {error}"))?;

    if toggled.favorite {
        println!("{label} added to favorites");
    } else {
        println!("{label} removed from favorites");
    }

    Ok(())
}

async fn check(id: &BookId, ctx: &AppContext) -> Result<(), String> {
    let favorite = ctx
        .favorites
        .is_favorite(id)
        .await
        .map_err(|error| format!("failed to read favorites: {error}"))?;

    println!("{}", if favorite { "yes" } else { "no" });

    Ok(())
}
