use bookshelf::scan::book_id_from_payload;
use bookshelf_app::context::AppContext;
use clap::Args;

use super::books;

#[derive(Debug, Args)]
pub(crate) struct ScanArgs {
    /// Text decoded from the QR code
    payload: String,
}

pub(crate) async fn run(args: ScanArgs, ctx: &AppContext) -> Result<(), String> {
    let id = book_id_from_payload(&args.payload)
        .ok_or_else(|| "scanned code is not a book code, scan again".to_string())?;

    books::show(&id, ctx)
        .await
        .map_err(|error| format!("{error}, scan again"))
}
