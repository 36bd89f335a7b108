//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Local storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the cart and favorites files
    #[arg(long, global = true, env = "BOOKSHELF_DATA_DIR", default_value = ".bookshelf")]
    pub data_dir: PathBuf,
}
