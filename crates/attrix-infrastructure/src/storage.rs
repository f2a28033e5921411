//! Shared AsyncDirStorage construction for the directory repositories.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use version_migrate::{
    AppPaths, AsyncDirStorage, DirStorageStrategy, FilenameEncoding, FormatStrategy, Migrator,
    PathStrategy,
};

/// Opens an AsyncDirStorage collection rooted at `base_dir`.
///
/// TOML format, direct filename encoding: one `<key>.toml` file per
/// aggregate under `base_dir/<collection>/`.
pub(crate) async fn open_storage(
    base_dir: impl AsRef<Path>,
    collection: &str,
    migrator: Migrator,
) -> Result<AsyncDirStorage> {
    let base_dir = base_dir.as_ref().to_path_buf();

    // Ensure base directory exists
    fs::create_dir_all(&base_dir)
        .await
        .context("Failed to create storage base directory")?;

    // Setup AppPaths with CustomBase strategy to use our base_dir
    let paths = AppPaths::new("attrix").data_strategy(PathStrategy::CustomBase(base_dir));

    // Setup storage strategy: TOML format, Direct filename encoding
    let strategy = DirStorageStrategy::default()
        .with_format(FormatStrategy::Toml)
        .with_filename_encoding(FilenameEncoding::Direct);

    AsyncDirStorage::new(paths, collection, migrator, strategy)
        .await
        .context("Failed to create AsyncDirStorage")
}

/// Whether a storage error message describes a missing file rather than a
/// real failure.
pub(crate) fn is_not_found_message(message: &str) -> bool {
    message.contains("No such file or directory")
        || message.contains("not found")
        || message.contains("cannot find")
}
