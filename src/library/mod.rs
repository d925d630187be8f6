mod import;
mod library;
mod locator;
mod seed;

pub use import::{FileSelection, SelectedFile, import_files, title_from_file_name};
pub use library::Library;
pub use locator::{AudioLocator, BlobRegistry};
pub use seed::{AssetFetcher, FsFetcher, SeedError, SeedOutcome, seed_if_empty};

static LEGAL_EXTENSION: std::sync::LazyLock<std::collections::HashSet<&'static str>> =
    std::sync::LazyLock::new(|| {
        std::collections::HashSet::from(["mp3", "m4a", "flac", "ogg", "wav"])
    });
