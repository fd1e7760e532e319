pub mod export;
pub mod snippet;
pub mod stats;
pub mod storage;

pub use export::{ExportFormat, ImportSummary, export_to_file, import_from_file, import_into_store};
pub use snippet::Snippet;
pub use stats::SnippetStats;
pub use storage::SnippetStore;
