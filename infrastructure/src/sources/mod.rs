//! Document input and file-backed extraction sources

mod document_loader;
mod file_source;

pub use document_loader::{DocumentLoadError, DocumentLoader};
pub use file_source::FileExtractionSource;
