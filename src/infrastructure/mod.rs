pub mod document_store;
pub mod text_extractor;

pub use document_store::{DocumentStore, TomlDocumentStore};
pub use text_extractor::{FileTextExtractor, TextExtractor};
