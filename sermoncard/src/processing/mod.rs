mod extractor;
pub mod extractors;

pub use extractor::{DocumentExtractor, FileExtractor};
