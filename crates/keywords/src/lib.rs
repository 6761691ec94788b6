//! ContentGen keyword extraction
//!
//! Runs the external keyword classifier script and parses its JSON output

mod error;
mod extractor;

pub use error::KeywordError;
pub use extractor::KeywordExtractor;
