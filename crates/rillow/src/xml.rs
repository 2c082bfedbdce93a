//! XML reader for web service responses

pub mod model;
pub mod parser;

pub use model::{Content, Document, Element};
pub use parser::{Config, Parser, MAX_DEPTH_CAP};

use crate::error::ParseError;

/// Parse an XML response body with the given limits
pub fn parse(text: &str, config: Config) -> Result<Document, ParseError> {
    Parser::with_config(text.as_bytes(), config).parse()
}
