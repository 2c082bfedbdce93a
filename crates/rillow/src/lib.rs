//! rillow - client for the Zillow real-estate web service
//!
//! Each call builds a request URL, performs one blocking GET and parses the
//! XML response into a tree of mappings, sequences and scalars. The tree is
//! returned as a [`Document`] that can be searched by attribute name
//! without knowing the shape of the response.
//!
//! # Quick Start
//!
//! ```
//! use rillow::from_xml_str;
//! # fn main() -> Result<(), rillow::ParseError> {
//! let doc = from_xml_str(
//!     r#"<searchresults>
//!          <response><results>
//!            <result><zpid>111</zpid></result>
//!            <result><zpid>222</zpid></result>
//!          </results></response>
//!        </searchresults>"#,
//! )?;
//! assert_eq!(doc.find_text("zpid"), Some("111"));
//! assert!(doc.find_attribute("valuationRange").is_none());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{ConfigError, Error, ErrorKind, OptionError, ParseError, Pos, Result, Span, TransportError};

pub mod cursor;
pub use cursor::Cursor;

pub mod node;
pub use node::{Mapping, Node, Sequence};

pub mod xml;
pub use xml::{Config as ParserConfig, Parser as XmlParser};

pub mod simplify;
pub use simplify::{simplify, EmptyElement, SimplifyOptions};

pub mod document;
pub use document::Document;

pub mod config;
pub use config::{ClientConfig, ResponseConfig};

pub mod query;
pub use query::{
    ChartDuration, ChartOptions, ChildType, DemographicsOptions, MonthlyPaymentOptions, Query,
    RegionChartOptions, RegionChildrenOptions, UnitType,
};

pub mod transport;
pub use transport::{HttpTransport, Transport};

pub mod client;
pub use client::Rillow;

/// Parse a response body with default settings
pub fn from_xml_str(s: &str) -> std::result::Result<Document, ParseError> {
    from_xml_str_with_config(s, &ResponseConfig::default())
}

/// Parse a response body with custom settings
pub fn from_xml_str_with_config(
    s: &str,
    config: &ResponseConfig,
) -> std::result::Result<Document, ParseError> {
    let doc = xml::parse(s, config.parser)?;
    Ok(Document::new(simplify(&doc, &config.simplify)))
}
