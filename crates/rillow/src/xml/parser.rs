//! XML parser implementation

use indexmap::IndexMap;

use crate::cursor::Cursor;
use crate::error::{ErrorKind, ParseError, Pos, Span};
use crate::xml::model::{Content, Document, Element};

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Default maximum element nesting depth
pub const DEFAULT_MAX_DEPTH: u16 = 128;
/// Default maximum body size in bytes (10 MB)
pub const DEFAULT_MAX_SIZE: usize = 10 * 1024 * 1024;
/// Nesting depth no configuration can raise the limit above. Reading,
/// simplifying and searching all recurse once per level.
pub const MAX_DEPTH_CAP: u16 = 512;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Limits applied while reading a response body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means [`MAX_DEPTH_CAP`])
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH, DEFAULT_MAX_SIZE)
    }
}

impl Config {
    /// Create a new config with unlimited size and the largest allowed depth
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }

    /// Depth limit actually enforced, never above [`MAX_DEPTH_CAP`]
    pub const fn depth_limit(self) -> u16 {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_CAP {
            MAX_DEPTH_CAP
        } else {
            self.max_depth
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default limits
    pub const fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::new(DEFAULT_MAX_DEPTH, DEFAULT_MAX_SIZE))
    }

    /// Create a new XML parser with custom limits
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> ParseResult<Document> {
        let size = self.cursor.remaining().len();
        if self.config.max_size != 0 && size > self.config.max_size {
            return Err(ParseError::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                self.cursor.position(),
            ));
        }

        if self.cursor.starts_with(UTF8_BOM) {
            self.cursor.advance_by(UTF8_BOM.len());
        }

        self.skip_misc()?;
        if self.cursor.starts_with(b"<!DOCTYPE") {
            self.skip_doctype()?;
            self.skip_misc()?;
        }
        if self.cursor.is_eof() {
            return Err(ParseError::at(ErrorKind::MissingRoot, self.cursor.position()));
        }

        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(ParseError::at(
                ErrorKind::TrailingContent,
                self.cursor.position(),
            ));
        }

        Ok(Document { root })
    }

    fn parse_element(&mut self) -> ParseResult<Element> {
        self.expect_byte(b'<')?;
        self.enter()?;

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.leave();
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnexpectedEof));
            }

            if self.cursor.starts_with(b"</") {
                let pos = self.cursor.position();
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(ParseError::at(
                        ErrorKind::MismatchedTag {
                            expected: name,
                            found: close_name,
                        },
                        pos,
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                let text = self.read_until(b"]]>")?;
                children.push(Content::CData(text));
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            if let Some(text) = self.parse_text()? {
                children.push(Content::Text(text));
            }
        }

        self.leave();
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_attributes(&mut self) -> ParseResult<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }

            let pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(ParseError::at(ErrorKind::DuplicateAttribute { name }, pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> ParseResult<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(ParseError::with_message(
                    ErrorKind::InvalidToken,
                    Span::at(self.cursor.position()),
                    "expected quoted attribute value",
                ))
            }
        };
        self.cursor.advance();

        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw, pos)?;
                return decode_entities(&text, pos);
            }
            if b == b'<' {
                return Err(self.error_here(ErrorKind::InvalidToken));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn parse_text(&mut self) -> ParseResult<Option<String>> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw, pos)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            decode_entities(&text, pos).map(Some)
        }
    }

    fn parse_name(&mut self) -> ParseResult<String> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            Some(_) => return Err(ParseError::at(ErrorKind::InvalidName, pos)),
            None => return Err(ParseError::at(ErrorKind::UnexpectedEof, pos)),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start), pos)
    }

    /// Skip whitespace, comments and processing instructions outside the root
    fn skip_misc(&mut self) -> ParseResult<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_doctype(&mut self) -> ParseResult<()> {
        // internal subset brackets may contain '>'
        let mut brackets = 0usize;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> ParseResult<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn read_until(&mut self, pattern: &[u8]) -> ParseResult<String> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                let text = bytes_to_string(self.cursor.slice_from(start), pos)?;
                self.cursor.advance_by(pattern.len());
                return Ok(text);
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn expect_byte(&mut self, expected: u8) -> ParseResult<()> {
        if self.cursor.consume(expected) {
            return Ok(());
        }
        let kind = if self.cursor.is_eof() {
            ErrorKind::UnexpectedEof
        } else {
            ErrorKind::InvalidToken
        };
        Err(ParseError::with_message(
            kind,
            Span::at(self.cursor.position()),
            format!("expected '{}'", char::from(expected)),
        ))
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth = self.depth.saturating_add(1);
        let max = self.config.depth_limit();
        if self.depth > max {
            return Err(self.error_here(ErrorKind::MaxDepthExceeded { max }));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn error_here(&self, kind: ErrorKind) -> ParseError {
        ParseError::at(kind, self.cursor.position())
    }
}

fn bytes_to_string(bytes: &[u8], pos: Pos) -> ParseResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| ParseError::at(ErrorKind::InvalidUtf8, pos))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> ParseResult<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        let (before, after) = rest.split_at(amp);
        result.push_str(before);

        let after = after.get(1..).unwrap_or_default();
        let Some(semi) = after.find(';') else {
            return Err(ParseError::at(
                ErrorKind::InvalidEntity {
                    entity: after.chars().take(8).collect(),
                },
                pos,
            ));
        };
        let (entity, tail) = after.split_at(semi);

        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(entity),
        };
        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(ParseError::at(
                    ErrorKind::InvalidEntity {
                        entity: entity.to_string(),
                    },
                    pos,
                ))
            }
        }

        rest = tail.get(1..).unwrap_or_default();
    }
    result.push_str(rest);

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
