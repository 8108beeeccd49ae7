//! Relaxed JSON ("simplified JSON") reader used by project and plugin descriptors.
//!
//! The dialect is a superset of JSON:
//!
//! ```text
//! // comments, /* block comments */
//! name = "my_plugin"            // `=` or `:` between key and value
//! version: "1.0.0"
//! extensions = {
//!     resources = [
//!         { path = "assets/foo" }   // commas are optional
//!     ]
//! }
//! script = """raw text, no escapes"""
//! ```
//!
//! The braces around the root object are optional. Everything is returned as
//! a [`serde_json::Value`] so callers never depend on parser details.

use crate::error::ParseError;
use camino::Utf8Path;
use serde_json::{Map, Number, Value};

/// Parse a relaxed JSON document.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(input);
    parser.skip_trivia()?;

    let value = if parser.peek() == Some(b'{') {
        parser.bump();
        let object = parser.parse_members(Some(b'}'))?;
        parser.skip_trivia()?;
        if parser.peek().is_some() {
            return Err(parser.error("unexpected content after root object"));
        }
        object
    } else {
        parser.parse_members(None)?
    };

    Ok(value)
}

/// Read and parse a file, attaching the path to any error.
pub fn parse_file(path: &Utf8Path) -> Result<Value, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|source| ParseError::File {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Deepest nesting of objects and arrays accepted below the root.
pub const MAX_DEPTH: usize = 128;

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn starts_with(&self, pattern: &str) -> bool {
        self.bytes[self.pos..].starts_with(pattern.as_bytes())
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let consumed = &self.src[..self.pos.min(self.src.len())];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map_or(0, |tail| tail.chars().count())
            + 1;
        ParseError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Skip whitespace, commas and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | b',') => self.bump(),
                Some(b'/') if self.peek_at(1) == Some(b'/') => self.skip_line(),
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        if self.peek().is_none() {
                            self.pos = start;
                            return Err(self.error("unterminated block comment"));
                        }
                        if self.starts_with("*/") {
                            self.pos += 2;
                            break;
                        }
                        self.bump();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.bump();
        }
    }

    /// Members until `end` (consumed) or end of input when `end` is `None`.
    fn parse_members(&mut self, end: Option<u8>) -> Result<Value, ParseError> {
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            match (self.peek(), end) {
                (None, None) => break,
                (None, Some(_)) => return Err(self.error("unterminated object")),
                (Some(b), Some(close)) if b == close => {
                    self.bump();
                    break;
                }
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_inline_space();
            match self.peek() {
                Some(b'=' | b':') => self.bump(),
                _ => return Err(self.error(format!("expected `=` or `:` after key `{key}`"))),
            }
            self.skip_trivia()?;
            let value = self.parse_value()?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn skip_inline_space(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.bump();
        }
    }

    fn parse_key(&mut self) -> Result<String, ParseError> {
        if self.peek() == Some(b'"') {
            return self.parse_string();
        }
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_identifier_byte(b)) {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error("expected a key"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some(b'{') => {
                self.enter()?;
                let object = self.parse_members(Some(b'}'));
                self.depth -= 1;
                object
            }
            Some(b'[') => {
                self.enter()?;
                let array = self.parse_array();
                self.depth -= 1;
                array
            }
            Some(b'"') if self.starts_with("\"\"\"") => self.parse_raw_string().map(Value::String),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b'-' | b'+' | b'0'..=b'9') => self.parse_number(),
            Some(b) if is_identifier_byte(b) => {
                let start = self.pos;
                while matches!(self.peek(), Some(b) if is_identifier_byte(b)) {
                    self.bump();
                }
                match &self.src[start..self.pos] {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    word => {
                        let message = format!("unexpected bare word `{word}`");
                        self.pos = start;
                        Err(self.error(message))
                    }
                }
            }
            Some(_) => Err(self.error("expected a value")),
            None => Err(self.error("unexpected end of input, expected a value")),
        }
    }

    /// Consume an opening bracket, refusing to nest past [`MAX_DEPTH`].
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {MAX_DEPTH} levels")));
        }
        self.depth += 1;
        self.bump();
        Ok(())
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(self.error("unterminated array")),
                Some(b']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                Some(_) => items.push(self.parse_value()?),
            }
        }
    }

    fn parse_raw_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.pos += 3;
        let body = self.pos;
        while self.pos < self.bytes.len() {
            if self.starts_with("\"\"\"") {
                let text = self.src[body..self.pos].to_string();
                self.pos += 3;
                return Ok(text);
            }
            self.bump();
        }
        self.pos = start;
        Err(self.error("unterminated raw string"))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        let mut run = self.pos;
        loop {
            match self.peek() {
                None => {
                    self.pos = start;
                    return Err(self.error("unterminated string"));
                }
                Some(b'"') => {
                    out.push_str(&self.src[run..self.pos]);
                    self.bump();
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.src[run..self.pos]);
                    self.bump();
                    let escaped = match self.peek() {
                        Some(b'"') => '"',
                        Some(b'\\') => '\\',
                        Some(b'/') => '/',
                        Some(b'b') => '\u{0008}',
                        Some(b'f') => '\u{000C}',
                        Some(b'n') => '\n',
                        Some(b'r') => '\r',
                        Some(b't') => '\t',
                        Some(b'u') => {
                            self.bump();
                            let c = self.parse_unicode_escape()?;
                            out.push(c);
                            run = self.pos;
                            continue;
                        }
                        _ => return Err(self.error("invalid escape sequence")),
                    };
                    out.push(escaped);
                    self.bump();
                    run = self.pos;
                }
                Some(_) => self.bump(),
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        let high = self.parse_hex4()?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if !self.starts_with("\\u") {
                return Err(self.error("unpaired surrogate in \\u escape"));
            }
            self.pos += 2;
            let low = self.parse_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error("invalid low surrogate in \\u escape"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.error("invalid \\u escape"))
    }

    fn parse_hex4(&mut self) -> Result<u32, ParseError> {
        let digits = self
            .src
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("truncated \\u escape"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error("invalid \\u escape"));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid \\u escape"))?;
        self.pos += 4;
        Ok(value)
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => {}
                b'.' | b'e' | b'E' => is_float = true,
                b'-' | b'+' if matches!(self.bytes[self.pos - 1], b'e' | b'E') => {}
                _ => break,
            }
            self.bump();
        }

        let text = self.src[start..self.pos].trim_start_matches('+');
        let number = if is_float {
            text.parse::<f64>().ok().and_then(Number::from_f64)
        } else {
            text.parse::<i64>()
                .map(Number::from)
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(Number::from_f64))
        };

        number.map(Value::Number).ok_or_else(|| {
            let message = format!("invalid number `{}`", &self.src[start..self.pos]);
            self.pos = start;
            self.error(message)
        })
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'-')
}
