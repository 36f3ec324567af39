//! Character-level cursor over the source text.
//!
//! There is no token stream. The grammar functions call the scanners here
//! directly, one construct at a time, and every scanner leaves the cursor on
//! the first character it did not consume.

use crate::error::ParseError;
use crate::options::ParseOptions;
use tracing::trace;

/// Sentinel reported as the current character once the input is exhausted.
pub const EOF: char = '\0';

/// Snapshot of the full cursor position, for speculative parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    offset: usize,
    current: char,
    line: u32,
    column: u32,
}

impl CursorState {
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    /// Byte offset of the character after `current`.
    offset: usize,
    current: char,
    line: u32,
    column: u32,
    options: ParseOptions,
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_path_char(c: char) -> bool {
    is_ident_char(c) || c == ':'
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Borrow `source` and position the cursor on its first character.
    /// An embedded NUL ends the input.
    pub fn with_options(source: &'a str, options: ParseOptions) -> Self {
        let source = source.split(EOF).next().unwrap_or_default();
        let mut cursor = Cursor {
            source,
            offset: 0,
            current: EOF,
            line: 1,
            column: 1,
            options,
        };
        if let Some(c) = source.chars().next() {
            cursor.current = c;
            cursor.offset = c.len_utf8();
        }
        cursor
    }

    pub fn current(&self) -> char {
        self.current
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn is_at_end(&self) -> bool {
        self.current == EOF
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Consume the current character. At end of input this is a no-op.
    pub fn advance(&mut self) {
        if self.current == EOF {
            return;
        }
        if self.current == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        match self.source[self.offset..].chars().next() {
            Some(c) => {
                self.current = c;
                self.offset += c.len_utf8();
            }
            None => self.current = EOF,
        }
    }

    /// The character after `current`, without consuming anything.
    pub fn peek(&self) -> char {
        self.source[self.offset..].chars().next().unwrap_or(EOF)
    }

    pub fn save(&self) -> CursorState {
        CursorState {
            offset: self.offset,
            current: self.current,
            line: self.line,
            column: self.column,
        }
    }

    pub fn restore(&mut self, state: CursorState) {
        self.offset = state.offset;
        self.current = state.current;
        self.line = state.line;
        self.column = state.column;
    }

    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            while is_space(self.current) {
                self.advance();
            }
            if self.current == '/' && self.peek() == '/' {
                while self.current != '\n' && self.current != EOF {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Whether the current character can begin an identifier.
    pub fn at_identifier(&self) -> bool {
        is_ident_char(self.current)
    }

    /// Whether the current character can begin a path.
    pub fn at_path(&self) -> bool {
        is_path_char(self.current)
    }

    /// Consume `c` if it is the current character.
    pub fn eat(&mut self, c: char) -> bool {
        if self.current == c {
            self.advance();
            true
        } else {
            false
        }
    }

    // -- Diagnostics --------------------------------------------

    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.line, self.column).truncated(self.options.max_error_len)
    }

    pub fn error_at(&self, state: CursorState, message: impl Into<String>) -> ParseError {
        ParseError::new(message, state.line, state.column).truncated(self.options.max_error_len)
    }

    pub(crate) fn in_context(&self, message: &str, context: &str) -> String {
        if self.options.include_context && !context.is_empty() {
            format!("{} in context: {}", message, context)
        } else {
            message.to_owned()
        }
    }

    // -- Scanners -----------------------------------------------

    fn scan_while(
        &mut self,
        kind: &str,
        context: &str,
        accept: impl Fn(char) -> bool,
    ) -> Result<String, ParseError> {
        let mut token = String::new();
        let mut len = 0usize;
        while self.current != EOF && accept(self.current) {
            if len == self.options.max_token_len {
                let msg = format!("{} length exceeds maximum token size", kind);
                return Err(self.error(self.in_context(&msg, context)));
            }
            token.push(self.current);
            len += 1;
            self.advance();
        }
        Ok(token)
    }

    /// `[A-Za-z0-9_]+`
    pub fn scan_identifier(&mut self, context: &str) -> Result<String, ParseError> {
        self.skip_whitespace_and_comments();
        let ident = self.scan_while("Identifier", context, is_ident_char)?;
        if ident.is_empty() {
            return Err(self.error(self.in_context("Expected identifier", context)));
        }
        trace!(%ident, context, "identifier");
        Ok(ident)
    }

    /// `[A-Za-z0-9_:]+`, e.g. `core::time::Instant`.
    pub fn scan_path(&mut self, context: &str) -> Result<String, ParseError> {
        self.skip_whitespace_and_comments();
        let path = self.scan_while("Path", context, is_path_char)?;
        if path.is_empty() {
            return Err(self.error(self.in_context("Expected path", context)));
        }
        trace!(%path, context, "path");
        Ok(path)
    }

    /// `[0-9]+`, as a non-negative `i64`.
    pub fn scan_integer(&mut self, context: &str) -> Result<i64, ParseError> {
        self.skip_whitespace_and_comments();
        let digits = self.scan_while("Integer", context, |c| c.is_ascii_digit())?;
        if digits.is_empty() {
            return Err(self.error(self.in_context("Expected integer", context)));
        }
        let value = digits
            .parse::<i64>()
            .map_err(|_| self.error(self.in_context("Integer literal out of range", context)))?;
        trace!(value, context, "integer");
        Ok(value)
    }

    /// `"..."` with the content taken verbatim; there are no escapes.
    pub fn scan_string(&mut self, context: &str) -> Result<String, ParseError> {
        self.skip_whitespace_and_comments();
        if !self.eat('"') {
            return Err(self.error(self.in_context("Expected string", context)));
        }
        let value = self.scan_while("String", context, |c| c != '"')?;
        if !self.eat('"') {
            return Err(self.error(self.in_context("Unterminated string", context)));
        }
        trace!(%value, context, "string");
        Ok(value)
    }
}
