use serde::Serialize;

/// A parse failure. The first failure aborts the parse; nothing is recovered.
///
/// `line` and `column` are 1-based and point at the character the parser was
/// looking at when it gave up, not at the start of the enclosing construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Error: {message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Cut the message down to at most `max_len` characters.
    pub(crate) fn truncated(mut self, max_len: usize) -> Self {
        if let Some((byte_idx, _)) = self.message.char_indices().nth(max_len) {
            self.message.truncate(byte_idx);
        }
        self
    }

    /// Serialize to a JSON object with every field present.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "column":  self.column,
            "line":    self.line,
            "message": self.message,
        })
    }
}
