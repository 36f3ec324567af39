//! Parser configuration.

use serde::Deserialize;

/// Default upper bound on the number of characters in a single token.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 512;
/// Default upper bound on the number of characters in a diagnostic message.
pub const DEFAULT_MAX_ERROR_LEN: usize = 512;

/// Knobs for one parse.
///
/// The defaults match what every shipped consumer uses; hosts that embed the
/// parser can tighten the limits or load them from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Longest identifier, path, integer or string literal accepted.
    pub max_token_len: usize,
    /// Diagnostic messages longer than this are truncated.
    pub max_error_len: usize,
    /// Append `in context: <production>` to scanner diagnostics.
    pub include_context: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            max_error_len: DEFAULT_MAX_ERROR_LEN,
            include_context: true,
        }
    }
}

impl ParseOptions {
    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = max_token_len;
        self
    }

    pub fn with_max_error_len(mut self, max_error_len: usize) -> Self {
        self.max_error_len = max_error_len;
        self
    }

    pub fn with_context(mut self, include_context: bool) -> Self {
        self.include_context = include_context;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = ParseOptions::default();
        assert_eq!(o.max_token_len, 512);
        assert_eq!(o.max_error_len, 512);
        assert!(o.include_context);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let o: ParseOptions = serde_json::from_str(r#"{"max_token_len": 16}"#).unwrap();
        assert_eq!(o.max_token_len, 16);
        assert_eq!(o.max_error_len, DEFAULT_MAX_ERROR_LEN);
        assert!(o.include_context);
    }
}
