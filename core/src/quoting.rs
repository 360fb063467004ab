//! Quote and escape resolution for argument values.
//!
//! A value wrapped in single quotes is taken literally. A value wrapped in
//! double quotes supports a small fixed set of backslash escapes. Anything
//! else is returned as-is. There is no variable or command substitution.

use crate::error::LexicalError;

/// Platform line terminator used for escaped newlines in double quotes.
#[cfg(windows)]
pub const PLATFORM_NEWLINE: &str = "\r\n";
/// Platform line terminator used for escaped newlines in double quotes.
#[cfg(not(windows))]
pub const PLATFORM_NEWLINE: &str = "\n";

/// Resolves quoting in candidate argument values.
///
/// # Examples
///
/// ```
/// use option_engine_core::QuoteResolver;
///
/// let resolver = QuoteResolver::default();
/// assert_eq!(resolver.resolve("'plain text'", None).unwrap(), "plain text");
/// assert_eq!(resolver.resolve(r#""a\"b""#, Some("opt")).unwrap(), "a\"b");
/// assert!(resolver.resolve("'it''s fine'", Some("opt")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct QuoteResolver {
    newline: String,
}

impl Default for QuoteResolver {
    fn default() -> Self {
        Self::new(PLATFORM_NEWLINE)
    }
}

impl QuoteResolver {
    /// Creates a resolver that expands `\` followed by `newline` to `newline`.
    pub fn new(newline: impl Into<String>) -> Self {
        Self {
            newline: newline.into(),
        }
    }

    /// Resolves one value.
    ///
    /// `option` is the option the value belongs to, or `None` for the tool
    /// name and stray values; it only affects the error message.
    ///
    /// # Errors
    ///
    /// Returns an `UnexpectedSingleQuoteInArgument` error when a
    /// single-quoted value contains another single quote, or is a lone `'`.
    pub fn resolve(&self, raw: &str, option: Option<&str>) -> Result<String, LexicalError> {
        let value = raw.trim();

        if value.starts_with('\'') && value.ends_with('\'') {
            if value.len() < 2 || value[1..value.len() - 1].contains('\'') {
                return Err(single_quote_error(value, option));
            }
            return Ok(value[1..value.len() - 1].to_string());
        }

        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            return Ok(self.unescape(&value[1..value.len() - 1]));
        }

        Ok(value.to_string())
    }

    fn unescape(&self, inner: &str) -> String {
        let escaped_newline = format!("\\{}", self.newline);
        inner
            .replace("\\\\", "\\")
            .replace("\\\"", "\"")
            .replace("\\$", "$")
            .replace("\\`", "`")
            .replace(&escaped_newline, &self.newline)
    }
}

fn single_quote_error(value: &str, option: Option<&str>) -> LexicalError {
    match option {
        Some(option) => LexicalError::UnexpectedSingleQuoteInArgumentForOption {
            argument: value.to_string(),
            option: option.to_string(),
        },
        None => LexicalError::UnexpectedSingleQuoteInArgument {
            argument: value.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> Result<String, LexicalError> {
        QuoteResolver::new("\n").resolve(raw, Some("opt"))
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(resolve("'plain text'").unwrap(), "plain text");
        assert_eq!(resolve(r"'a\nb\\'").unwrap(), r"a\nb\\");
        assert_eq!(resolve("''").unwrap(), "");
    }

    #[test]
    fn test_interior_single_quote_is_an_error() {
        assert_eq!(
            resolve("'it''s fine'"),
            Err(LexicalError::UnexpectedSingleQuoteInArgumentForOption {
                argument: "'it''s fine'".to_string(),
                option: "opt".to_string(),
            })
        );
        let err = QuoteResolver::default().resolve("'a'b'", None).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected single quote in argument: 'a'b'");
    }

    #[test]
    fn test_lone_single_quote_is_an_error() {
        assert!(resolve("'").is_err());
    }

    #[test]
    fn test_double_quote_escapes() {
        assert_eq!(resolve(r#""a\"b""#).unwrap(), "a\"b");
        assert_eq!(resolve(r#""a\\b""#).unwrap(), r"a\b");
        assert_eq!(resolve(r#""\$HOME""#).unwrap(), "$HOME");
        assert_eq!(resolve(r#""\`cmd\`""#).unwrap(), "`cmd`");
        assert_eq!(resolve("\"line\\\nnext\"").unwrap(), "line\nnext");
    }

    #[test]
    fn test_unknown_escapes_are_kept() {
        assert_eq!(resolve(r#""a\tb""#).unwrap(), r"a\tb");
        assert_eq!(resolve(r#""$HOME""#).unwrap(), "$HOME");
    }

    #[test]
    fn test_escape_order_backslash_first() {
        // `\\\"` collapses the backslash pair before the quote escape runs.
        assert_eq!(resolve(r#""\\\"""#).unwrap(), r#"\""#);
    }

    #[test]
    fn test_plain_values_unchanged_but_trimmed() {
        assert_eq!(resolve("  value  ").unwrap(), "value");
        assert_eq!(resolve("\"unterminated").unwrap(), "\"unterminated");
        assert_eq!(resolve("\"").unwrap(), "\"");
        assert_eq!(resolve("it's").unwrap(), "it's");
    }

    #[test]
    fn test_custom_newline() {
        let resolver = QuoteResolver::new("\r\n");
        assert_eq!(resolver.resolve("\"a\\\r\nb\"", None).unwrap(), "a\r\nb");
    }
}
