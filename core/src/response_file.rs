//! Response-file expansion.
//!
//! A response file holds additional arguments, one logical line per physical
//! line. Blank lines and lines whose first non-space character is `#` are
//! skipped. Every other line is split into words; a double-quoted span keeps
//! its whitespace and loses its quote characters.
//!
//! ```text
//! # comment
//! --foo bar
//!
//! --baz "hello world"
//! ```
//!
//! expands to `--foo`, `bar`, `--baz`, `hello world`.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::LexicalError;

/// Whether the splitter is between words or inside a bare word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordBoundary {
    /// Looking for the start of the next word.
    TokenStart,
    /// Inside a word, looking for its end.
    WordEnd,
}

/// Whether the splitter is inside a double-quoted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteBoundary {
    /// Outside quotes, looking for an opening quote.
    QuoteStart,
    /// Inside quotes, looking for the closing quote.
    QuoteEnd,
}

/// Reads `path` and returns the argument tokens it contains.
///
/// # Errors
///
/// Returns [`LexicalError::ResponseFileNotFound`] when the file does not
/// exist and [`LexicalError::FailedToReadResponseFile`] for any other I/O
/// failure, including invalid UTF-8.
pub fn expand_response_file(path: &Path) -> Result<Vec<String>, LexicalError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LexicalError::ResponseFileNotFound(path.to_path_buf()),
        _ => LexicalError::FailedToReadResponseFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let tokens = expand_response_text(&contents);
    debug!(path = %path.display(), tokens = tokens.len(), "Expanded response file");
    Ok(tokens)
}

/// Expands the text of a response file into argument tokens.
///
/// # Examples
///
/// ```
/// use option_engine_core::expand_response_text;
///
/// let text = "# comment\n--foo bar\n\n--baz \"hello world\"\n";
/// assert_eq!(expand_response_text(text), vec!["--foo", "bar", "--baz", "hello world"]);
/// ```
pub fn expand_response_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(split_words)
        .collect()
}

/// Splits one line into words.
///
/// Whitespace outside quotes ends a word. A `"` toggles quoting and is
/// dropped from the output. A quoted span that starts a word ends that word
/// at its closing quote; a quote inside a bare word only toggles quoting, so
/// `a"b c"d` is the single word `ab cd`. An unterminated word at the end of
/// the line is still emitted.
///
/// # Examples
///
/// ```
/// use option_engine_core::split_words;
///
/// assert_eq!(split_words(r#"--name "two words" x"#), vec!["--name", "two words", "x"]);
/// assert_eq!(split_words(r#"a"b c"d"#), vec!["ab cd"]);
/// ```
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut seeking = WordBoundary::TokenStart;
    let mut quote = QuoteBoundary::QuoteStart;

    for ch in line.chars() {
        match (ch, seeking, quote) {
            (c, WordBoundary::WordEnd, QuoteBoundary::QuoteStart) if c.is_whitespace() => {
                words.push(std::mem::take(&mut current));
                seeking = WordBoundary::TokenStart;
            }
            (c, WordBoundary::TokenStart, QuoteBoundary::QuoteStart) if c.is_whitespace() => {}
            ('"', WordBoundary::TokenStart, QuoteBoundary::QuoteStart) => {
                quote = QuoteBoundary::QuoteEnd;
            }
            ('"', WordBoundary::TokenStart, QuoteBoundary::QuoteEnd) => {
                words.push(std::mem::take(&mut current));
                quote = QuoteBoundary::QuoteStart;
            }
            ('"', WordBoundary::WordEnd, QuoteBoundary::QuoteStart) => {
                quote = QuoteBoundary::QuoteEnd;
            }
            ('"', WordBoundary::WordEnd, QuoteBoundary::QuoteEnd) => {
                quote = QuoteBoundary::QuoteStart;
            }
            (c, WordBoundary::TokenStart, QuoteBoundary::QuoteStart) => {
                seeking = WordBoundary::WordEnd;
                current.push(c);
            }
            (c, _, _) => current.push(c),
        }
    }

    let open_quoted_word = seeking == WordBoundary::TokenStart && quote == QuoteBoundary::QuoteEnd;
    if seeking == WordBoundary::WordEnd || open_quoted_word {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_split_plain_words() {
        assert_eq!(split_words("a  b\tc"), vec!["a", "b", "c"]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_split_quoted_phrase() {
        assert_eq!(
            split_words(r#"--baz "hello world""#),
            vec!["--baz", "hello world"]
        );
    }

    #[test]
    fn test_quoted_phrase_ends_word_at_closing_quote() {
        assert_eq!(split_words(r#""a b"c"#), vec!["a b", "c"]);
    }

    #[test]
    fn test_quote_inside_bare_word_keeps_whitespace() {
        assert_eq!(split_words(r#"--opt="x y" z"#), vec!["--opt=x y", "z"]);
    }

    #[test]
    fn test_empty_quotes_produce_empty_word() {
        assert_eq!(split_words(r#"a """#), vec!["a", ""]);
    }

    #[test]
    fn test_unterminated_quote_is_flushed() {
        assert_eq!(split_words(r#"a "b c"#), vec!["a", "b c"]);
    }

    #[test]
    fn test_single_quotes_are_not_special() {
        assert_eq!(split_words("'a b'"), vec!["'a", "b'"]);
    }

    #[test]
    fn test_expand_text_skips_comments_and_blanks() {
        let text = "# comment\n--foo bar\n\n   # indented comment\n--baz \"hello world\"\n";
        assert_eq!(
            expand_response_text(text),
            vec!["--foo", "bar", "--baz", "hello world"]
        );
    }

    #[test]
    fn test_expand_text_handles_crlf() {
        assert_eq!(expand_response_text("--a 1\r\n--b 2\r\n"), vec!["--a", "1", "--b", "2"]);
    }

    #[test]
    fn test_expand_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "--foo bar").unwrap();
        writeln!(file, "--baz \"hello world\"").unwrap();
        file.flush().unwrap();

        let tokens = expand_response_file(file.path()).unwrap();
        assert_eq!(tokens, vec!["--foo", "bar", "--baz", "hello world"]);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.rsp");
        let err = expand_response_file(&path).unwrap_err();
        assert_eq!(err, LexicalError::ResponseFileNotFound(path.clone()));
        assert!(err.to_string().contains("was not found"));
    }

    #[test]
    fn test_unreadable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = expand_response_file(dir.path()).unwrap_err();
        assert!(matches!(err, LexicalError::FailedToReadResponseFile { .. }));
    }
}
