//! Single-pass command-line parser.
//!
//! Drives [`tokenize`](crate::tokenize) and [`QuoteResolver`] over the
//! argument vector and assembles a [`ParseResult`]. Problems are collected as
//! rendered [`LexicalError`]s; parsing never stops early and never fails.

use std::path::Path;

use tracing::debug;

use crate::error::LexicalError;
use crate::quoting::QuoteResolver;
use crate::response_file::expand_response_file;
use crate::tokenize::{Token, tokenize};
use crate::types::{OptionRecord, ParseResult};

/// Prefix marking an argument as a response-file directive.
pub const RESPONSE_FILE_PREFIX: char = '@';

/// Parser for raw argument vectors.
///
/// # Examples
///
/// ```
/// use option_engine_core::CommandLineParser;
///
/// let result = CommandLineParser::default().parse(["test", "--filter", "A", "B", "-v:x"]);
/// assert_eq!(result.tool_name(), Some("test"));
/// assert_eq!(result.options().len(), 2);
/// assert_eq!(result.options()[0].arguments, vec!["A", "B"]);
/// assert!(!result.has_error());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineParser {
    resolver: QuoteResolver,
}

/// Option currently collecting arguments.
struct OpenOption {
    name: String,
    arguments: Vec<String>,
}

impl OpenOption {
    fn into_record(self) -> OptionRecord {
        OptionRecord::new(self.name, self.arguments)
    }
}

impl CommandLineParser {
    pub fn new(resolver: QuoteResolver) -> Self {
        Self { resolver }
    }

    /// Parses an argument vector, excluding the program name.
    ///
    /// Top-level `@path` arguments are replaced by the contents of the
    /// response file before lexing. A bare token at position 0 becomes the
    /// tool name; every other bare token is an argument of the open option,
    /// or an `UnexpectedArgument` error when no option is open. Each option
    /// occurrence produces its own [`OptionRecord`]. An option start without
    /// a name, such as `--=v`, is a `MissingOptionName` error and opens nothing.
    pub fn parse<I, S>(&self, args: I) -> ParseResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let original_args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut errors = Vec::new();
        let tokens = expand_arguments(&original_args, &mut errors);

        let mut tool_name = None;
        let mut records = Vec::new();
        let mut current: Option<OpenOption> = None;

        for (index, token) in tokens.iter().enumerate() {
            match tokenize(token) {
                Token::OptionStart { name, .. } if name.is_empty() => {
                    // Nothing is open afterwards, so trailing values are stray.
                    if let Some(open) = current.take() {
                        records.push(open.into_record());
                    }
                    errors.push(LexicalError::MissingOptionName(token.clone()).to_string());
                }
                Token::OptionStart {
                    name,
                    inline_argument,
                } => {
                    if let Some(open) = current.take() {
                        records.push(open.into_record());
                    }
                    let mut open = OpenOption {
                        name: name.to_string(),
                        arguments: Vec::new(),
                    };
                    if let Some(inline) = inline_argument {
                        match self.resolver.resolve(inline, Some(name)) {
                            Ok(value) => open.arguments.push(value),
                            Err(e) => errors.push(e.to_string()),
                        }
                    }
                    current = Some(open);
                }
                Token::Value(value) if index == 0 => match self.resolver.resolve(value, None) {
                    Ok(tool) => {
                        debug!(tool = %tool, "Captured tool name");
                        tool_name = Some(tool);
                    }
                    Err(e) => errors.push(e.to_string()),
                },
                Token::Value(value) => match current.as_mut() {
                    Some(open) => match self.resolver.resolve(value, Some(open.name.as_str())) {
                        Ok(resolved) => open.arguments.push(resolved),
                        Err(e) => errors.push(e.to_string()),
                    },
                    None => {
                        errors.push(LexicalError::UnexpectedArgument(value.to_string()).to_string())
                    }
                },
            }
        }

        if let Some(open) = current.take() {
            records.push(open.into_record());
        }

        debug!(
            options = records.len(),
            errors = errors.len(),
            "Parsed command line"
        );
        ParseResult::new(tool_name, records, errors, original_args)
    }
}

/// Parses `args` with the default resolver.
///
/// # Examples
///
/// ```
/// let result = option_engine_core::parse(["--opt:v"]);
/// assert_eq!(result.options()[0].name, "opt");
/// assert_eq!(result.options()[0].arguments, vec!["v"]);
/// ```
pub fn parse<I, S>(args: I) -> ParseResult
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    CommandLineParser::default().parse(args)
}

/// Replaces top-level `@path` arguments with the tokens of the named file.
///
/// Tokens read from a response file are not expanded again.
fn expand_arguments(args: &[String], errors: &mut Vec<String>) -> Vec<String> {
    let mut tokens = Vec::with_capacity(args.len());
    for arg in args {
        let path = match arg.strip_prefix(RESPONSE_FILE_PREFIX) {
            Some(path) if !path.is_empty() => path,
            _ => {
                tokens.push(arg.clone());
                continue;
            }
        };

        match expand_response_file(Path::new(path)) {
            Ok(expanded) => tokens.extend(expanded),
            Err(e) => errors.push(e.to_string()),
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, arguments: &[&str]) -> OptionRecord {
        OptionRecord::new(name, arguments.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn test_delimiter_styles_are_equivalent() {
        for args in [vec!["--opt:v"], vec!["--opt=v"], vec!["--opt", "v"], vec!["--opt v"]] {
            let result = parse(args);
            assert_eq!(result.options(), &[record("opt", &["v"])]);
            assert!(!result.has_error());
        }
    }

    #[test]
    fn test_tool_name_only_at_position_zero() {
        let result = parse(["tool", "--a"]);
        assert_eq!(result.tool_name(), Some("tool"));

        let result = parse(["--a", "x", "--b"]);
        assert_eq!(result.tool_name(), None);
        assert_eq!(result.options(), &[record("a", &["x"]), record("b", &[])]);
    }

    #[test]
    fn test_stray_value_is_unexpected_argument() {
        let result = parse(["tool", "stray", "--a"]);
        assert_eq!(result.errors(), &["Unexpected argument stray".to_string()]);
        assert_eq!(result.tool_name(), Some("tool"));
        assert_eq!(result.options(), &[record("a", &[])]);
    }

    #[test]
    fn test_repeated_option_keeps_one_record_per_occurrence() {
        let result = parse(["--f", "a", "--f", "b", "c"]);
        assert_eq!(result.options(), &[record("f", &["a"]), record("f", &["b", "c"])]);
        assert_eq!(result.try_get_option_argument_list("f"), Some(vec!["a", "b", "c"]));
    }

    #[test]
    fn test_inline_argument_is_quote_resolved() {
        let result = parse(["--opt:'a b'", "--other=\"x\\\"y\""]);
        assert_eq!(result.options(), &[record("opt", &["a b"]), record("other", &["x\"y"])]);
    }

    #[test]
    fn test_errors_are_collected_without_stopping() {
        let result = parse(["'bad'tool'", "--a", "'x'y'", "--b", "ok"]);
        assert_eq!(result.errors().len(), 2);
        assert!(result.errors()[0].starts_with("Unexpected single quote in argument: 'bad'tool'"));
        assert_eq!(
            result.errors()[1],
            "Unexpected single quote in argument: 'x'y' for option '--a'"
        );
        assert_eq!(result.options(), &[record("a", &[]), record("b", &["ok"])]);
    }

    #[test]
    fn test_bare_dashes_are_values() {
        let result = parse(["-", "--a", "--", "---x"]);
        assert_eq!(result.tool_name(), Some("-"));
        assert_eq!(result.options(), &[record("a", &["--", "---x"])]);

        let result = parse(["--a", "x", "y"]);
        assert!(!result.has_error());

        let result = parse(["tool", "--"]);
        assert_eq!(result.errors(), &["Unexpected argument --".to_string()]);
    }

    #[test]
    fn test_option_start_without_name_is_an_error() {
        for arg in ["--=v", "-:v", "--:v", "- v", "-="] {
            let result = parse(["--a", arg]);
            assert_eq!(result.errors(), &[format!("Missing option name in argument {arg}")]);
            assert_eq!(result.options(), &[record("a", &[])]);
        }

        let result = parse(["--a", "x", "--=v", "y", "--b", "z"]);
        assert_eq!(
            result.errors(),
            &[
                "Missing option name in argument --=v".to_string(),
                "Unexpected argument y".to_string(),
            ]
        );
        assert_eq!(result.options(), &[record("a", &["x"]), record("b", &["z"])]);
    }

    #[test]
    fn test_response_file_is_expanded_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("args.rsp");
        std::fs::write(&path, "# comment\n--foo bar\n\n--baz \"hello world\"\n").unwrap();

        let directive = format!("@{}", path.display());
        let result = parse(["tool".to_string(), directive, "--last".to_string()]);
        assert_eq!(result.tool_name(), Some("tool"));
        assert_eq!(
            result.options(),
            &[
                record("foo", &["bar"]),
                record("baz", &["hello world"]),
                record("last", &[]),
            ]
        );
    }

    #[test]
    fn test_missing_response_file_is_a_parse_error() {
        let result = parse(["--a", "@/definitely/not/here.rsp"]);
        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0].contains("/definitely/not/here.rsp"));
        assert_eq!(result.options(), &[record("a", &[])]);
    }

    #[test]
    fn test_bare_at_sign_is_a_value() {
        let result = parse(["--a", "@"]);
        assert_eq!(result.options(), &[record("a", &["@"])]);
    }

    #[test]
    fn test_original_args_are_preserved() {
        let result = parse(["--a:1"]);
        assert_eq!(result.original_args(), &["--a:1".to_string()]);
    }
}
