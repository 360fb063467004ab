//! Option descriptors and parse output types.
//!
//! [`CommandLineOption`] is what providers declare; [`OptionRecord`] and
//! [`ParseResult`] are what the parser observes on the command line. The
//! two sides only meet during validation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::OptionDefinitionError;
use crate::quoting::PLATFORM_NEWLINE;

/// Character that introduces an option on the command line.
pub const OPTION_PREFIX: char = '-';

static OPTION_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}?\-]+$").expect("static regex must compile"));

/// Minimum and maximum number of arguments an option accepts.
///
/// # Examples
///
/// ```
/// use option_engine_core::Arity;
///
/// assert_eq!(Arity::ONE, Arity::exactly(1));
/// assert!(Arity::between(2, 1).is_err());
/// assert!(Arity::ZERO_OR_MORE.max > 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    /// Flag with no arguments.
    pub const ZERO: Arity = Arity { min: 0, max: 0 };
    /// At most one argument.
    pub const ZERO_OR_ONE: Arity = Arity { min: 0, max: 1 };
    /// Any number of arguments.
    pub const ZERO_OR_MORE: Arity = Arity {
        min: 0,
        max: usize::MAX,
    };
    /// Exactly one argument.
    pub const ONE: Arity = Arity { min: 1, max: 1 };
    /// At least one argument.
    pub const ONE_OR_MORE: Arity = Arity {
        min: 1,
        max: usize::MAX,
    };

    /// Exactly `n` arguments.
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    /// Between `min` and `max` arguments, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`OptionDefinitionError::InvalidArity`] when `min > max`.
    pub fn between(min: usize, max: usize) -> Result<Self, OptionDefinitionError> {
        if min > max {
            return Err(OptionDefinitionError::InvalidArity { min, max });
        }
        Ok(Self { min, max })
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.max == usize::MAX {
            write!(f, "{}..", self.min)
        } else if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

/// An option declared by a provider.
///
/// Descriptors are validated on construction and never change afterwards.
/// Equality is structural.
///
/// # Examples
///
/// ```
/// use option_engine_core::{Arity, CommandLineOption};
///
/// let timeout = CommandLineOption::new("timeout", "Global test run timeout", Arity::ONE)
///     .unwrap();
/// assert_eq!(timeout.name(), "timeout");
/// assert!(!timeout.is_hidden());
///
/// let server = CommandLineOption::new("server", "Server mode", Arity::ZERO_OR_ONE)
///     .unwrap()
///     .hidden()
///     .built_in();
/// assert!(server.is_hidden() && server.is_built_in());
///
/// assert!(CommandLineOption::new("bad name", "", Arity::ZERO).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandLineOption {
    name: String,
    description: String,
    arity: Arity,
    is_hidden: bool,
    is_built_in: bool,
}

impl CommandLineOption {
    /// Creates a visible, non-built-in option.
    ///
    /// # Errors
    ///
    /// Returns [`OptionDefinitionError`] for an empty name, a name with
    /// characters outside letters, digits, `-` and `?`, or an arity whose
    /// minimum exceeds its maximum.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        arity: Arity,
    ) -> Result<Self, OptionDefinitionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(OptionDefinitionError::EmptyName);
        }
        if !OPTION_NAME_RE.is_match(&name) {
            return Err(OptionDefinitionError::InvalidName(name));
        }
        if arity.min > arity.max {
            return Err(OptionDefinitionError::InvalidArity {
                min: arity.min,
                max: arity.max,
            });
        }

        Ok(Self {
            name,
            description: description.into(),
            arity,
            is_hidden: false,
            is_built_in: false,
        })
    }

    /// Marks the option as hidden from help output.
    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    /// Marks the option as built in, exempting it from the reserved prefix rule.
    pub fn built_in(mut self) -> Self {
        self.is_built_in = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn is_built_in(&self) -> bool {
        self.is_built_in
    }
}

/// One observed option occurrence: the name as typed (prefix trimmed) and
/// the arguments that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub name: String,
    pub arguments: Vec<String>,
}

impl OptionRecord {
    pub fn new(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Output of the parser for one invocation.
///
/// Equality compares the tool name, the option records and the errors; the
/// original argument vector is kept for diagnostics only and does not take
/// part in comparisons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseResult {
    tool_name: Option<String>,
    options: Vec<OptionRecord>,
    errors: Vec<String>,
    original_args: Vec<String>,
}

impl ParseResult {
    pub fn new(
        tool_name: Option<String>,
        options: Vec<OptionRecord>,
        errors: Vec<String>,
        original_args: Vec<String>,
    ) -> Self {
        Self {
            tool_name,
            options,
            errors,
            original_args,
        }
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    /// Option records in command-line order, one per occurrence.
    pub fn options(&self) -> &[OptionRecord] {
        &self.options
    }

    /// Rendered lexical errors in the order they were found.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn original_args(&self) -> &[String] {
        &self.original_args
    }

    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` when any record matches `name`.
    ///
    /// Leading `-` characters are ignored and the comparison is
    /// case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// let result = option_engine_core::parse(["--Diagnostic"]);
    /// assert!(result.is_option_set("diagnostic"));
    /// assert!(result.is_option_set("--diagnostic"));
    /// assert!(!result.is_option_set("info"));
    /// ```
    pub fn is_option_set(&self, name: &str) -> bool {
        self.options.iter().any(|record| record_matches(record, name))
    }

    /// Returns the arguments of every record matching `name`, flattened in
    /// command-line order, or `None` if the option never appeared.
    ///
    /// # Examples
    ///
    /// ```
    /// let result = option_engine_core::parse(["--filter", "a", "--filter:b"]);
    /// assert_eq!(result.try_get_option_argument_list("filter"), Some(vec!["a", "b"]));
    /// assert_eq!(result.try_get_option_argument_list("missing"), None);
    /// ```
    pub fn try_get_option_argument_list(&self, name: &str) -> Option<Vec<&str>> {
        let mut matching = self
            .options
            .iter()
            .filter(|record| record_matches(record, name))
            .peekable();
        matching.peek()?;
        Some(
            matching
                .flat_map(|record| record.arguments.iter().map(String::as_str))
                .collect(),
        )
    }

    /// Rebuilds an argument vector that parses back to an equal result.
    ///
    /// Options are written in their long `--name` form and every argument
    /// becomes its own token. Arguments that would otherwise be lexed
    /// differently are quoted. Lexical errors are not reproduced.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_engine_core::parse;
    ///
    /// let first = parse(["tool", "-x:1", "--name", "'-leading dash'"]);
    /// let args = first.to_args();
    /// assert_eq!(args, vec!["tool", "--x", "1", "--name", "'-leading dash'"]);
    /// assert_eq!(parse(args), first);
    /// ```
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(tool) = &self.tool_name {
            args.push(quote_if_needed(tool));
        }
        for record in &self.options {
            args.push(format!("--{}", record.name));
            args.extend(record.arguments.iter().map(|a| quote_if_needed(a)));
        }
        args
    }
}

impl PartialEq for ParseResult {
    fn eq(&self, other: &Self) -> bool {
        self.tool_name == other.tool_name
            && self.options == other.options
            && self.errors == other.errors
    }
}

impl Eq for ParseResult {}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ToolName: {}", self.tool_name.as_deref().unwrap_or(""))?;
        writeln!(f, "Errors: {}", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "    {error}")?;
        }
        writeln!(f, "Options: {}", self.options.len())?;
        for record in &self.options {
            writeln!(f, "    {}: [{}]", record.name, record.arguments.join(", "))?;
        }
        Ok(())
    }
}

fn record_matches(record: &OptionRecord, name: &str) -> bool {
    record
        .name
        .eq_ignore_ascii_case(name.trim_start_matches(OPTION_PREFIX))
}

fn quote_if_needed(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.trim() != value
        || value.starts_with(['-', '@', '\'', '"']);
    if !needs_quotes {
        return value.to_string();
    }

    if !value.contains('\'') {
        return format!("'{value}'");
    }

    // Every character the resolver unescapes is escaped here. A backslash in
    // front of a line break needs a second pair so the newline rule keeps one.
    let mut escaped = String::with_capacity(value.len() + 2);
    for (i, ch) in value.char_indices() {
        match ch {
            '\\' if value[i + 1..].starts_with(PLATFORM_NEWLINE) => escaped.push_str(r"\\\\"),
            '\\' => escaped.push_str(r"\\"),
            '"' | '$' | '`' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_name_rules() {
        assert!(CommandLineOption::new("help", "", Arity::ZERO).is_ok());
        assert!(CommandLineOption::new("?", "", Arity::ZERO).is_ok());
        assert!(CommandLineOption::new("results-directory", "", Arity::ONE).is_ok());
        assert_eq!(
            CommandLineOption::new("", "", Arity::ZERO),
            Err(OptionDefinitionError::EmptyName)
        );
        assert_eq!(
            CommandLineOption::new("a=b", "", Arity::ZERO),
            Err(OptionDefinitionError::InvalidName("a=b".to_string()))
        );
        assert_eq!(
            CommandLineOption::new("a:b", "", Arity::ZERO),
            Err(OptionDefinitionError::InvalidName("a:b".to_string()))
        );
    }

    #[test]
    fn test_option_rejects_inverted_arity() {
        let arity = Arity { min: 3, max: 1 };
        assert_eq!(
            CommandLineOption::new("x", "", arity),
            Err(OptionDefinitionError::InvalidArity { min: 3, max: 1 })
        );
    }

    #[test]
    fn test_option_structural_equality() {
        let a = CommandLineOption::new("x", "d", Arity::ONE).unwrap();
        let b = CommandLineOption::new("x", "d", Arity::ONE).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, b.clone().hidden());
    }

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity::ZERO.to_string(), "0");
        assert_eq!(Arity::ZERO_OR_ONE.to_string(), "0..1");
        assert_eq!(Arity::ONE_OR_MORE.to_string(), "1..");
    }

    #[test]
    fn test_parse_result_equality_ignores_original_args() {
        let records = vec![OptionRecord::new("a", vec!["1".to_string()])];
        let left = ParseResult::new(None, records.clone(), vec![], vec!["--a:1".to_string()]);
        let right = ParseResult::new(
            None,
            records,
            vec![],
            vec!["--a".to_string(), "1".to_string()],
        );
        assert_eq!(left, right);
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("plain"), "plain");
        assert_eq!(quote_if_needed(""), "''");
        assert_eq!(quote_if_needed("-5"), "'-5'");
        assert_eq!(quote_if_needed(" padded "), "' padded '");
        assert_eq!(quote_if_needed("it's"), "it's");
        assert_eq!(quote_if_needed("'it's'"), "\"'it's'\"");
    }

    #[test]
    fn test_double_quoted_values_resolve_back() {
        use crate::quoting::QuoteResolver;

        let resolver = QuoteResolver::default();
        let backslash_newline = format!("'x\\{PLATFORM_NEWLINE}y");
        let double_backslash_newline = format!("'x\\\\{PLATFORM_NEWLINE}y");
        let values = [
            r"'\$",
            r"'\\$",
            r"'a\`b",
            "'$HOME`",
            r#"'say "hi"'"#,
            r#"'\""#,
            backslash_newline.as_str(),
            double_backslash_newline.as_str(),
        ];
        for value in values {
            let quoted = quote_if_needed(value);
            assert!(quoted.starts_with('"'), "{value:?} should be double-quoted");
            assert_eq!(resolver.resolve(&quoted, Some("x")).unwrap(), value);
        }
        assert_eq!(quote_if_needed(r"'\$"), r#""'\\\$""#);
    }

    #[test]
    fn test_display_lists_records() {
        let result = ParseResult::new(
            Some("tool".to_string()),
            vec![OptionRecord::new("a", vec!["1".to_string(), "2".to_string()])],
            vec![],
            vec![],
        );
        let text = result.to_string();
        assert!(text.contains("ToolName: tool"));
        assert!(text.contains("a: [1, 2]"));
    }
}
