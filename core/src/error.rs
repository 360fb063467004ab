//! Error types for command-line lexing and option declaration.
//!
//! Lexical errors are never raised out of the parser: they are rendered and
//! collected into [`ParseResult::errors`](crate::ParseResult::errors) so that
//! one invocation reports every problem at once.

use std::path::PathBuf;

use thiserror::Error;

/// Lexical problems found while turning raw arguments into option records.
///
/// The `Display` impl is the user-visible message stored in the parse result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalError {
    /// A value appeared at a position where no option is open.
    #[error("Unexpected argument {0}")]
    UnexpectedArgument(String),

    /// An option prefix is followed directly by a `:`, `=` or space.
    #[error("Missing option name in argument {0}")]
    MissingOptionName(String),

    /// A single-quoted value contains an interior single quote.
    #[error("Unexpected single quote in argument: {argument}")]
    UnexpectedSingleQuoteInArgument { argument: String },

    /// Same as [`UnexpectedSingleQuoteInArgument`](Self::UnexpectedSingleQuoteInArgument)
    /// for a value that belongs to an option.
    #[error("Unexpected single quote in argument: {argument} for option '--{option}'")]
    UnexpectedSingleQuoteInArgumentForOption { argument: String, option: String },

    /// A `@file` directive names a file that does not exist.
    #[error("The response file '{}' was not found", .0.display())]
    ResponseFileNotFound(PathBuf),

    /// A `@file` directive names a file that could not be read.
    #[error("Failed to read response file '{}'. {reason}", path.display())]
    FailedToReadResponseFile { path: PathBuf, reason: String },
}

/// Problems with an option descriptor supplied by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionDefinitionError {
    /// Option name is empty.
    #[error("option name cannot be empty")]
    EmptyName,

    /// Option name contains characters other than letters, digits, `-` and `?`.
    #[error("invalid option name '{0}': only letters, digits, '-' and '?' are allowed")]
    InvalidName(String),

    /// Minimum arity is greater than maximum arity.
    #[error("invalid arity ({min}, {max}): minimum cannot exceed maximum")]
    InvalidArity { min: usize, max: usize },
}
