//! Command-line lexing and parsing.
//!
//! This crate turns a raw argument vector into a [`ParseResult`]: an
//! optional leading tool name plus an ordered list of [`OptionRecord`]s.
//!
//! - [`tokenize`]: classifies one raw argument as an option start
//!   (`-x`, `--name`, with `:`, `=` or space before an inline value) or a
//!   bare value.
//! - [`QuoteResolver`]: resolves single-quoted (literal) and double-quoted
//!   (escape-aware) values.
//! - [`expand_response_file`]: expands `@file` arguments into tokens.
//! - [`CommandLineParser`]: drives the above over a whole argument vector,
//!   collecting [`LexicalError`]s instead of failing.
//!
//! Option declarations ([`CommandLineOption`], [`Arity`]) also live here so
//! that providers and the validation pipeline share one vocabulary.
//!
//! # Example
//!
//! ```
//! use option_engine_core::*;
//!
//! let result = parse(["test", "--results-directory:'out dir'", "--filter", "A", "B"]);
//! assert_eq!(result.tool_name(), Some("test"));
//! assert_eq!(
//!     result.try_get_option_argument_list("results-directory"),
//!     Some(vec!["out dir"])
//! );
//! assert_eq!(result.try_get_option_argument_list("--filter"), Some(vec!["A", "B"]));
//! assert!(!result.has_error());
//!
//! let bad = parse(["test", "stray"]);
//! assert_eq!(bad.errors(), &["Unexpected argument stray".to_string()]);
//! ```

mod error;
mod parser;
mod quoting;
mod response_file;
mod tokenize;
mod types;

pub use error::{LexicalError, OptionDefinitionError};
pub use parser::{CommandLineParser, RESPONSE_FILE_PREFIX, parse};
pub use quoting::{PLATFORM_NEWLINE, QuoteResolver};
pub use response_file::{expand_response_file, expand_response_text, split_words};
pub use tokenize::{NAME_VALUE_DELIMITERS, Token, is_option_start, tokenize};
pub use types::*;
