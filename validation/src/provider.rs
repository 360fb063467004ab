//! The provider capability interface.
//!
//! A provider declares a set of options and validates how they are used.
//! Providers are handed to the engine as a pre-built list; the engine never
//! constructs or discovers them.

use async_trait::async_trait;

use option_engine_core::CommandLineOption;

use crate::query::CommandLineOptions;
use crate::result::ValidationResult;

/// A source of command-line options.
///
/// Only the identity and [`command_line_options`](Self::command_line_options)
/// are required; the async hooks default to "enabled" and "valid".
#[async_trait]
pub trait CommandLineOptionsProvider: Send + Sync {
    /// Stable unique identifier.
    fn uid(&self) -> &str;

    fn version(&self) -> &str;

    /// Human-readable name used in validation messages.
    fn display_name(&self) -> &str;

    fn description(&self) -> &str;

    /// Tool this provider is scoped to. Scoped providers are only visible
    /// when the command line selects that tool.
    fn tool_name(&self) -> Option<&str> {
        None
    }

    /// Options declared by this provider.
    ///
    /// The catalog calls this once per provider and caches the result.
    fn command_line_options(&self) -> Vec<CommandLineOption>;

    /// Whether the provider takes part in this invocation at all.
    async fn is_enabled(&self) -> bool {
        true
    }

    /// Validates the arguments given to one occurrence of `option`.
    async fn validate_option_arguments(
        &self,
        _option: &CommandLineOption,
        _arguments: &[String],
    ) -> ValidationResult {
        ValidationResult::Valid
    }

    /// Validates the complete set of options after every per-option check
    /// has passed.
    async fn validate_command_line_options(
        &self,
        _options: &dyn CommandLineOptions,
    ) -> ValidationResult {
        ValidationResult::Valid
    }
}
