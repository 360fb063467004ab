//! Error types for the validation crate.
//!
//! Validation findings themselves are data (see
//! [`ValidationFailure`](crate::ValidationFailure)); this type covers the
//! surrounding failures: configuration I/O, bad option declarations and
//! premature queries.

use thiserror::Error;

use option_engine_core::OptionDefinitionError;

/// Errors raised outside the validation findings themselves.
#[derive(Debug, Error)]
pub enum CommandLineError {
    /// The query façade was used before validation succeeded.
    #[error("command line options are not ready: validation has not completed")]
    NotReady,

    /// An option declaration is malformed.
    #[error("invalid option declaration: {0}")]
    InvalidOption(#[from] OptionDefinitionError),

    /// Configuration file I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`CommandLineError`].
pub type Result<T> = std::result::Result<T, CommandLineError>;
