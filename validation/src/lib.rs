//! Option providers, the option catalog and the staged validation pipeline.
//!
//! This crate takes a [`ParseResult`](option_engine_core::ParseResult) and
//! decides whether it is acceptable to the providers that declared options
//! for this invocation.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//!
//! use option_engine_core::parse;
//! use option_engine_validation::{
//!     CommandLineHandler, EngineConfig, OptionCatalog, PlatformOptionsProvider,
//!     ValidationPipeline,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let config = EngineConfig::default();
//! let parsed = parse(["test", "--diagnostic", "--diagnostic-verbosity", "Debug"]);
//!
//! let catalog = OptionCatalog::resolve(
//!     vec![Arc::new(PlatformOptionsProvider::new())],
//!     config.extension_providers().unwrap(),
//!     parsed.tool_name(),
//! )
//! .await;
//!
//! let mut handler = CommandLineHandler::new(parsed, catalog);
//! handler
//!     .validate(&ValidationPipeline::new(config.pipeline_config()))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(
//!     handler.try_get_option_argument_list("diagnostic-verbosity").unwrap(),
//!     Some(vec!["Debug"])
//! );
//! # });
//! ```
//!
//! # Validation stages
//!
//! See [`ValidationPipeline`] for the stage order. A failing stage returns a
//! [`ValidationFailure`] holding structured [`ValidationIssue`]s; call
//! [`ValidationFailure::render`] to produce the user-facing report.

mod builtin;
mod catalog;
mod config;
mod declared;
mod error;
mod help;
mod issues;
mod pipeline;
mod provider;
mod query;
mod result;

pub use builtin::{
    CLIENT_HOST_OPTION, CLIENT_PORT_OPTION, DIAGNOSTIC_OPTION, DIAGNOSTIC_OUTPUT_DIRECTORY_OPTION,
    DIAGNOSTIC_OUTPUT_FILEPREFIX_OPTION, DIAGNOSTIC_VERBOSITY_OPTION, HELP_OPTION,
    HELP_SHORT_OPTION, INFO_OPTION, LIST_TESTS_OPTION, MAXIMUM_EXPECTED_TESTS_OPTION,
    MINIMUM_EXPECTED_TESTS_OPTION, NO_BANNER_OPTION, PORT_OPTION, PlatformOptionsProvider,
    RESULTS_DIRECTORY_OPTION, SERVER_OPTION, TEST_HOST_CONTROLLER_PID_OPTION, TIMEOUT_OPTION,
    VERBOSITY_LEVELS,
};
pub use catalog::{OptionCatalog, ProviderEntry, ProviderOrigin};
pub use config::{
    DEFAULT_RESERVED_PREFIX, EngineConfig, ExtensionConfig, OptionConfig, PipelineConfig,
};
pub use declared::DeclaredProvider;
pub use error::{CommandLineError, Result};
pub use help::{render_help, render_info};
pub use issues::{IssueKind, REPORT_HEADER, ValidationFailure, ValidationIssue, ValidationStage};
pub use pipeline::{DUPLICATE_DECLARATION_HINT, ValidationPipeline};
pub use provider::CommandLineOptionsProvider;
pub use query::{CommandLineHandler, CommandLineOptions};
pub use result::{ValidationResult, to_trimmed_string};
