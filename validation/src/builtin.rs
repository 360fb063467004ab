//! Options built into the platform itself.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use option_engine_core::{Arity, CommandLineOption};

use crate::provider::CommandLineOptionsProvider;
use crate::query::CommandLineOptions;
use crate::result::ValidationResult;

pub const HELP_OPTION: &str = "help";
pub const HELP_SHORT_OPTION: &str = "?";
pub const INFO_OPTION: &str = "info";
pub const RESULTS_DIRECTORY_OPTION: &str = "results-directory";
pub const DIAGNOSTIC_OPTION: &str = "diagnostic";
pub const DIAGNOSTIC_OUTPUT_DIRECTORY_OPTION: &str = "diagnostic-output-directory";
pub const DIAGNOSTIC_OUTPUT_FILEPREFIX_OPTION: &str = "diagnostic-output-fileprefix";
pub const DIAGNOSTIC_VERBOSITY_OPTION: &str = "diagnostic-verbosity";
pub const LIST_TESTS_OPTION: &str = "list-tests";
pub const MINIMUM_EXPECTED_TESTS_OPTION: &str = "minimum-expected-tests";
pub const MAXIMUM_EXPECTED_TESTS_OPTION: &str = "maximum-expected-tests";
pub const TIMEOUT_OPTION: &str = "timeout";
pub const NO_BANNER_OPTION: &str = "no-banner";
pub const SERVER_OPTION: &str = "server";
pub const PORT_OPTION: &str = "port";
pub const CLIENT_PORT_OPTION: &str = "client-port";
pub const CLIENT_HOST_OPTION: &str = "client-host";
pub const TEST_HOST_CONTROLLER_PID_OPTION: &str = "internal-testhostcontroller-pid";

/// Levels accepted by `--diagnostic-verbosity`.
pub const VERBOSITY_LEVELS: [&str; 6] =
    ["Trace", "Debug", "Information", "Warning", "Error", "Critical"];

const SERVER_PROTOCOL: &str = "jsonrpc";

static TIMEOUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)?[hHmMsS]?$").expect("static regex must compile")
});

static PLATFORM_OPTIONS: LazyLock<Vec<CommandLineOption>> = LazyLock::new(|| {
    let visible = [
        (HELP_OPTION, "Show the command line help.", Arity::ZERO),
        (HELP_SHORT_OPTION, "Show the command line help.", Arity::ZERO),
        (INFO_OPTION, "Display information about the registered providers.", Arity::ZERO),
        (RESULTS_DIRECTORY_OPTION, "The directory where the test results are going to be placed.", Arity::ONE),
        (DIAGNOSTIC_OPTION, "Enable the diagnostic logging.", Arity::ZERO),
        (DIAGNOSTIC_OUTPUT_DIRECTORY_OPTION, "Output directory of the diagnostic logging.", Arity::ONE),
        (DIAGNOSTIC_OUTPUT_FILEPREFIX_OPTION, "Prefix for the log file name.", Arity::ONE),
        (DIAGNOSTIC_VERBOSITY_OPTION, "Define the level of the verbosity for the --diagnostic.", Arity::ONE),
        (LIST_TESTS_OPTION, "List available tests.", Arity::ZERO),
        (MINIMUM_EXPECTED_TESTS_OPTION, "Specifies the minimum number of tests that are expected to run.", Arity::ONE),
        (MAXIMUM_EXPECTED_TESTS_OPTION, "Specifies the maximum number of tests that are expected to run.", Arity::ONE),
        (TIMEOUT_OPTION, "A global test execution timeout. Takes one argument as string in the format <value>[h|m|s].", Arity::ONE),
        (NO_BANNER_OPTION, "Do not display the startup banner.", Arity::ZERO),
    ];
    let hidden = [
        (SERVER_OPTION, "Run in server mode.", Arity::ZERO_OR_ONE),
        (PORT_OPTION, "Port the server listens on.", Arity::ONE),
        (CLIENT_PORT_OPTION, "Port of the client to connect to.", Arity::ONE),
        (CLIENT_HOST_OPTION, "Host of the client to connect to.", Arity::ONE),
        (TEST_HOST_CONTROLLER_PID_OPTION, "Process id of the test host controller.", Arity::ONE),
    ];

    let build = |(name, description, arity): (&str, &str, Arity)| {
        CommandLineOption::new(name, description, arity)
            .expect("built-in option definitions must be valid")
            .built_in()
    };
    visible
        .into_iter()
        .map(build)
        .chain(hidden.into_iter().map(|def| build(def).hidden()))
        .collect()
});

/// The platform's own options: help, diagnostics, test-count limits and the
/// hidden server handshake options.
///
/// # Examples
///
/// ```
/// use option_engine_validation::{CommandLineOptionsProvider, PlatformOptionsProvider};
///
/// let provider = PlatformOptionsProvider::new();
/// assert_eq!(provider.uid(), "platform");
/// assert!(provider.command_line_options().iter().all(|o| o.is_built_in()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformOptionsProvider;

impl PlatformOptionsProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandLineOptionsProvider for PlatformOptionsProvider {
    fn uid(&self) -> &str {
        "platform"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn display_name(&self) -> &str {
        "Platform command line provider"
    }

    fn description(&self) -> &str {
        "Built-in options of the test platform"
    }

    fn command_line_options(&self) -> Vec<CommandLineOption> {
        PLATFORM_OPTIONS.clone()
    }

    async fn validate_option_arguments(
        &self,
        option: &CommandLineOption,
        arguments: &[String],
    ) -> ValidationResult {
        let single = match arguments {
            [value] => Some(value.as_str()),
            _ => None,
        };

        match option.name() {
            DIAGNOSTIC_VERBOSITY_OPTION => {
                let known = single
                    .is_some_and(|v| VERBOSITY_LEVELS.iter().any(|l| l.eq_ignore_ascii_case(v)));
                if known {
                    ValidationResult::Valid
                } else {
                    let levels = VERBOSITY_LEVELS
                        .iter()
                        .map(|l| format!("'{l}'"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    ValidationResult::invalid(format!(
                        "'--{DIAGNOSTIC_VERBOSITY_OPTION}' expects a single level argument ({levels})"
                    ))
                }
            }
            name @ (MINIMUM_EXPECTED_TESTS_OPTION | MAXIMUM_EXPECTED_TESTS_OPTION) => {
                if single.and_then(parse_positive).is_some() {
                    ValidationResult::Valid
                } else {
                    ValidationResult::invalid(format!(
                        "'--{name}' expects a single positive integer argument (e.g. '--{name} 10')"
                    ))
                }
            }
            TIMEOUT_OPTION => {
                if single.is_some_and(|v| TIMEOUT_RE.is_match(v)) {
                    ValidationResult::Valid
                } else {
                    ValidationResult::invalid(format!(
                        "'--{TIMEOUT_OPTION}' expects a single argument in the format <value>[h|m|s] where 'value' is a number"
                    ))
                }
            }
            SERVER_OPTION => {
                if arguments.iter().all(|a| a.eq_ignore_ascii_case(SERVER_PROTOCOL)) {
                    ValidationResult::Valid
                } else {
                    ValidationResult::invalid(format!(
                        "'--{SERVER_OPTION}' only accepts '{SERVER_PROTOCOL}' as protocol"
                    ))
                }
            }
            name @ (PORT_OPTION | CLIENT_PORT_OPTION) => {
                if single.is_some_and(|v| v.parse::<u16>().is_ok()) {
                    ValidationResult::Valid
                } else {
                    ValidationResult::invalid(format!(
                        "'--{name}' expects a single integer port number between 0 and 65535"
                    ))
                }
            }
            TEST_HOST_CONTROLLER_PID_OPTION => {
                if single.is_some_and(|v| v.parse::<i32>().is_ok()) {
                    ValidationResult::Valid
                } else {
                    ValidationResult::invalid(format!(
                        "'--{TEST_HOST_CONTROLLER_PID_OPTION}' expects a single integer process id"
                    ))
                }
            }
            _ => ValidationResult::Valid,
        }
    }

    async fn validate_command_line_options(
        &self,
        options: &dyn CommandLineOptions,
    ) -> ValidationResult {
        let mut results = Vec::new();

        for dependent in [
            DIAGNOSTIC_OUTPUT_DIRECTORY_OPTION,
            DIAGNOSTIC_OUTPUT_FILEPREFIX_OPTION,
            DIAGNOSTIC_VERBOSITY_OPTION,
        ] {
            if options.is_option_set(dependent) && !options.is_option_set(DIAGNOSTIC_OPTION) {
                results.push(ValidationResult::invalid(format!(
                    "'--{dependent}' requires '--{DIAGNOSTIC_OPTION}' to be provided"
                )));
            }
        }

        if options.is_option_set(LIST_TESTS_OPTION)
            && options.is_option_set(MINIMUM_EXPECTED_TESTS_OPTION)
        {
            results.push(ValidationResult::invalid(format!(
                "'--{LIST_TESTS_OPTION}' and '--{MINIMUM_EXPECTED_TESTS_OPTION}' are incompatible options"
            )));
        }

        let minimum = single_argument(options, MINIMUM_EXPECTED_TESTS_OPTION).and_then(parse_positive);
        let maximum = single_argument(options, MAXIMUM_EXPECTED_TESTS_OPTION).and_then(parse_positive);
        if let (Some(min), Some(max)) = (minimum, maximum) {
            if min > max {
                results.push(ValidationResult::invalid(format!(
                    "'--{MINIMUM_EXPECTED_TESTS_OPTION}' ({min}) cannot be greater than '--{MAXIMUM_EXPECTED_TESTS_OPTION}' ({max})"
                )));
            }
        }

        if options.is_option_set(PORT_OPTION) && options.is_option_set(CLIENT_PORT_OPTION) {
            results.push(ValidationResult::invalid(format!(
                "'--{PORT_OPTION}' and '--{CLIENT_PORT_OPTION}' cannot be used together"
            )));
        }

        if options.is_option_set(CLIENT_PORT_OPTION) && !options.is_option_set(SERVER_OPTION) {
            results.push(ValidationResult::invalid(format!(
                "'--{CLIENT_PORT_OPTION}' requires '--{SERVER_OPTION}' to be provided"
            )));
        }

        ValidationResult::combine(results)
    }
}

fn single_argument<'a>(options: &'a dyn CommandLineOptions, name: &str) -> Option<&'a str> {
    match options.try_get_option_argument_list(name)?.as_slice() {
        [value] => Some(*value),
        _ => None,
    }
}

fn parse_positive(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().filter(|n| *n > 0)
}
