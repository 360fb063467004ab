//! The staged validation pipeline.
//!
//! Stages run strictly in order. A stage collects every problem it finds;
//! the first stage with findings ends the run, because later stages rely on
//! the invariants earlier ones establish (for example, the arity stage
//! assumes every option name is known).
//!
//! 1. lexical errors from the parser
//! 2. reserved prefix used by an extension option
//! 3. extension option shadowing a system option
//! 4. option declared by several extensions
//! 5. unknown options on the command line
//! 6. argument counts against declared arity
//! 7. provider per-option argument validation
//! 8. provider whole-configuration validation (system providers first)

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info};

use option_engine_core::{OPTION_PREFIX, ParseResult};

use crate::catalog::OptionCatalog;
use crate::config::PipelineConfig;
use crate::issues::{IssueKind, ValidationFailure, ValidationIssue, ValidationStage};
use crate::result::ValidationResult;

/// Remediation advice attached to duplicate-declaration failures.
pub const DUPLICATE_DECLARATION_HINT: &str =
    "You can fix the previous option clash by overriding the option name using the configuration file";

type StageOutcome = Result<(), ValidationFailure>;

/// Validates a parse result against an option catalog.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use option_engine_core::parse;
/// use option_engine_validation::{
///     OptionCatalog, PlatformOptionsProvider, ValidationPipeline, ValidationStage,
/// };
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let catalog = OptionCatalog::new(vec![Arc::new(PlatformOptionsProvider::new())], vec![], None);
/// let pipeline = ValidationPipeline::default();
///
/// assert!(pipeline.validate(&parse(["--info"]), &catalog).await.is_ok());
///
/// let failure = pipeline.validate(&parse(["--doesnotexist"]), &catalog).await.unwrap_err();
/// assert_eq!(failure.stage, ValidationStage::UnknownOption);
/// assert!(failure.render().contains("'--doesnotexist'"));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationPipeline {
    config: PipelineConfig,
}

impl ValidationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the findings of the first stage that reports any.
    pub async fn validate(
        &self,
        parse_result: &ParseResult,
        catalog: &OptionCatalog,
    ) -> Result<(), ValidationFailure> {
        debug!(stage = %ValidationStage::Lexical, "Running validation stage");
        check_lexical(parse_result)?;
        debug!(stage = %ValidationStage::ReservedPrefix, "Running validation stage");
        self.check_reserved_prefix(catalog)?;
        debug!(stage = %ValidationStage::ReservedName, "Running validation stage");
        check_reserved_names(catalog)?;
        debug!(stage = %ValidationStage::DuplicateDeclaration, "Running validation stage");
        check_duplicate_declarations(catalog)?;
        debug!(stage = %ValidationStage::UnknownOption, "Running validation stage");
        check_unknown_options(parse_result, catalog)?;
        debug!(stage = %ValidationStage::Arity, "Running validation stage");
        check_arity(parse_result, catalog)?;
        debug!(stage = %ValidationStage::OptionArguments, "Running validation stage");
        check_option_arguments(parse_result, catalog).await?;
        debug!(stage = %ValidationStage::Configuration, "Running validation stage");
        check_configuration(parse_result, catalog).await?;
        Ok(())
    }

    /// Returns `true` when `name` falls in the reserved namespace.
    ///
    /// The check is case-insensitive and applies to the name with and
    /// without its leading dashes.
    pub fn is_reserved(&self, name: &str) -> bool {
        let prefix = self.config.reserved_prefix.to_ascii_lowercase();
        if prefix.is_empty() {
            return false;
        }
        let raw = name.to_ascii_lowercase();
        let trimmed = raw.trim_start_matches(OPTION_PREFIX);
        trimmed.starts_with(&prefix) || raw.starts_with(&format!("{OPTION_PREFIX}{prefix}"))
    }

    fn check_reserved_prefix(&self, catalog: &OptionCatalog) -> StageOutcome {
        let mut issues = Vec::new();
        for entry in catalog.extension_entries() {
            for option in entry.options() {
                if option.is_built_in() || !self.is_reserved(option.name()) {
                    continue;
                }
                let display = entry.provider().display_name();
                issues.push(
                    ValidationIssue::new(
                        IssueKind::ReservedPrefixViolation,
                        format!(
                            "Option '--{}' is declared by extension '{}' using reserved prefix '--{}'",
                            option.name(),
                            display,
                            self.config.reserved_prefix
                        ),
                    )
                    .with_option(option.name())
                    .with_providers([display]),
                );
            }
        }
        finish(ValidationStage::ReservedPrefix, issues)
    }
}

fn finish(stage: ValidationStage, issues: Vec<ValidationIssue>) -> StageOutcome {
    if issues.is_empty() {
        return Ok(());
    }
    info!(stage = %stage, issues = issues.len(), "Validation stage failed");
    Err(ValidationFailure::new(stage, issues))
}

fn check_lexical(parse_result: &ParseResult) -> StageOutcome {
    let issues = parse_result
        .errors()
        .iter()
        .map(|e| ValidationIssue::new(IssueKind::LexicalError, e.as_str()))
        .collect();
    finish(ValidationStage::Lexical, issues)
}

fn check_reserved_names(catalog: &OptionCatalog) -> StageOutcome {
    let mut system_names: HashMap<&str, &str> = HashMap::new();
    for entry in catalog.system_entries() {
        for option in entry.options() {
            system_names
                .entry(option.name())
                .or_insert(entry.provider().display_name());
        }
    }

    let mut collisions: BTreeMap<&str, BTreeSet<(&str, &str)>> = BTreeMap::new();
    for entry in catalog.extension_entries() {
        let provider = entry.provider();
        for option in entry.options() {
            if system_names.contains_key(option.name()) {
                collisions
                    .entry(option.name())
                    .or_default()
                    .insert((provider.display_name(), provider.uid()));
            }
        }
    }

    let issues = collisions
        .into_iter()
        .map(|(name, extensions)| {
            let system = system_names[name];
            let extensions = provider_labels(&extensions);
            ValidationIssue::new(
                IssueKind::ReservedNameCollision,
                format!(
                    "Option '--{name}' is reserved by '{system}' and cannot be used by providers: {}",
                    quote_list(&extensions)
                ),
            )
            .with_option(name)
            .with_providers(std::iter::once(system.to_string()).chain(extensions))
        })
        .collect();
    finish(ValidationStage::ReservedName, issues)
}

fn check_duplicate_declarations(catalog: &OptionCatalog) -> StageOutcome {
    let mut declarations: BTreeMap<&str, BTreeSet<(&str, &str)>> = BTreeMap::new();
    for entry in catalog.extension_entries() {
        let provider = entry.provider();
        for option in entry.options() {
            declarations
                .entry(option.name())
                .or_default()
                .insert((provider.display_name(), provider.uid()));
        }
    }

    let issues: Vec<ValidationIssue> = declarations
        .into_iter()
        .filter(|(_, providers)| providers.len() > 1)
        .map(|(name, providers)| {
            let names = provider_labels(&providers);
            ValidationIssue::new(
                IssueKind::DuplicateDeclaration,
                format!(
                    "Option '--{name}' is declared by multiple extensions: {}",
                    quote_list(&names)
                ),
            )
            .with_option(name)
            .with_providers(names)
        })
        .collect();

    finish(ValidationStage::DuplicateDeclaration, issues)
        .map_err(|failure| failure.with_hint(DUPLICATE_DECLARATION_HINT))
}

fn check_unknown_options(parse_result: &ParseResult, catalog: &OptionCatalog) -> StageOutcome {
    let mut reported = BTreeSet::new();
    let mut issues = Vec::new();
    for record in parse_result.options() {
        if catalog.contains(&record.name) || !reported.insert(record.name.as_str()) {
            continue;
        }
        issues.push(
            ValidationIssue::new(
                IssueKind::UnknownOption,
                format!("Unknown option '--{}'", record.name),
            )
            .with_option(&record.name),
        );
    }
    finish(ValidationStage::UnknownOption, issues)
}

fn check_arity(parse_result: &ParseResult, catalog: &OptionCatalog) -> StageOutcome {
    // Repeated occurrences of one option are summed.
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in parse_result.options() {
        let count = counts.entry(record.name.as_str()).or_insert_with(|| {
            order.push(record.name.as_str());
            0
        });
        *count += record.arguments.len();
    }

    let mut issues = Vec::new();
    for name in order {
        let Some((entry, option)) = catalog.lookup(name) else {
            continue;
        };
        let total = counts[name];
        let arity = option.arity();
        let provider = entry.provider();
        let expectation = if total > arity.max && arity.max == 0 {
            "expects no arguments".to_string()
        } else if total < arity.min {
            format!("expects at least {} arguments", arity.min)
        } else if total > arity.max {
            format!("expects at most {} arguments", arity.max)
        } else {
            continue;
        };
        issues.push(
            ValidationIssue::new(
                IssueKind::ArityViolation,
                format!(
                    "Option '--{name}' from provider '{}' (UID: {}) {expectation}",
                    provider.display_name(),
                    provider.uid()
                ),
            )
            .with_option(name)
            .with_providers([provider.display_name()]),
        );
    }
    finish(ValidationStage::Arity, issues)
}

async fn check_option_arguments(parse_result: &ParseResult, catalog: &OptionCatalog) -> StageOutcome {
    // Identical (provider, option, arguments) calls are answered once per run.
    let mut memo: HashMap<(&str, &str, &[String]), ValidationResult> = HashMap::new();
    let mut issues = Vec::new();

    for record in parse_result.options() {
        let Some((entry, option)) = catalog.lookup(&record.name) else {
            continue;
        };
        let provider = entry.provider();
        let key = (provider.uid(), option.name(), record.arguments.as_slice());
        let result = match memo.get(&key) {
            Some(cached) => cached.clone(),
            None => {
                let result = provider
                    .validate_option_arguments(option, &record.arguments)
                    .await;
                memo.insert(key, result.clone());
                result
            }
        };

        if let ValidationResult::Invalid(message) = result {
            issues.push(
                ValidationIssue::new(IssueKind::OptionArgumentInvalid, message)
                    .with_option(option.name())
                    .with_providers([provider.display_name()]),
            );
        }
    }
    finish(ValidationStage::OptionArguments, issues)
}

async fn check_configuration(parse_result: &ParseResult, catalog: &OptionCatalog) -> StageOutcome {
    let mut issues = Vec::new();
    let entries = catalog.system_entries().chain(catalog.extension_entries());
    for entry in entries {
        let provider = entry.provider();
        if let ValidationResult::Invalid(message) =
            provider.validate_command_line_options(parse_result).await
        {
            issues.push(
                ValidationIssue::new(IssueKind::ConfigurationInvalid, message)
                    .with_providers([provider.display_name()]),
            );
        }
    }
    finish(ValidationStage::Configuration, issues)
}

/// Display names of `(display name, uid)` pairs, with the uid appended to
/// any display name shared by more than one provider.
fn provider_labels(providers: &BTreeSet<(&str, &str)>) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (display, _) in providers {
        *seen.entry(*display).or_default() += 1;
    }
    providers
        .iter()
        .map(|(display, uid)| {
            if seen[display] > 1 {
                format!("{display} (UID: {uid})")
            } else {
                display.to_string()
            }
        })
        .collect()
}

fn quote_list<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> String {
    names
        .into_iter()
        .map(|n| format!("'{}'", n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
