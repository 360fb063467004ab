//! Extension providers declared in configuration instead of code.

use std::collections::HashMap;

use async_trait::async_trait;

use option_engine_core::CommandLineOption;

use crate::config::ExtensionConfig;
use crate::error::Result;
use crate::provider::CommandLineOptionsProvider;
use crate::query::CommandLineOptions;
use crate::result::ValidationResult;

/// A provider whose options, accepted values and option dependencies come
/// from an [`ExtensionConfig`].
#[derive(Debug, Clone)]
pub struct DeclaredProvider {
    uid: String,
    version: String,
    display_name: String,
    description: String,
    tool: Option<String>,
    enabled: bool,
    options: Vec<CommandLineOption>,
    choices: HashMap<String, Vec<String>>,
    requires: Vec<(String, String)>,
}

impl DeclaredProvider {
    /// # Errors
    ///
    /// Returns [`InvalidOption`](crate::CommandLineError::InvalidOption) for
    /// the first malformed option declaration.
    pub fn from_config(config: &ExtensionConfig) -> Result<Self> {
        let mut options = Vec::with_capacity(config.options.len());
        let mut choices = HashMap::new();

        for declared in &config.options {
            let mut option =
                CommandLineOption::new(&declared.name, &declared.description, declared.arity)?;
            if declared.hidden {
                option = option.hidden();
            }
            if declared.built_in {
                option = option.built_in();
            }
            if !declared.choices.is_empty() {
                choices.insert(option.name().to_string(), declared.choices.clone());
            }
            options.push(option);
        }

        Ok(Self {
            uid: config.uid.clone(),
            version: config.version.clone(),
            display_name: config.display_name.clone(),
            description: config.description.clone(),
            tool: config.tool.clone(),
            enabled: config.enabled,
            options,
            choices,
            requires: config.requires.clone(),
        })
    }
}

#[async_trait]
impl CommandLineOptionsProvider for DeclaredProvider {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tool_name(&self) -> Option<&str> {
        self.tool.as_deref()
    }

    fn command_line_options(&self) -> Vec<CommandLineOption> {
        self.options.clone()
    }

    async fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn validate_option_arguments(
        &self,
        option: &CommandLineOption,
        arguments: &[String],
    ) -> ValidationResult {
        let Some(accepted) = self.choices.get(option.name()) else {
            return ValidationResult::Valid;
        };

        ValidationResult::combine(arguments.iter().map(|argument| {
            if accepted.iter().any(|c| c.eq_ignore_ascii_case(argument)) {
                ValidationResult::Valid
            } else {
                let listed = accepted
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                ValidationResult::invalid(format!(
                    "Invalid value '{argument}' for option '--{}'. Accepted values: {listed}",
                    option.name()
                ))
            }
        }))
    }

    async fn validate_command_line_options(
        &self,
        options: &dyn CommandLineOptions,
    ) -> ValidationResult {
        ValidationResult::combine(self.requires.iter().map(|(option, required)| {
            if options.is_option_set(option) && !options.is_option_set(required) {
                ValidationResult::invalid(format!("Option '--{option}' requires '--{required}'"))
            } else {
                ValidationResult::Valid
            }
        }))
    }
}
