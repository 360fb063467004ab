//! Engine configuration.
//!
//! Defines the YAML-serializable configuration that sets the reserved option
//! namespace and declares extension providers without writing code.
//!
//! # Example YAML
//!
//! ```yaml
//! reserved_prefix: internal
//! tool: null
//! extensions:
//!   - uid: trx-report
//!     version: 1.0.0
//!     display_name: TRX report generator
//!     description: Produces TRX test reports
//!     options:
//!       - name: report-trx
//!         description: Enable TRX report generation
//!       - name: report-trx-filename
//!         description: Name of the generated TRX file
//!         arity: { min: 1, max: 1 }
//!       - name: report-trx-format
//!         arity: { min: 1, max: 1 }
//!         choices: [v1, v2]
//!     requires:
//!       - [report-trx-filename, report-trx]
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use option_engine_core::Arity;

use crate::declared::DeclaredProvider;
use crate::error::Result;
use crate::provider::CommandLineOptionsProvider;

/// Reserved namespace used when none is configured.
pub const DEFAULT_RESERVED_PREFIX: &str = "internal";

/// Settings passed to the [`ValidationPipeline`](crate::ValidationPipeline).
///
/// # Examples
///
/// ```
/// use option_engine_validation::PipelineConfig;
///
/// assert_eq!(PipelineConfig::default().reserved_prefix, "internal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Options starting with this token (case-insensitive) are reserved for
    /// built-in declarations.
    pub reserved_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
        }
    }
}

/// One option of a declared extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_arity")]
    pub arity: Arity,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub built_in: bool,
    /// Accepted argument values, compared case-insensitively. Empty means
    /// any value.
    #[serde(default)]
    pub choices: Vec<String>,
}

/// An extension provider declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionConfig {
    pub uid: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Tool this extension is scoped to.
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub options: Vec<OptionConfig>,
    /// `(option, required)` pairs: when `option` is set, `required` must be too.
    #[serde(default)]
    pub requires: Vec<(String, String)>,
}

/// Top-level engine configuration.
///
/// # Examples
///
/// ```no_run
/// use option_engine_validation::EngineConfig;
///
/// let config = EngineConfig::load("optcheck.yml").unwrap();
/// let providers = config.extension_providers().unwrap();
/// println!("{} extension providers", providers.len());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,
    /// Tool the host runs as when the command line does not name one.
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub extensions: Vec<ExtensionConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reserved_prefix: default_reserved_prefix(),
            tool: None,
            extensions: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::CommandLineError::IoError) if the file
    /// cannot be read, or [`YamlError`](crate::CommandLineError::YamlError)
    /// if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::CommandLineError::IoError) if the file
    /// cannot be written, or [`YamlError`](crate::CommandLineError::YamlError)
    /// if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            reserved_prefix: self.reserved_prefix.clone(),
        }
    }

    /// Builds one provider per declared extension, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOption`](crate::CommandLineError::InvalidOption) when
    /// an option has a malformed name or arity.
    pub fn extension_providers(&self) -> Result<Vec<Arc<dyn CommandLineOptionsProvider>>> {
        self.extensions
            .iter()
            .map(|ext| {
                DeclaredProvider::from_config(ext)
                    .map(|p| Arc::new(p) as Arc<dyn CommandLineOptionsProvider>)
            })
            .collect()
    }
}

fn default_arity() -> Arity {
    Arity::ZERO
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_reserved_prefix() -> String {
    DEFAULT_RESERVED_PREFIX.to_string()
}
