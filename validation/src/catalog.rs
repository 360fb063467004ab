//! Aggregated view of every option declared by the active providers.
//!
//! The catalog owns one [`ProviderEntry`] per provider. Each entry memoizes
//! the provider's option list the first time it is asked for, so the
//! pipeline can walk options repeatedly without re-enumerating providers.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use option_engine_core::CommandLineOption;

use crate::provider::CommandLineOptionsProvider;

/// Whether a provider belongs to the platform or to an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOrigin {
    System,
    Extension,
}

impl fmt::Display for ProviderOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// One registered provider and its cached option list.
///
/// The cache is filled once under a single-writer assumption; `OnceLock`
/// keeps it sound if providers are ever validated from several threads.
pub struct ProviderEntry {
    provider: Arc<dyn CommandLineOptionsProvider>,
    origin: ProviderOrigin,
    options: OnceLock<Vec<CommandLineOption>>,
}

impl ProviderEntry {
    fn new(provider: Arc<dyn CommandLineOptionsProvider>, origin: ProviderOrigin) -> Self {
        Self {
            provider,
            origin,
            options: OnceLock::new(),
        }
    }

    pub fn provider(&self) -> &dyn CommandLineOptionsProvider {
        self.provider.as_ref()
    }

    pub fn origin(&self) -> ProviderOrigin {
        self.origin
    }

    /// Declared options, enumerated on first call and cached afterwards.
    pub fn options(&self) -> &[CommandLineOption] {
        self.options
            .get_or_init(|| self.provider.command_line_options())
    }
}

impl fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("uid", &self.provider.uid())
            .field("origin", &self.origin)
            .field("options_cached", &self.options.get().is_some())
            .finish()
    }
}

/// Every option known for one invocation, grouped by provider.
///
/// Entries keep registration order: system providers first, then extension
/// providers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use option_engine_validation::{OptionCatalog, PlatformOptionsProvider};
///
/// let catalog = OptionCatalog::new(vec![Arc::new(PlatformOptionsProvider::new())], vec![], None);
/// let (entry, option) = catalog.lookup("help").unwrap();
/// assert_eq!(entry.provider().uid(), "platform");
/// assert_eq!(option.name(), "help");
/// assert!(catalog.lookup("nope").is_none());
/// ```
#[derive(Debug)]
pub struct OptionCatalog {
    entries: Vec<ProviderEntry>,
    index: OnceLock<HashMap<String, (usize, usize)>>,
}

impl OptionCatalog {
    /// Builds a catalog from providers that have already passed their
    /// enablement check.
    ///
    /// Providers scoped to a tool are kept only when `tool` names that tool.
    pub fn new(
        system: Vec<Arc<dyn CommandLineOptionsProvider>>,
        extensions: Vec<Arc<dyn CommandLineOptionsProvider>>,
        tool: Option<&str>,
    ) -> Self {
        let in_scope = |provider: &Arc<dyn CommandLineOptionsProvider>| match provider.tool_name() {
            None => true,
            Some(scope) => {
                let visible = tool == Some(scope);
                if !visible {
                    debug!(provider = %provider.uid(), tool = scope, "Provider out of tool scope");
                }
                visible
            }
        };

        let entries = system
            .into_iter()
            .filter(|p| in_scope(p))
            .map(|p| ProviderEntry::new(p, ProviderOrigin::System))
            .chain(
                extensions
                    .into_iter()
                    .filter(|p| in_scope(p))
                    .map(|p| ProviderEntry::new(p, ProviderOrigin::Extension)),
            )
            .collect();

        Self {
            entries,
            index: OnceLock::new(),
        }
    }

    /// Runs every provider's enablement check, then builds the catalog from
    /// the enabled ones.
    pub async fn resolve(
        system: Vec<Arc<dyn CommandLineOptionsProvider>>,
        extensions: Vec<Arc<dyn CommandLineOptionsProvider>>,
        tool: Option<&str>,
    ) -> Self {
        let system = retain_enabled(system).await;
        let extensions = retain_enabled(extensions).await;
        Self::new(system, extensions, tool)
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    pub fn system_entries(&self) -> impl Iterator<Item = &ProviderEntry> {
        self.entries_of(ProviderOrigin::System)
    }

    pub fn extension_entries(&self) -> impl Iterator<Item = &ProviderEntry> {
        self.entries_of(ProviderOrigin::Extension)
    }

    fn entries_of(&self, origin: ProviderOrigin) -> impl Iterator<Item = &ProviderEntry> {
        self.entries.iter().filter(move |e| e.origin == origin)
    }

    /// Every `(provider, option)` pair in registration order.
    pub fn options(&self) -> impl Iterator<Item = (&ProviderEntry, &CommandLineOption)> {
        self.entries
            .iter()
            .flat_map(|entry| entry.options().iter().map(move |option| (entry, option)))
    }

    /// Finds the declaration of `name`.
    ///
    /// When several providers declare the same name the first registered
    /// one wins; validation rejects such collisions before lookups matter.
    pub fn lookup(&self, name: &str) -> Option<(&ProviderEntry, &CommandLineOption)> {
        let (entry_idx, option_idx) = *self.index().get(name)?;
        let entry = &self.entries[entry_idx];
        Some((entry, &entry.options()[option_idx]))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index().contains_key(name)
    }

    fn index(&self) -> &HashMap<String, (usize, usize)> {
        self.index.get_or_init(|| {
            let mut index = HashMap::new();
            for (entry_idx, entry) in self.entries.iter().enumerate() {
                for (option_idx, option) in entry.options().iter().enumerate() {
                    index
                        .entry(option.name().to_string())
                        .or_insert((entry_idx, option_idx));
                }
            }
            index
        })
    }
}

async fn retain_enabled(
    providers: Vec<Arc<dyn CommandLineOptionsProvider>>,
) -> Vec<Arc<dyn CommandLineOptionsProvider>> {
    let mut enabled = Vec::with_capacity(providers.len());
    for provider in providers {
        if provider.is_enabled().await {
            enabled.push(provider);
        } else {
            debug!(provider = %provider.uid(), "Provider disabled");
        }
    }
    enabled
}
