//! Text rendering of the catalog for `--help` and `--info`.

use crate::catalog::{OptionCatalog, ProviderEntry, ProviderOrigin};

/// Lists the visible options of every provider, system providers first.
///
/// Providers without visible options are omitted.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use option_engine_validation::{OptionCatalog, PlatformOptionsProvider, render_help};
///
/// let catalog = OptionCatalog::new(vec![Arc::new(PlatformOptionsProvider::new())], vec![], None);
/// let help = render_help(&catalog);
/// assert!(help.contains("--results-directory"));
/// assert!(!help.contains("--server"));
/// ```
pub fn render_help(catalog: &OptionCatalog) -> String {
    let width = catalog
        .options()
        .filter(|(_, option)| !option.is_hidden())
        .map(|(_, option)| option.name().len() + 2)
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for origin in [ProviderOrigin::System, ProviderOrigin::Extension] {
        let entries: Vec<&ProviderEntry> = catalog
            .entries()
            .iter()
            .filter(|e| e.origin() == origin && e.options().iter().any(|o| !o.is_hidden()))
            .collect();
        if entries.is_empty() {
            continue;
        }

        let heading = match origin {
            ProviderOrigin::System => "Options:",
            ProviderOrigin::Extension => "Extension options:",
        };
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("{heading}\n"));

        for entry in entries {
            out.push_str(&format!("  {}\n", entry.provider().display_name()));
            for option in entry.options().iter().filter(|o| !o.is_hidden()) {
                let flag = format!("--{}", option.name());
                out.push_str(&format!(
                    "    {flag:<width$}  [{}]  {}\n",
                    option.arity(),
                    option.description()
                ));
            }
        }
    }
    out
}

/// Describes every provider in the catalog, including hidden options.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use option_engine_validation::{OptionCatalog, PlatformOptionsProvider, render_info};
///
/// let catalog = OptionCatalog::new(vec![Arc::new(PlatformOptionsProvider::new())], vec![], None);
/// let info = render_info(&catalog);
/// assert!(info.contains("Uid: platform"));
/// assert!(info.contains("--server (hidden)"));
/// ```
pub fn render_info(catalog: &OptionCatalog) -> String {
    let mut out = String::from("Registered command line providers:\n");
    for entry in catalog.entries() {
        let provider = entry.provider();
        out.push_str(&format!("  {} ({})\n", provider.display_name(), entry.origin()));
        out.push_str(&format!("    Uid: {}\n", provider.uid()));
        out.push_str(&format!("    Version: {}\n", provider.version()));
        if !provider.description().is_empty() {
            out.push_str(&format!("    Description: {}\n", provider.description()));
        }
        if let Some(tool) = provider.tool_name() {
            out.push_str(&format!("    Tool: {tool}\n"));
        }
        out.push_str("    Options:\n");
        for option in entry.options() {
            let marker = if option.is_hidden() { " (hidden)" } else { "" };
            out.push_str(&format!("      --{}{marker}\n", option.name()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::builtin::PlatformOptionsProvider;
    use crate::config::EngineConfig;

    fn catalog_with_extension() -> OptionCatalog {
        let config: EngineConfig = serde_yaml::from_str(
            r#"
extensions:
  - uid: trx
    display_name: TRX report
    options:
      - name: report-trx
        description: Enable TRX
      - name: report-trx-secret
        hidden: true
"#,
        )
        .unwrap();
        OptionCatalog::new(
            vec![Arc::new(PlatformOptionsProvider::new())],
            config.extension_providers().unwrap(),
            None,
        )
    }

    #[test]
    fn test_help_lists_system_before_extensions() {
        let help = render_help(&catalog_with_extension());
        let system = help.find("Options:").unwrap();
        let extension = help.find("Extension options:").unwrap();
        assert!(system < extension);
        assert!(help.contains("TRX report"));
        assert!(help.contains("[0]  Enable TRX"));
        assert!(!help.contains("report-trx-secret"));
    }

    #[test]
    fn test_help_of_empty_catalog() {
        assert_eq!(render_help(&OptionCatalog::new(vec![], vec![], None)), "");
    }

    #[test]
    fn test_info_marks_hidden_options() {
        let info = render_info(&catalog_with_extension());
        assert!(info.contains("  TRX report (extension)"));
        assert!(info.contains("--report-trx-secret (hidden)"));
        assert!(info.contains("Platform command line provider (system)"));
    }
}
