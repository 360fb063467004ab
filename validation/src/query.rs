//! Read API over a validated command line.

use option_engine_core::ParseResult;
use tracing::info;

use crate::catalog::OptionCatalog;
use crate::error::{CommandLineError, Result};
use crate::issues::ValidationFailure;
use crate::pipeline::ValidationPipeline;

/// Lookups available to configuration validators and the host application.
///
/// Names may be given with or without leading dashes and are compared
/// case-insensitively.
pub trait CommandLineOptions: Send + Sync {
    fn is_option_set(&self, name: &str) -> bool;

    /// Arguments of every occurrence of `name`, flattened, or `None` when the
    /// option is absent.
    fn try_get_option_argument_list(&self, name: &str) -> Option<Vec<&str>>;
}

impl CommandLineOptions for ParseResult {
    fn is_option_set(&self, name: &str) -> bool {
        ParseResult::is_option_set(self, name)
    }

    fn try_get_option_argument_list(&self, name: &str) -> Option<Vec<&str>> {
        ParseResult::try_get_option_argument_list(self, name)
    }
}

/// Owns a parse result and its catalog, and answers queries once the
/// validation pipeline has accepted them.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use option_engine_core::parse;
/// use option_engine_validation::{
///     CommandLineError, CommandLineHandler, OptionCatalog, PlatformOptionsProvider,
///     ValidationPipeline,
/// };
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let catalog = OptionCatalog::new(vec![Arc::new(PlatformOptionsProvider::new())], vec![], None);
/// let mut handler = CommandLineHandler::new(parse(["--results-directory", "out"]), catalog);
///
/// assert!(matches!(handler.is_option_set("results-directory"), Err(CommandLineError::NotReady)));
///
/// handler.validate(&ValidationPipeline::default()).await.unwrap();
/// assert!(handler.is_option_set("results-directory").unwrap());
/// assert_eq!(
///     handler.try_get_option_argument_list("results-directory").unwrap(),
///     Some(vec!["out"])
/// );
/// # });
/// ```
#[derive(Debug)]
pub struct CommandLineHandler {
    parse_result: ParseResult,
    catalog: OptionCatalog,
    validated: bool,
}

impl CommandLineHandler {
    pub fn new(parse_result: ParseResult, catalog: OptionCatalog) -> Self {
        Self {
            parse_result,
            catalog,
            validated: false,
        }
    }

    /// Runs `pipeline` and, on success, unlocks the query methods.
    ///
    /// # Errors
    ///
    /// Returns the findings of the first failing stage.
    pub async fn validate(
        &mut self,
        pipeline: &ValidationPipeline,
    ) -> std::result::Result<(), ValidationFailure> {
        pipeline.validate(&self.parse_result, &self.catalog).await?;
        self.validated = true;
        info!(
            options = self.parse_result.options().len(),
            "Command line validated"
        );
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.validated
    }

    /// # Errors
    ///
    /// Returns [`CommandLineError::NotReady`] before validation succeeds.
    pub fn is_option_set(&self, name: &str) -> Result<bool> {
        self.ensure_ready()?;
        Ok(self.parse_result.is_option_set(name))
    }

    /// # Errors
    ///
    /// Returns [`CommandLineError::NotReady`] before validation succeeds.
    pub fn try_get_option_argument_list(&self, name: &str) -> Result<Option<Vec<&str>>> {
        self.ensure_ready()?;
        Ok(self.parse_result.try_get_option_argument_list(name))
    }

    /// The validated options as a trait object for provider callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`CommandLineError::NotReady`] before validation succeeds.
    pub fn options(&self) -> Result<&dyn CommandLineOptions> {
        self.ensure_ready()?;
        Ok(&self.parse_result)
    }

    pub fn parse_result(&self) -> &ParseResult {
        &self.parse_result
    }

    pub fn catalog(&self) -> &OptionCatalog {
        &self.catalog
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.validated {
            Ok(())
        } else {
            Err(CommandLineError::NotReady)
        }
    }
}

#[cfg(test)]
mod tests {
    use option_engine_core::parse;

    use super::*;

    #[test]
    fn test_parse_result_as_query_object() {
        let result = parse(["--Foo", "1", "--foo:2"]);
        let options: &dyn CommandLineOptions = &result;
        assert!(options.is_option_set("--FOO"));
        assert_eq!(options.try_get_option_argument_list("foo"), Some(vec!["1", "2"]));
        assert_eq!(options.try_get_option_argument_list("bar"), None);
    }

    #[test]
    fn test_handler_not_ready_before_validation() {
        let handler = CommandLineHandler::new(parse(["--a"]), OptionCatalog::new(vec![], vec![], None));
        assert!(!handler.is_ready());
        assert!(matches!(handler.is_option_set("a"), Err(CommandLineError::NotReady)));
        assert!(matches!(
            handler.try_get_option_argument_list("a"),
            Err(CommandLineError::NotReady)
        ));
        assert!(handler.options().is_err());
    }

    #[tokio::test]
    async fn test_handler_stays_locked_after_failed_validation() {
        let mut handler =
            CommandLineHandler::new(parse(["--unknown"]), OptionCatalog::new(vec![], vec![], None));
        let failure = handler.validate(&ValidationPipeline::default()).await.unwrap_err();
        assert_eq!(failure.issues.len(), 1);
        assert!(!handler.is_ready());
    }
}
