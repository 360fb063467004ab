//! Structured validation findings and their rendered report.
//!
//! Stages collect [`ValidationIssue`]s; text is produced only when a
//! [`ValidationFailure`] is rendered for the user.

use std::fmt;

use crate::result::{ValidationResult, to_trimmed_string};

/// Header line of the rendered report.
pub const REPORT_HEADER: &str = "Invalid command line arguments:";

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationStage {
    Lexical,
    ReservedPrefix,
    ReservedName,
    DuplicateDeclaration,
    UnknownOption,
    Arity,
    OptionArguments,
    Configuration,
}

impl ValidationStage {
    pub const ALL: [ValidationStage; 8] = [
        Self::Lexical,
        Self::ReservedPrefix,
        Self::ReservedName,
        Self::DuplicateDeclaration,
        Self::UnknownOption,
        Self::Arity,
        Self::OptionArguments,
        Self::Configuration,
    ];
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lexical => "lexical",
            Self::ReservedPrefix => "reserved_prefix",
            Self::ReservedName => "reserved_name",
            Self::DuplicateDeclaration => "duplicate_declaration",
            Self::UnknownOption => "unknown_option",
            Self::Arity => "arity",
            Self::OptionArguments => "option_arguments",
            Self::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    LexicalError,
    ReservedPrefixViolation,
    ReservedNameCollision,
    DuplicateDeclaration,
    UnknownOption,
    ArityViolation,
    OptionArgumentInvalid,
    ConfigurationInvalid,
}

/// One finding, with the identifiers it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub message: String,
    /// Option name involved, without prefix.
    pub option: Option<String>,
    /// Display names of the providers involved.
    pub providers: Vec<String>,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            option: None,
            providers: Vec::new(),
        }
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = Some(option.into());
        self
    }

    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers.extend(providers.into_iter().map(Into::into));
        self
    }
}

/// The findings of the first stage that failed.
///
/// # Examples
///
/// ```
/// use option_engine_validation::{IssueKind, ValidationFailure, ValidationIssue, ValidationStage};
///
/// let failure = ValidationFailure::new(
///     ValidationStage::UnknownOption,
///     vec![ValidationIssue::new(IssueKind::UnknownOption, "Unknown option '--nope'")],
/// );
/// assert_eq!(failure.render(), "Invalid command line arguments:\n  - Unknown option '--nope'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub stage: ValidationStage,
    pub issues: Vec<ValidationIssue>,
    /// Remediation advice printed after the findings.
    pub hint: Option<String>,
}

impl ValidationFailure {
    pub fn new(stage: ValidationStage, issues: Vec<ValidationIssue>) -> Self {
        Self {
            stage,
            issues,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Messages joined into one aggregate, without header or bullets.
    pub fn message(&self) -> String {
        let mut lines: Vec<&str> = self.issues.iter().map(|i| i.message.as_str()).collect();
        if let Some(hint) = &self.hint {
            lines.push(hint);
        }
        to_trimmed_string(&lines)
    }

    /// Header line followed by one bullet per finding. Continuation lines of
    /// multi-line messages are indented under their bullet.
    pub fn render(&self) -> String {
        let mut out = vec![REPORT_HEADER.to_string()];
        for issue in &self.issues {
            let text = to_trimmed_string(&[issue.message.as_str()]);
            for (i, line) in text.lines().enumerate() {
                if i == 0 {
                    out.push(format!("  - {line}"));
                } else {
                    out.push(format!("    {line}"));
                }
            }
        }
        if let Some(hint) = &self.hint {
            out.push(hint.clone());
        }
        to_trimmed_string(&out)
    }

    pub fn to_validation_result(&self) -> ValidationResult {
        ValidationResult::Invalid(self.message())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for ValidationFailure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_multi_line_issue() {
        let failure = ValidationFailure::new(
            ValidationStage::Configuration,
            vec![
                ValidationIssue::new(IssueKind::ConfigurationInvalid, "first\nsecond\n"),
                ValidationIssue::new(IssueKind::ConfigurationInvalid, "third"),
            ],
        );
        assert_eq!(
            failure.render(),
            "Invalid command line arguments:\n  - first\n    second\n  - third"
        );
        assert_eq!(failure.message(), "first\nsecond\nthird");
    }

    #[test]
    fn test_render_with_hint() {
        let failure = ValidationFailure::new(
            ValidationStage::DuplicateDeclaration,
            vec![ValidationIssue::new(IssueKind::DuplicateDeclaration, "dup")],
        )
        .with_hint("fix it");
        assert_eq!(failure.render(), "Invalid command line arguments:\n  - dup\nfix it");
        assert_eq!(
            failure.to_validation_result(),
            ValidationResult::Invalid("dup\nfix it".to_string())
        );
    }

    #[test]
    fn test_stage_order() {
        let mut sorted = ValidationStage::ALL;
        sorted.sort();
        assert_eq!(sorted, ValidationStage::ALL);
        assert_eq!(ValidationStage::Arity.to_string(), "arity");
    }
}
