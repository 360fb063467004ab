//! Results returned by pipeline stages and provider validators.

/// Outcome of one validation step.
///
/// # Examples
///
/// ```
/// use option_engine_validation::ValidationResult;
///
/// let combined = ValidationResult::combine([
///     ValidationResult::Valid,
///     ValidationResult::invalid("first problem"),
///     ValidationResult::invalid("second problem\n"),
/// ]);
/// assert_eq!(combined.error_message(), Some("first problem\nsecond problem"));
/// assert!(ValidationResult::combine([ValidationResult::Valid]).is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }

    /// Aggregates results: valid when every input is valid, otherwise the
    /// invalid messages joined by [`to_trimmed_string`].
    pub fn combine(results: impl IntoIterator<Item = ValidationResult>) -> Self {
        let messages: Vec<String> = results
            .into_iter()
            .filter_map(|r| match r {
                Self::Valid => None,
                Self::Invalid(message) => Some(message),
            })
            .collect();

        if messages.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(to_trimmed_string(&messages))
        }
    }
}

/// Joins `lines` with newlines and drops trailing blank lines.
///
/// # Examples
///
/// ```
/// use option_engine_validation::to_trimmed_string;
///
/// assert_eq!(to_trimmed_string(&["a", "b\n", "", "  "]), "a\nb");
/// ```
pub fn to_trimmed_string<S: AsRef<str>>(lines: &[S]) -> String {
    let joined = lines
        .iter()
        .map(|l| l.as_ref().trim_end_matches(['\r', '\n']))
        .collect::<Vec<_>>()
        .join("\n");

    let mut kept: Vec<&str> = joined.lines().collect();
    while kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
    }
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_string_keeps_interior_blank_lines() {
        assert_eq!(to_trimmed_string(&["a", "", "b", ""]), "a\n\nb");
    }

    #[test]
    fn test_trimmed_string_of_nothing() {
        let empty: [&str; 0] = [];
        assert_eq!(to_trimmed_string(&empty), "");
    }

    #[test]
    fn test_combine_all_invalid() {
        let combined = ValidationResult::combine([
            ValidationResult::invalid("x"),
            ValidationResult::invalid("y"),
        ]);
        assert_eq!(combined, ValidationResult::Invalid("x\ny".to_string()));
        assert!(!combined.is_valid());
    }
}
