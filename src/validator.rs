//! Structural validation issues for OpenAPI documents.
//!
//! Issues are collected for a whole document and reported together.

use std::fmt;

/// A single problem found while validating an OpenAPI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Where the problem is (e.g. `info.version`, `paths./pets`)
    pub location: String,
    /// Short machine-friendly category (e.g. `MissingField`)
    pub kind: String,
    /// Human-readable description
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Log every issue for a spec that is about to be skipped.
pub fn print_issues(source: &str, issues: &[ValidationIssue]) {
    tracing::error!(
        source,
        count = issues.len(),
        "❌ OpenAPI spec validation failed"
    );
    for issue in issues {
        tracing::error!(source, "   {issue}");
    }
}

/// Turn a list of collected issues into a result.
pub fn fail_if_issues(issues: Vec<ValidationIssue>) -> Result<(), Vec<ValidationIssue>> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::new("info.version", "MissingField", "version is required");
        assert_eq!(
            issue.to_string(),
            "[MissingField] info.version: version is required"
        );
    }

    #[test]
    fn test_fail_if_issues() {
        assert!(fail_if_issues(vec![]).is_ok());
        let err = fail_if_issues(vec![ValidationIssue::new("a", "b", "c")]).unwrap_err();
        assert_eq!(err.len(), 1);
    }
}
