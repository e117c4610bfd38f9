//! Error types for the compiler crate.
//!
//! A failed compile carries one `CompileError`. Validation failures carry
//! every blocking issue so that authors can fix them in one pass.

use crate::validation::ValidationIssue;
use std::fmt;

/// Errors from compiling a workflow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The schema registry could not be loaded.
    SchemaLoad { details: String },
    /// The graph failed validation.
    Validation { errors: Vec<ValidationIssue> },
}

impl CompileError {
    /// Returns the validation issues behind this error, if any.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation { errors } => errors,
            Self::SchemaLoad { .. } => &[],
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaLoad { details } => {
                write!(f, "failed to load node-type schemas: {details}")
            }
            Self::Validation { errors } => {
                write!(f, "workflow validation failed with {} error(s):", errors.len())?;
                for issue in errors {
                    write!(f, "\n  {issue}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for CompileError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::IssueCode;

    #[test]
    fn validation_display_lists_every_issue() {
        let err = CompileError::Validation {
            errors: vec![
                ValidationIssue {
                    code: IssueCode::NoTrigger,
                    message: "workflow has no trigger node".to_string(),
                    node: None,
                },
                ValidationIssue {
                    code: IssueCode::InvalidConnection,
                    message: "connection target 'Ghost' does not exist".to_string(),
                    node: Some("Ghost".to_string()),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("workflow validation failed with 2 error(s):"));
        assert!(text.contains("[NO_TRIGGER] workflow has no trigger node"));
        assert!(text.contains("[INVALID_CONNECTION] connection target 'Ghost'"));
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn schema_load_display() {
        let err = CompileError::SchemaLoad {
            details: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "failed to load node-type schemas: permission denied");
        assert!(err.issues().is_empty());
    }
}
