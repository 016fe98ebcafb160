//! Error handling for the wall builder
//!
//! Recoverable errors carry enough detail for the caller to correct the
//! request and retry. `SupportViolation` is the exception: it means the
//! partitioner produced an order that breaks the support relation, which is
//! a defect rather than bad input.

use thiserror::Error;

/// Main error type for wall generation, partitioning and sequencing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WallError {
    #[error("Invalid config: {field} = {value}: {reason}")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsatisfiable bond: no layout exists for course {course} spanning {span} modules")]
    UnsatisfiableBond { course: usize, span: u32 },

    #[error("Wall not initialized")]
    NotInitialized,

    #[error("Support violation: brick {index} in course {row} placed before its supporters")]
    SupportViolation { row: usize, index: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WallError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        WallError::InvalidConfig {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// True for internal invariant breaks that indicate a bug, not bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WallError::SupportViolation { .. } | WallError::Internal(_))
    }
}

pub type Result<T> = std::result::Result<T, WallError>;
