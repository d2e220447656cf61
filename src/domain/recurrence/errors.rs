//! Recurrence engine errors and warnings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Validation failures raised by the pure recurrence engine.
///
/// All of these abort before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("Invalid recurrence config: {reason}")]
    InvalidRecurrenceConfig { reason: String },

    #[error("Invalid offset {value}: offset must be a non-negative integer")]
    InvalidOffset { value: i64 },

    #[error("Unresolved period for reference date {reference}: {reason}")]
    UnresolvedPeriod { reference: NaiveDate, reason: String },

    #[error("Date arithmetic from {from} left the supported calendar range")]
    DateOutOfRange { from: NaiveDate },
}

impl RecurrenceError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        RecurrenceError::InvalidRecurrenceConfig {
            reason: reason.into(),
        }
    }

    pub fn unresolved(reference: NaiveDate, reason: impl Into<String>) -> Self {
        RecurrenceError::UnresolvedPeriod {
            reference,
            reason: reason.into(),
        }
    }

    pub fn out_of_range(from: NaiveDate) -> Self {
        RecurrenceError::DateOutOfRange { from }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RecurrenceError::InvalidRecurrenceConfig { .. } => ErrorCode::InvalidRecurrenceConfig,
            RecurrenceError::InvalidOffset { .. } => ErrorCode::InvalidOffset,
            RecurrenceError::UnresolvedPeriod { .. } => ErrorCode::UnresolvedPeriod,
            RecurrenceError::DateOutOfRange { .. } => ErrorCode::DateOutOfRange,
        }
    }
}

impl From<RecurrenceError> for DomainError {
    fn from(err: RecurrenceError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

/// Which computed date a clamp warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampContext {
    WorkWindowStart,
    WorkDueDate,
    TaskWindowStart,
    TaskDueDate,
}

impl ClampContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClampContext::WorkWindowStart => "work_window_start",
            ClampContext::WorkDueDate => "work_due_date",
            ClampContext::TaskWindowStart => "task_window_start",
            ClampContext::TaskDueDate => "task_due_date",
        }
    }
}

/// Informational: a day-of-month was adjusted to fit a shorter month.
///
/// Returned alongside successful results, never as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampedDateWarning {
    pub context: ClampContext,
    pub requested_day: u32,
    pub actual_date: NaiveDate,
}

impl ClampedDateWarning {
    pub fn new(context: ClampContext, requested_day: u32, actual_date: NaiveDate) -> Self {
        Self {
            context,
            requested_day,
            actual_date,
        }
    }
}
