//! HTTP DTOs for work period endpoints.
//!
//! Dates are ISO `YYYY-MM-DD` strings; IDs are UUID strings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::handlers::work::{
    GenerationOutcome, GenerationResult, PeriodPreview, SkipReason, UpdatePeriodStatusResult,
};
use crate::domain::foundation::{DomainError, ErrorCode, InstanceStatus};
use crate::domain::recurrence::{ClampedDateWarning, CycleWindow};
use crate::domain::work::{TaskInstance, TaskPlan, WorkPeriodInstance};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to generate the framed period.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratePeriodsRequest {
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

/// Query parameters for a preview.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

/// Request to change a period's status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: InstanceStatus,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<CycleWindow> for WindowResponse {
    fn from(window: CycleWindow) -> Self {
        Self {
            start: window.start,
            end: window.end,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningResponse {
    pub context: String,
    pub requested_day: u32,
    pub actual_date: NaiveDate,
}

impl From<&ClampedDateWarning> for WarningResponse {
    fn from(warning: &ClampedDateWarning) -> Self {
        Self {
            context: warning.context.as_str().to_string(),
            requested_day: warning.requested_day,
            actual_date: warning.actual_date,
        }
    }
}

/// A planned or persisted task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub template_id: String,
    pub title: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InstanceStatus>,
}

impl From<&TaskPlan> for TaskResponse {
    fn from(plan: &TaskPlan) -> Self {
        Self {
            id: None,
            template_id: plan.template_id.to_string(),
            title: plan.title.clone(),
            period_start: plan.window.start,
            period_end: plan.window.end,
            due_date: plan.due_date,
            status: None,
        }
    }
}

impl From<&TaskInstance> for TaskResponse {
    fn from(task: &TaskInstance) -> Self {
        Self {
            id: Some(task.id.to_string()),
            template_id: task.template_id.to_string(),
            title: task.title.clone(),
            period_start: task.period_start,
            period_end: task.period_end,
            due_date: task.due_date,
            status: Some(task.status),
        }
    }
}

/// A persisted period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodResponse {
    pub id: String,
    pub work_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InstanceStatus,
    pub created_at: String,
}

impl From<&WorkPeriodInstance> for PeriodResponse {
    fn from(period: &WorkPeriodInstance) -> Self {
        Self {
            id: period.id().to_string(),
            work_id: period.work_id().to_string(),
            period_start: period.period_start(),
            period_end: period.period_end(),
            due_date: period.due_date(),
            status: period.status(),
            created_at: period.created_at().as_datetime().to_rfc3339(),
        }
    }
}

/// Response for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// `created` or `skipped`.
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodResponse>,
    /// Set when a skip found the existing period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_period_id: Option<String>,
    pub window: WindowResponse,
    pub due_date: NaiveDate,
    pub tasks: Vec<TaskResponse>,
    pub warnings: Vec<WarningResponse>,
}

impl From<GenerationResult> for GenerationResponse {
    fn from(result: GenerationResult) -> Self {
        let warnings = result.warnings.iter().map(WarningResponse::from).collect();
        match result.outcome {
            GenerationOutcome::Created { period, tasks } => Self {
                outcome: "created".to_string(),
                skip_reason: None,
                period: Some(PeriodResponse::from(&period)),
                existing_period_id: None,
                window: result.window.into(),
                due_date: result.due_date,
                tasks: tasks.iter().map(TaskResponse::from).collect(),
                warnings,
            },
            GenerationOutcome::Skipped(SkipReason::DuplicatePeriod { existing }) => Self {
                outcome: "skipped".to_string(),
                skip_reason: Some(ErrorCode::DuplicatePeriod.to_string()),
                period: None,
                existing_period_id: existing.map(|id| id.to_string()),
                window: result.window.into(),
                due_date: result.due_date,
                tasks: Vec::new(),
                warnings,
            },
        }
    }
}

/// Response for a preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub work_id: String,
    pub reference_date: NaiveDate,
    pub window: WindowResponse,
    pub due_date: NaiveDate,
    pub tasks: Vec<TaskResponse>,
    pub warnings: Vec<WarningResponse>,
    pub upcoming: Vec<WindowResponse>,
}

impl From<PeriodPreview> for PreviewResponse {
    fn from(preview: PeriodPreview) -> Self {
        let plan = preview.plan;
        Self {
            work_id: plan.work_id.to_string(),
            reference_date: plan.reference_date,
            window: plan.window.into(),
            due_date: plan.due_date,
            tasks: plan.tasks.iter().map(TaskResponse::from).collect(),
            warnings: plan.warnings.iter().map(WarningResponse::from).collect(),
            upcoming: preview.upcoming.into_iter().map(WindowResponse::from).collect(),
        }
    }
}

/// Response for a status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub period: PeriodResponse,
    pub previous_status: InstanceStatus,
}

impl From<UpdatePeriodStatusResult> for StatusResponse {
    fn from(result: UpdatePeriodStatusResult) -> Self {
        Self {
            period: PeriodResponse::from(&result.period),
            previous_status: result.previous_status,
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed.to_string(),
            message: message.into(),
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code.to_string(),
            message: err.message.clone(),
        }
    }
}
