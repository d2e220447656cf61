//! PreviewPeriodHandler - Query handler showing what generation would
//! produce, without writing anything.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, WorkId};
use crate::domain::recurrence::{compute_cycle_boundaries, CycleWindow, RecurrenceError};
use crate::domain::work::{plan_period, PeriodPlan};
use crate::ports::WorkReader;

/// Query for a period preview.
#[derive(Debug, Clone)]
pub struct PreviewPeriodQuery {
    pub work_id: WorkId,
    /// Defaults to today's UTC date.
    pub reference_date: Option<NaiveDate>,
}

/// The planned period plus the windows that follow it.
#[derive(Debug, Clone)]
pub struct PeriodPreview {
    pub plan: PeriodPlan,
    /// Starts with the framed window.
    pub upcoming: Vec<CycleWindow>,
}

/// Error type for previews.
#[derive(Debug, Clone)]
pub enum PreviewPeriodError {
    WorkNotFound(WorkId),
    Recurrence(RecurrenceError),
    Domain(DomainError),
}

impl PreviewPeriodError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PreviewPeriodError::WorkNotFound(_) => ErrorCode::WorkNotFound,
            PreviewPeriodError::Recurrence(err) => err.code(),
            PreviewPeriodError::Domain(err) => err.code,
        }
    }
}

impl std::fmt::Display for PreviewPeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewPeriodError::WorkNotFound(id) => write!(f, "Work not found: {}", id),
            PreviewPeriodError::Recurrence(err) => write!(f, "{}", err),
            PreviewPeriodError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PreviewPeriodError {}

impl From<DomainError> for PreviewPeriodError {
    fn from(err: DomainError) -> Self {
        PreviewPeriodError::Domain(err)
    }
}

impl From<RecurrenceError> for PreviewPeriodError {
    fn from(err: RecurrenceError) -> Self {
        PreviewPeriodError::Recurrence(err)
    }
}

/// Handler for previews. Runs the same planner as generation.
pub struct PreviewPeriodHandler {
    work_reader: Arc<dyn WorkReader>,
    window_count: usize,
}

impl PreviewPeriodHandler {
    pub fn new(work_reader: Arc<dyn WorkReader>, window_count: usize) -> Self {
        Self {
            work_reader,
            window_count,
        }
    }

    pub async fn handle(&self, query: PreviewPeriodQuery) -> Result<PeriodPreview, PreviewPeriodError> {
        let work = self
            .work_reader
            .find_work(&query.work_id)
            .await?
            .ok_or(PreviewPeriodError::WorkNotFound(query.work_id))?;
        let reference = query.reference_date.unwrap_or_else(Timestamp::today);

        let plan = plan_period(&work, reference)?;
        let upcoming: Vec<CycleWindow> =
            compute_cycle_boundaries(work.recurrence(), plan.window.start, self.window_count)?
                .collect();

        tracing::debug!(
            work_id = %work.id(),
            %reference,
            period_start = %plan.window.start,
            upcoming = upcoming.len(),
            "Previewed period"
        );

        Ok(PeriodPreview { plan, upcoming })
    }
}
