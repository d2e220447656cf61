//! WorkPeriodInstance - one persisted, concrete period of a recurring work.

use chrono::NaiveDate;

use crate::domain::foundation::{
    DomainError, ErrorCode, InstanceStatus, StateMachine, Timestamp, WorkId, WorkPeriodId,
};
use crate::domain::recurrence::CycleWindow;

/// A generated period.
///
/// # Invariants
///
/// - Unique per `(work_id, period_start)`
/// - `period_start < period_end`
/// - Status changes only through [`WorkPeriodInstance::transition_to`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPeriodInstance {
    id: WorkPeriodId,
    work_id: WorkId,
    period_start: NaiveDate,
    period_end: NaiveDate,
    due_date: NaiveDate,
    status: InstanceStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl WorkPeriodInstance {
    /// Creates a new pending instance for `window`.
    pub fn new(work_id: WorkId, window: CycleWindow, due_date: NaiveDate) -> Self {
        let now = Timestamp::now();
        Self {
            id: WorkPeriodId::new(),
            work_id,
            period_start: window.start,
            period_end: window.end,
            due_date,
            status: InstanceStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds an instance from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: WorkPeriodId,
        work_id: WorkId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        due_date: NaiveDate,
        status: InstanceStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            work_id,
            period_start,
            period_end,
            due_date,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> WorkPeriodId {
        self.id
    }

    pub fn work_id(&self) -> WorkId {
        self.work_id
    }

    pub fn period_start(&self) -> NaiveDate {
        self.period_start
    }

    pub fn period_end(&self) -> NaiveDate {
        self.period_end
    }

    pub fn window(&self) -> CycleWindow {
        CycleWindow::new(self.period_start, self.period_end)
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn status(&self) -> InstanceStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Moves the instance to `target`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` if the status machine forbids it.
    pub fn transition_to(&mut self, target: InstanceStatus) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Cannot transition period {} from {} to {}",
                    self.id, self.status, target
                ),
            )
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
