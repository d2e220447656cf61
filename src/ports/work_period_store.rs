//! WorkPeriodStore port - persistence of generated period and task instances.
//!
//! Idempotency rests on the store: `(work_id, period_start)` must be unique,
//! and a violation is reported as [`InsertOutcome::DuplicatePeriod`] rather
//! than an error.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, InstanceStatus, WorkId, WorkPeriodId};
use crate::domain::work::{TaskInstance, WorkPeriodInstance};

/// Result of attempting to insert a period with its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Period and all tasks were written.
    Inserted,
    /// A period with the same `(work_id, period_start)` already exists.
    /// Nothing was written.
    DuplicatePeriod,
}

/// Port for generated period instances.
///
/// Transient failures (timeouts, lost connections) are reported with
/// `ErrorCode::StoreUnavailable` so callers can retry them.
#[async_trait]
pub trait WorkPeriodStore: Send + Sync {
    /// Find the instance of `work_id` starting on `period_start`.
    async fn find_instance(
        &self,
        work_id: &WorkId,
        period_start: NaiveDate,
    ) -> Result<Option<WorkPeriodInstance>, DomainError>;

    /// Insert a period and its tasks as one atomic batch.
    ///
    /// Task instances are unique per `(period_instance_id, template_id)`.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable` on transient failure, nothing written
    /// - `DatabaseError` on any other failure, including a repeated task
    ///   template, nothing written
    async fn insert_instances(
        &self,
        period: &WorkPeriodInstance,
        tasks: &[TaskInstance],
    ) -> Result<InsertOutcome, DomainError>;

    /// Find a period instance by ID.
    async fn find_by_id(&self, id: &WorkPeriodId)
        -> Result<Option<WorkPeriodInstance>, DomainError>;

    /// Tasks of a period, in generation order.
    async fn find_tasks(&self, id: &WorkPeriodId) -> Result<Vec<TaskInstance>, DomainError>;

    /// Persist the status of an existing instance, provided the stored status
    /// is still `expected`.
    ///
    /// # Errors
    ///
    /// - `PeriodNotFound` if the instance doesn't exist
    /// - `InvalidStateTransition` if the stored status changed since it was read
    async fn update_status(
        &self,
        period: &WorkPeriodInstance,
        expected: InstanceStatus,
    ) -> Result<(), DomainError>;
}
