//! GeneratePeriodsHandler - Command handler that materialises the framed
//! period of a recurring work item and its task instances.
//!
//! Safe to re-run: an existing period is detected up front, and a racing
//! writer is caught by the store's uniqueness constraint. Either way the
//! call reports a skip instead of failing.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use super::retry::retry_once;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, WorkId, WorkPeriodId};
use crate::domain::recurrence::{ClampedDateWarning, CycleWindow, RecurrenceError};
use crate::domain::work::{plan_period, PeriodPlan, TaskInstance, WorkPeriodInstance};
use crate::ports::{InsertOutcome, WorkPeriodStore, WorkReader};

/// Command to generate the period framed by a reference date.
#[derive(Debug, Clone)]
pub struct GeneratePeriodsCommand {
    pub work_id: WorkId,
    /// Defaults to today's UTC date.
    pub reference_date: Option<NaiveDate>,
}

/// Why nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The period already exists. `existing` is known when the lookup found
    /// it, and unknown when a concurrent insert won the race.
    DuplicatePeriod { existing: Option<WorkPeriodId> },
}

#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Created {
        period: WorkPeriodInstance,
        tasks: Vec<TaskInstance>,
    },
    Skipped(SkipReason),
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub work_id: WorkId,
    pub window: CycleWindow,
    pub due_date: NaiveDate,
    pub outcome: GenerationOutcome,
    pub warnings: Vec<ClampedDateWarning>,
}

impl GenerationResult {
    pub fn is_created(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Created { .. })
    }
}

/// Error type for period generation.
#[derive(Debug, Clone)]
pub enum GeneratePeriodsError {
    /// No work with this ID.
    WorkNotFound(WorkId),
    /// Configuration or offset error; nothing was written.
    Recurrence(RecurrenceError),
    /// The batch insert failed and was rolled back.
    BatchInsertFailed(DomainError),
    /// Store or other domain error.
    Domain(DomainError),
}

impl GeneratePeriodsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GeneratePeriodsError::WorkNotFound(_) => ErrorCode::WorkNotFound,
            GeneratePeriodsError::Recurrence(err) => err.code(),
            GeneratePeriodsError::BatchInsertFailed(_) => ErrorCode::BatchInsertFailed,
            GeneratePeriodsError::Domain(err) => err.code,
        }
    }
}

impl std::fmt::Display for GeneratePeriodsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratePeriodsError::WorkNotFound(id) => write!(f, "Work not found: {}", id),
            GeneratePeriodsError::Recurrence(err) => write!(f, "{}", err),
            GeneratePeriodsError::BatchInsertFailed(err) => {
                write!(f, "Batch insert failed: {}", err.message)
            }
            GeneratePeriodsError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GeneratePeriodsError {}

impl From<DomainError> for GeneratePeriodsError {
    fn from(err: DomainError) -> Self {
        GeneratePeriodsError::Domain(err)
    }
}

impl From<RecurrenceError> for GeneratePeriodsError {
    fn from(err: RecurrenceError) -> Self {
        GeneratePeriodsError::Recurrence(err)
    }
}

impl From<GeneratePeriodsError> for DomainError {
    fn from(err: GeneratePeriodsError) -> Self {
        match err {
            GeneratePeriodsError::Domain(err) => err,
            GeneratePeriodsError::BatchInsertFailed(cause) => {
                DomainError::new(ErrorCode::BatchInsertFailed, cause.message.clone())
                    .with_detail("cause", cause.code.to_string())
            }
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}

/// Handler for period generation.
pub struct GeneratePeriodsHandler {
    work_reader: Arc<dyn WorkReader>,
    store: Arc<dyn WorkPeriodStore>,
    retry_backoff: Duration,
}

impl GeneratePeriodsHandler {
    pub fn new(
        work_reader: Arc<dyn WorkReader>,
        store: Arc<dyn WorkPeriodStore>,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            work_reader,
            store,
            retry_backoff,
        }
    }

    pub async fn handle(
        &self,
        cmd: GeneratePeriodsCommand,
    ) -> Result<GenerationResult, GeneratePeriodsError> {
        // 1. Load configuration
        let work = self
            .work_reader
            .find_work(&cmd.work_id)
            .await?
            .ok_or(GeneratePeriodsError::WorkNotFound(cmd.work_id))?;
        let reference = cmd.reference_date.unwrap_or_else(Timestamp::today);

        // 2. Plan; any validation error aborts before the store is touched
        let plan = plan_period(&work, reference)?;
        tracing::debug!(
            work_id = %work.id(),
            %reference,
            period_start = %plan.window.start,
            period_end = %plan.window.end,
            due_date = %plan.due_date,
            tasks = plan.tasks.len(),
            "Planned period"
        );
        for warning in &plan.warnings {
            tracing::warn!(
                work_id = %work.id(),
                context = ?warning.context,
                requested_day = warning.requested_day,
                actual_date = %warning.actual_date,
                "Day of month clamped"
            );
        }

        // 3. Existing period?
        let work_id = work.id();
        let existing = retry_once("find_instance", self.retry_backoff, || {
            self.store.find_instance(&work_id, plan.window.start)
        })
        .await?;
        if let Some(existing) = existing {
            tracing::info!(
                work_id = %work_id,
                period_id = %existing.id(),
                period_start = %existing.period_start(),
                "Period already generated, skipping"
            );
            return Ok(skipped(&plan, Some(existing.id())));
        }

        // 4. Build and insert atomically
        let period = WorkPeriodInstance::new(work_id, plan.window, plan.due_date);
        let tasks: Vec<TaskInstance> = plan
            .tasks
            .iter()
            .map(|task| TaskInstance::from_plan(&period, task))
            .collect();

        let inserted = retry_once("insert_instances", self.retry_backoff, || {
            self.store.insert_instances(&period, &tasks)
        })
        .await
        .map_err(|err| {
            tracing::error!(
                work_id = %work_id,
                period_start = %period.period_start(),
                error = %err,
                "Batch insert failed"
            );
            GeneratePeriodsError::BatchInsertFailed(err)
        })?;

        match inserted {
            InsertOutcome::Inserted => {
                tracing::info!(
                    work_id = %work_id,
                    period_id = %period.id(),
                    period_start = %period.period_start(),
                    due_date = %period.due_date(),
                    tasks = tasks.len(),
                    "Period generated"
                );
                Ok(GenerationResult {
                    work_id,
                    window: plan.window,
                    due_date: plan.due_date,
                    outcome: GenerationOutcome::Created { period, tasks },
                    warnings: plan.warnings,
                })
            }
            InsertOutcome::DuplicatePeriod => {
                tracing::info!(
                    work_id = %work_id,
                    period_start = %plan.window.start,
                    "Concurrent generation won the race, skipping"
                );
                Ok(skipped(&plan, None))
            }
        }
    }
}

fn skipped(plan: &PeriodPlan, existing: Option<WorkPeriodId>) -> GenerationResult {
    GenerationResult {
        work_id: plan.work_id,
        window: plan.window,
        due_date: plan.due_date,
        outcome: GenerationOutcome::Skipped(SkipReason::DuplicatePeriod { existing }),
        warnings: plan.warnings.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TaskTemplateId;
    use crate::domain::recurrence::{
        DueDateRule, OffsetAnchor, OffsetUnit, PeriodFramingPolicy, RecurrenceDefinition,
        TaskRecurrenceOverride,
    };
    use crate::domain::work::RecurringWork;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ───────────────────────────────────────────────────────────────
    // Mock implementations
    // ───────────────────────────────────────────────────────────────

    struct MockWorkReader {
        work: Option<RecurringWork>,
    }

    #[async_trait]
    impl WorkReader for MockWorkReader {
        async fn find_work(&self, id: &WorkId) -> Result<Option<RecurringWork>, DomainError> {
            Ok(self.work.clone().filter(|w| w.id() == *id))
        }
    }

    #[derive(Default)]
    struct MockStore {
        periods: Mutex<Vec<WorkPeriodInstance>>,
        tasks: Mutex<Vec<TaskInstance>>,
        find_failures: Mutex<Vec<DomainError>>,
        insert_failures: Mutex<Vec<DomainError>>,
        report_duplicate_on_insert: bool,
        find_calls: Mutex<usize>,
        insert_calls: Mutex<usize>,
    }

    impl MockStore {
        fn failing_find(errors: Vec<DomainError>) -> Self {
            Self {
                find_failures: Mutex::new(errors),
                ..Self::default()
            }
        }

        fn failing_insert(errors: Vec<DomainError>) -> Self {
            Self {
                insert_failures: Mutex::new(errors),
                ..Self::default()
            }
        }

        fn racing() -> Self {
            Self {
                report_duplicate_on_insert: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl WorkPeriodStore for MockStore {
        async fn find_instance(
            &self,
            work_id: &WorkId,
            period_start: NaiveDate,
        ) -> Result<Option<WorkPeriodInstance>, DomainError> {
            *self.find_calls.lock().unwrap() += 1;
            if let Some(err) = self.find_failures.lock().unwrap().pop() {
                return Err(err);
            }
            Ok(self
                .periods
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.work_id() == *work_id && p.period_start() == period_start)
                .cloned())
        }

        async fn insert_instances(
            &self,
            period: &WorkPeriodInstance,
            tasks: &[TaskInstance],
        ) -> Result<InsertOutcome, DomainError> {
            *self.insert_calls.lock().unwrap() += 1;
            if let Some(err) = self.insert_failures.lock().unwrap().pop() {
                return Err(err);
            }
            if self.report_duplicate_on_insert {
                return Ok(InsertOutcome::DuplicatePeriod);
            }
            self.periods.lock().unwrap().push(period.clone());
            self.tasks.lock().unwrap().extend_from_slice(tasks);
            Ok(InsertOutcome::Inserted)
        }

        async fn find_by_id(
            &self,
            _id: &WorkPeriodId,
        ) -> Result<Option<WorkPeriodInstance>, DomainError> {
            Ok(None)
        }

        async fn find_tasks(&self, _id: &WorkPeriodId) -> Result<Vec<TaskInstance>, DomainError> {
            Ok(vec![])
        }

        async fn update_status(
            &self,
            _period: &WorkPeriodInstance,
            _expected: crate::domain::foundation::InstanceStatus,
        ) -> Result<(), DomainError> {
            Ok(())
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Helpers
    // ───────────────────────────────────────────────────────────────

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_work(due_rule: DueDateRule) -> RecurringWork {
        RecurringWork::new(
            WorkId::new(),
            "Monthly payroll",
            RecurrenceDefinition::monthly(10, date(2024, 1, 1)),
            PeriodFramingPolicy::PreviousPeriod,
            due_rule,
        )
        .unwrap()
        .with_task(TaskRecurrenceOverride::inheriting(TaskTemplateId::new(), "Collect timesheets"))
        .with_task(TaskRecurrenceOverride::inheriting(TaskTemplateId::new(), "Run payroll"))
    }

    fn ten_days_after_end() -> DueDateRule {
        DueDateRule::offset(OffsetUnit::Days, 10, OffsetAnchor::PeriodEnd)
    }

    fn handler(work: &RecurringWork, store: Arc<MockStore>) -> GeneratePeriodsHandler {
        GeneratePeriodsHandler::new(
            Arc::new(MockWorkReader {
                work: Some(work.clone()),
            }),
            store,
            Duration::ZERO,
        )
    }

    fn command(work: &RecurringWork) -> GeneratePeriodsCommand {
        GeneratePeriodsCommand {
            work_id: work.id(),
            reference_date: Some(date(2025, 3, 15)),
        }
    }

    fn unavailable() -> DomainError {
        DomainError::new(ErrorCode::StoreUnavailable, "connection reset")
    }

    // ───────────────────────────────────────────────────────────────
    // Tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn creates_period_and_tasks() {
        let work = monthly_work(ten_days_after_end());
        let store = Arc::new(MockStore::default());

        let result = handler(&work, store.clone()).handle(command(&work)).await.unwrap();

        assert!(result.is_created());
        assert_eq!(result.window, CycleWindow::new(date(2025, 2, 10), date(2025, 3, 10)));
        assert_eq!(result.due_date, date(2025, 3, 20));
        match result.outcome {
            GenerationOutcome::Created { period, tasks } => {
                assert_eq!(period.status(), crate::domain::foundation::InstanceStatus::Pending);
                assert_eq!(tasks.len(), 2);
                assert!(tasks.iter().all(|t| t.period_instance_id == period.id()));
                assert_eq!(tasks[0].title, "Collect timesheets");
            }
            other => panic!("expected Created, got {:?}", other),
        }
        assert_eq!(store.periods.lock().unwrap().len(), 1);
        assert_eq!(store.tasks.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_run_skips_as_duplicate() {
        let work = monthly_work(ten_days_after_end());
        let store = Arc::new(MockStore::default());
        let handler = handler(&work, store.clone());

        let first = handler.handle(command(&work)).await.unwrap();
        let second = handler.handle(command(&work)).await.unwrap();

        let first_id = match first.outcome {
            GenerationOutcome::Created { period, .. } => period.id(),
            other => panic!("expected Created, got {:?}", other),
        };
        assert!(matches!(
            second.outcome,
            GenerationOutcome::Skipped(SkipReason::DuplicatePeriod { existing: Some(id) })
                if id == first_id
        ));
        assert_eq!(store.periods.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lost_race_is_reported_as_skip() {
        let work = monthly_work(ten_days_after_end());
        let store = Arc::new(MockStore::racing());

        let result = handler(&work, store).handle(command(&work)).await.unwrap();

        assert!(matches!(
            result.outcome,
            GenerationOutcome::Skipped(SkipReason::DuplicatePeriod { existing: None })
        ));
    }

    #[tokio::test]
    async fn negative_offset_aborts_without_touching_store() {
        let work = monthly_work(DueDateRule::offset(
            OffsetUnit::Days,
            -5,
            OffsetAnchor::PeriodEnd,
        ));
        let store = Arc::new(MockStore::default());

        let err = handler(&work, store.clone())
            .handle(command(&work))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidOffset);
        assert_eq!(*store.find_calls.lock().unwrap(), 0);
        assert!(store.periods.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_work_is_not_found() {
        let work = monthly_work(ten_days_after_end());
        let handler = handler(&work, Arc::new(MockStore::default()));

        let err = handler
            .handle(GeneratePeriodsCommand {
                work_id: WorkId::new(),
                reference_date: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::WorkNotFound);
    }

    #[tokio::test]
    async fn transient_lookup_failure_is_retried() {
        let work = monthly_work(ten_days_after_end());
        let store = Arc::new(MockStore::failing_find(vec![unavailable()]));

        let result = handler(&work, store.clone()).handle(command(&work)).await.unwrap();

        assert!(result.is_created());
        assert_eq!(*store.find_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn repeated_transient_lookup_failure_surfaces() {
        let work = monthly_work(ten_days_after_end());
        let store = Arc::new(MockStore::failing_find(vec![unavailable(), unavailable()]));

        let err = handler(&work, store.clone())
            .handle(command(&work))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
        assert_eq!(*store.insert_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn transient_insert_failure_is_retried() {
        let work = monthly_work(ten_days_after_end());
        let store = Arc::new(MockStore::failing_insert(vec![unavailable()]));

        let result = handler(&work, store.clone()).handle(command(&work)).await.unwrap();

        assert!(result.is_created());
        assert_eq!(*store.insert_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn permanent_insert_failure_is_batch_insert_failed() {
        let work = monthly_work(ten_days_after_end());
        let store = Arc::new(MockStore::failing_insert(vec![DomainError::new(
            ErrorCode::DatabaseError,
            "foreign key violation",
        )]));

        let err = handler(&work, store.clone())
            .handle(command(&work))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::BatchInsertFailed);
        assert_eq!(*store.insert_calls.lock().unwrap(), 1);
        assert!(store.periods.lock().unwrap().is_empty());

        let domain: DomainError = err.into();
        assert_eq!(domain.details.get("cause").map(String::as_str), Some("DATABASE_ERROR"));
    }

    #[tokio::test]
    async fn rejected_task_row_fails_the_batch_instead_of_skipping() {
        let work = monthly_work(ten_days_after_end());
        assert_eq!(work.tasks().len(), 2);
        let store = Arc::new(MockStore::failing_insert(vec![DomainError::new(
            ErrorCode::DatabaseError,
            "Failed to insert task instance: unique constraint violated",
        )]));

        let err = handler(&work, store.clone())
            .handle(command(&work))
            .await
            .unwrap_err();

        assert!(matches!(err, GeneratePeriodsError::BatchInsertFailed(_)));
        assert!(store.periods.lock().unwrap().is_empty());
        assert!(store.tasks.lock().unwrap().is_empty());
    }
}
