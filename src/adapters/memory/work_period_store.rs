//! In-memory WorkPeriodStore for tests and local runs.
//!
//! Enforces the same `(work_id, period_start)` uniqueness as the database
//! and can be told to fail with `StoreUnavailable` to exercise retries.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, InstanceStatus, WorkId, WorkPeriodId};
use crate::domain::work::{TaskInstance, WorkPeriodInstance};
use crate::ports::{InsertOutcome, WorkPeriodStore};

#[derive(Default)]
struct State {
    periods: HashMap<WorkPeriodId, WorkPeriodInstance>,
    by_start: HashMap<(WorkId, NaiveDate), WorkPeriodId>,
    tasks: HashMap<WorkPeriodId, Vec<TaskInstance>>,
}

/// In-memory period store.
#[derive(Default)]
pub struct InMemoryWorkPeriodStore {
    state: RwLock<State>,
    pending_failures: AtomicUsize,
}

impl InMemoryWorkPeriodStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Makes the next `count` calls fail with `StoreUnavailable`.
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Number of stored periods.
    pub async fn period_count(&self) -> usize {
        self.state.read().await.periods.len()
    }

    /// Number of stored task instances across all periods.
    pub async fn task_count(&self) -> usize {
        self.state.read().await.tasks.values().map(Vec::len).sum()
    }

    fn take_failure(&self) -> Result<(), DomainError> {
        let consumed = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match consumed {
            Ok(_) => Err(DomainError::new(
                ErrorCode::StoreUnavailable,
                "In-memory store unavailable",
            )),
            Err(_) => Ok(()),
        }
    }
}

#[async_trait]
impl WorkPeriodStore for InMemoryWorkPeriodStore {
    async fn find_instance(
        &self,
        work_id: &WorkId,
        period_start: NaiveDate,
    ) -> Result<Option<WorkPeriodInstance>, DomainError> {
        self.take_failure()?;
        let state = self.state.read().await;
        Ok(state
            .by_start
            .get(&(*work_id, period_start))
            .and_then(|id| state.periods.get(id))
            .cloned())
    }

    async fn insert_instances(
        &self,
        period: &WorkPeriodInstance,
        tasks: &[TaskInstance],
    ) -> Result<InsertOutcome, DomainError> {
        self.take_failure()?;
        let mut state = self.state.write().await;
        let key = (period.work_id(), period.period_start());
        if state.by_start.contains_key(&key) {
            return Ok(InsertOutcome::DuplicatePeriod);
        }
        let mut templates = HashSet::with_capacity(tasks.len());
        if let Some(repeated) = tasks.iter().find(|t| !templates.insert(t.template_id)) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!(
                    "Task template {} appears twice in period {}",
                    repeated.template_id,
                    period.id()
                ),
            ));
        }
        state.by_start.insert(key, period.id());
        state.periods.insert(period.id(), period.clone());
        state.tasks.insert(period.id(), tasks.to_vec());
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_id(
        &self,
        id: &WorkPeriodId,
    ) -> Result<Option<WorkPeriodInstance>, DomainError> {
        self.take_failure()?;
        Ok(self.state.read().await.periods.get(id).cloned())
    }

    async fn find_tasks(&self, id: &WorkPeriodId) -> Result<Vec<TaskInstance>, DomainError> {
        self.take_failure()?;
        Ok(self
            .state
            .read()
            .await
            .tasks
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_status(
        &self,
        period: &WorkPeriodInstance,
        expected: InstanceStatus,
    ) -> Result<(), DomainError> {
        self.take_failure()?;
        let mut state = self.state.write().await;
        match state.periods.get_mut(&period.id()) {
            Some(stored) if stored.status() != expected => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Period {} is {}, expected {}",
                    period.id(),
                    stored.status(),
                    expected
                ),
            )),
            Some(stored) => {
                *stored = period.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PeriodNotFound,
                format!("Period not found: {}", period.id()),
            )),
        }
    }
}
