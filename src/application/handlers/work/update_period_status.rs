//! UpdatePeriodStatusHandler - Command handler for period status changes.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, InstanceStatus, WorkPeriodId};
use crate::domain::work::WorkPeriodInstance;
use crate::ports::WorkPeriodStore;

/// Command to move a period to a new status.
#[derive(Debug, Clone)]
pub struct UpdatePeriodStatusCommand {
    pub period_id: WorkPeriodId,
    pub status: InstanceStatus,
}

/// Result of a successful status change.
#[derive(Debug, Clone)]
pub struct UpdatePeriodStatusResult {
    pub period: WorkPeriodInstance,
    pub previous_status: InstanceStatus,
}

/// Handler for period status changes.
pub struct UpdatePeriodStatusHandler {
    store: Arc<dyn WorkPeriodStore>,
}

impl UpdatePeriodStatusHandler {
    pub fn new(store: Arc<dyn WorkPeriodStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: UpdatePeriodStatusCommand,
    ) -> Result<UpdatePeriodStatusResult, DomainError> {
        let mut period = self.store.find_by_id(&cmd.period_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::PeriodNotFound,
                format!("Period not found: {}", cmd.period_id),
            )
        })?;

        let previous_status = period.status();
        period.transition_to(cmd.status)?;
        self.store.update_status(&period, previous_status).await?;

        tracing::info!(
            period_id = %period.id(),
            from = %previous_status,
            to = %period.status(),
            "Period status updated"
        );

        Ok(UpdatePeriodStatusResult {
            period,
            previous_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::WorkId;
    use crate::domain::recurrence::CycleWindow;
    use crate::domain::work::TaskInstance;
    use crate::ports::InsertOutcome;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct MockStore {
        period: Mutex<Option<WorkPeriodInstance>>,
    }

    #[async_trait]
    impl WorkPeriodStore for MockStore {
        async fn find_instance(
            &self,
            _work_id: &WorkId,
            _period_start: NaiveDate,
        ) -> Result<Option<WorkPeriodInstance>, DomainError> {
            Ok(None)
        }

        async fn insert_instances(
            &self,
            _period: &WorkPeriodInstance,
            _tasks: &[TaskInstance],
        ) -> Result<InsertOutcome, DomainError> {
            Ok(InsertOutcome::Inserted)
        }

        async fn find_by_id(
            &self,
            id: &WorkPeriodId,
        ) -> Result<Option<WorkPeriodInstance>, DomainError> {
            Ok(self
                .period
                .lock()
                .unwrap()
                .clone()
                .filter(|p| p.id() == *id))
        }

        async fn find_tasks(&self, _id: &WorkPeriodId) -> Result<Vec<TaskInstance>, DomainError> {
            Ok(vec![])
        }

        async fn update_status(
            &self,
            period: &WorkPeriodInstance,
            expected: InstanceStatus,
        ) -> Result<(), DomainError> {
            let mut stored = self.period.lock().unwrap();
            if stored.as_ref().map(|p| p.status()) != Some(expected) {
                return Err(DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    "status changed concurrently",
                ));
            }
            *stored = Some(period.clone());
            Ok(())
        }
    }

    fn store_with_period() -> (Arc<MockStore>, WorkPeriodId) {
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
        let period = WorkPeriodInstance::new(
            WorkId::new(),
            CycleWindow::new(d(3, 1), d(4, 1)),
            d(4, 10),
        );
        let id = period.id();
        (
            Arc::new(MockStore {
                period: Mutex::new(Some(period)),
            }),
            id,
        )
    }

    #[tokio::test]
    async fn valid_transition_is_persisted() {
        let (store, id) = store_with_period();
        let handler = UpdatePeriodStatusHandler::new(store.clone());

        let result = handler
            .handle(UpdatePeriodStatusCommand {
                period_id: id,
                status: InstanceStatus::InProgress,
            })
            .await
            .unwrap();

        assert_eq!(result.previous_status, InstanceStatus::Pending);
        assert_eq!(
            store.period.lock().unwrap().as_ref().unwrap().status(),
            InstanceStatus::InProgress
        );
    }

    #[tokio::test]
    async fn invalid_transition_is_rejected_and_not_persisted() {
        let (store, id) = store_with_period();
        let handler = UpdatePeriodStatusHandler::new(store.clone());

        let err = handler
            .handle(UpdatePeriodStatusCommand {
                period_id: id,
                status: InstanceStatus::Completed,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(
            store.period.lock().unwrap().as_ref().unwrap().status(),
            InstanceStatus::Pending
        );
    }

    #[tokio::test]
    async fn unknown_period_is_not_found() {
        let (store, _) = store_with_period();
        let handler = UpdatePeriodStatusHandler::new(store);

        let err = handler
            .handle(UpdatePeriodStatusCommand {
                period_id: WorkPeriodId::new(),
                status: InstanceStatus::Cancelled,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PeriodNotFound);
    }
}
