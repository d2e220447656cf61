//! PostgreSQL implementation of WorkPeriodStore.
//!
//! The `(work_id, period_start)` unique constraint is what makes generation
//! idempotent; a conflicting period insert rolls back and reports
//! `InsertOutcome::DuplicatePeriod`. Any failure on a task row is an error.
//!
//! Status updates compare against the status the caller read, so two
//! concurrent transitions cannot both win.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, InstanceStatus, TaskInstanceId, TaskTemplateId, Timestamp, WorkId,
    WorkPeriodId,
};
use crate::domain::work::{TaskInstance, WorkPeriodInstance};
use crate::ports::{InsertOutcome, WorkPeriodStore};

/// PostgreSQL implementation of WorkPeriodStore.
#[derive(Clone)]
pub struct PostgresWorkPeriodStore {
    pool: PgPool,
}

impl PostgresWorkPeriodStore {
    /// Creates a new PostgresWorkPeriodStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkPeriodStore for PostgresWorkPeriodStore {
    async fn find_instance(
        &self,
        work_id: &WorkId,
        period_start: NaiveDate,
    ) -> Result<Option<WorkPeriodInstance>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, work_id, period_start, period_end, due_date, status,
                   created_at, updated_at
            FROM work_period_instances
            WHERE work_id = $1 AND period_start = $2
            "#,
        )
        .bind(work_id.as_uuid())
        .bind(period_start)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to fetch period instance", e))?;

        row.map(row_to_period).transpose()
    }

    async fn insert_instances(
        &self,
        period: &WorkPeriodInstance,
        tasks: &[TaskInstance],
    ) -> Result<InsertOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        let result = sqlx::query(
            r#"
            INSERT INTO work_period_instances (
                id, work_id, period_start, period_end, due_date, status,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (work_id, period_start) DO NOTHING
            "#,
        )
        .bind(period.id().as_uuid())
        .bind(period.work_id().as_uuid())
        .bind(period.period_start())
        .bind(period.period_end())
        .bind(period.due_date())
        .bind(period.status().as_str())
        .bind(period.created_at().as_datetime())
        .bind(period.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("Failed to insert period instance", e))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| store_error("Failed to roll back transaction", e))?;
            return Ok(InsertOutcome::DuplicatePeriod);
        }

        for (position, task) in tasks.iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Too many tasks in one period: {}", tasks.len()),
                )
            })?;
            sqlx::query(
                r#"
                INSERT INTO task_instances (
                    id, period_instance_id, work_id, template_id, position, title,
                    period_start, period_end, due_date, status, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(task.id.as_uuid())
            .bind(task.period_instance_id.as_uuid())
            .bind(task.work_id.as_uuid())
            .bind(task.template_id.as_uuid())
            .bind(position)
            .bind(&task.title)
            .bind(task.period_start)
            .bind(task.period_end)
            .bind(task.due_date)
            .bind(task.status.as_str())
            .bind(task.created_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("Failed to insert task instance", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit transaction", e))?;

        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_id(
        &self,
        id: &WorkPeriodId,
    ) -> Result<Option<WorkPeriodInstance>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, work_id, period_start, period_end, due_date, status,
                   created_at, updated_at
            FROM work_period_instances WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to fetch period instance", e))?;

        row.map(row_to_period).transpose()
    }

    async fn find_tasks(&self, id: &WorkPeriodId) -> Result<Vec<TaskInstance>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, period_instance_id, work_id, template_id, title,
                   period_start, period_end, due_date, status, created_at
            FROM task_instances
            WHERE period_instance_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to fetch task instances", e))?;

        rows.into_iter().map(row_to_task).collect()
    }

    async fn update_status(
        &self,
        period: &WorkPeriodInstance,
        expected: InstanceStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE work_period_instances SET
                status = $2,
                updated_at = $3
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(period.id().as_uuid())
        .bind(period.status().as_str())
        .bind(period.updated_at().as_datetime())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to update period status", e))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match self.find_by_id(&period.id()).await? {
            None => Err(DomainError::new(
                ErrorCode::PeriodNotFound,
                format!("Period not found: {}", period.id()),
            )),
            Some(current) => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Period {} is {}, expected {}",
                    period.id(),
                    current.status(),
                    expected
                ),
            )),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

/// Classifies a sqlx error; pool exhaustion and I/O failures are transient.
pub(super) fn store_error(context: &str, err: sqlx::Error) -> DomainError {
    let code = match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorCode::StoreUnavailable
        }
        _ => ErrorCode::DatabaseError,
    };
    DomainError::new(code, format!("{}: {}", context, err))
}

fn row_to_period(row: sqlx::postgres::PgRow) -> Result<WorkPeriodInstance, DomainError> {
    let id: Uuid = row.get("id");
    let work_id: Uuid = row.get("work_id");
    let status: String = row.get("status");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(WorkPeriodInstance::reconstitute(
        WorkPeriodId::from_uuid(id),
        WorkId::from_uuid(work_id),
        row.get("period_start"),
        row.get("period_end"),
        row.get("due_date"),
        InstanceStatus::from_str(&status)?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn row_to_task(row: sqlx::postgres::PgRow) -> Result<TaskInstance, DomainError> {
    let id: Uuid = row.get("id");
    let period_instance_id: Uuid = row.get("period_instance_id");
    let work_id: Uuid = row.get("work_id");
    let template_id: Uuid = row.get("template_id");
    let status: String = row.get("status");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    Ok(TaskInstance {
        id: TaskInstanceId::from_uuid(id),
        period_instance_id: WorkPeriodId::from_uuid(period_instance_id),
        work_id: WorkId::from_uuid(work_id),
        template_id: TaskTemplateId::from_uuid(template_id),
        title: row.get("title"),
        period_start: row.get("period_start"),
        period_end: row.get("period_end"),
        due_date: row.get("due_date"),
        status: InstanceStatus::from_str(&status)?,
        created_at: Timestamp::from_datetime(created_at),
    })
}
