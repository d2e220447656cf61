//! PostgreSQL implementation of WorkReader.
//!
//! Recurrence and due rules are stored as JSONB in their serde shape. A NULL
//! override column on a task template means "inherit".

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::work_period_store::store_error;
use crate::domain::foundation::{DomainError, ErrorCode, TaskTemplateId, WorkId};
use crate::domain::recurrence::{
    DueDateRule, Inheritable, PeriodFramingPolicy, RecurrenceDefinition, TaskRecurrenceOverride,
};
use crate::domain::work::RecurringWork;
use crate::ports::WorkReader;

/// PostgreSQL implementation of WorkReader.
#[derive(Clone)]
pub struct PostgresWorkReader {
    pool: PgPool,
}

impl PostgresWorkReader {
    /// Creates a new PostgresWorkReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkReader for PostgresWorkReader {
    async fn find_work(&self, id: &WorkId) -> Result<Option<RecurringWork>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, recurrence, framing_policy, due_rule
            FROM works WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to fetch work", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let task_rows = sqlx::query(
            r#"
            SELECT template_id, title, frequency, anchor, due_rule
            FROM work_tasks
            WHERE work_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to fetch work tasks", e))?;

        let tasks = task_rows
            .into_iter()
            .map(row_to_task_override)
            .collect::<Result<Vec<_>, _>>()?;

        let work_id: Uuid = row.get("id");
        let framing_policy: String = row.get("framing_policy");

        Ok(Some(RecurringWork::reconstitute(
            WorkId::from_uuid(work_id),
            row.get("name"),
            from_json::<RecurrenceDefinition>("recurrence", row.get("recurrence"))?,
            str_to_framing_policy(&framing_policy)?,
            from_json::<DueDateRule>("due_rule", row.get("due_rule"))?,
            tasks,
        )))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

fn row_to_task_override(row: sqlx::postgres::PgRow) -> Result<TaskRecurrenceOverride, DomainError> {
    let template_id: Uuid = row.get("template_id");

    Ok(TaskRecurrenceOverride {
        template_id: TaskTemplateId::from_uuid(template_id),
        title: row.get("title"),
        frequency: inheritable("frequency", row.get("frequency"))?,
        anchor: inheritable("anchor", row.get("anchor"))?,
        due_rule: inheritable("due_rule", row.get("due_rule"))?,
    })
}

fn inheritable<T: DeserializeOwned>(
    column: &str,
    value: Option<serde_json::Value>,
) -> Result<Inheritable<T>, DomainError> {
    match value {
        None => Ok(Inheritable::Inherit),
        Some(value) => from_json(column, value),
    }
}

fn from_json<T: DeserializeOwned>(column: &str, value: serde_json::Value) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| {
        DomainError::new(
            ErrorCode::InvalidRecurrenceConfig,
            format!("Malformed {} column: {}", column, e),
        )
    })
}

fn str_to_framing_policy(s: &str) -> Result<PeriodFramingPolicy, DomainError> {
    match s {
        "previous_period" => Ok(PeriodFramingPolicy::PreviousPeriod),
        "current_period" => Ok(PeriodFramingPolicy::CurrentPeriod),
        "next_period" => Ok(PeriodFramingPolicy::NextPeriod),
        other => Err(DomainError::new(
            ErrorCode::InvalidRecurrenceConfig,
            format!("Unknown framing policy: {}", other),
        )),
    }
}
