//! TaskInstance - a task generated inside a work period.

use chrono::NaiveDate;

use super::{TaskPlan, WorkPeriodInstance};
use crate::domain::foundation::{
    InstanceStatus, TaskInstanceId, TaskTemplateId, Timestamp, WorkId, WorkPeriodId,
};

/// A generated task. Its window may differ from the parent period's when the
/// task overrides the cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInstance {
    pub id: TaskInstanceId,
    pub period_instance_id: WorkPeriodId,
    pub work_id: WorkId,
    pub template_id: TaskTemplateId,
    pub title: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InstanceStatus,
    pub created_at: Timestamp,
}

impl TaskInstance {
    /// Creates a pending task for `period` from its plan.
    pub fn from_plan(period: &WorkPeriodInstance, plan: &TaskPlan) -> Self {
        Self {
            id: TaskInstanceId::new(),
            period_instance_id: period.id(),
            work_id: period.work_id(),
            template_id: plan.template_id,
            title: plan.title.clone(),
            period_start: plan.window.start,
            period_end: plan.window.end,
            due_date: plan.due_date,
            status: InstanceStatus::Pending,
            created_at: period.created_at(),
        }
    }
}
