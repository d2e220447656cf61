//! Period planning.
//!
//! `plan_period` is the only place that composes framing, due-date
//! resolution and task merging. Preview and generation both call it, so
//! what a user previews is what gets persisted.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::RecurringWork;
use crate::domain::foundation::{TaskTemplateId, WorkId};
use crate::domain::recurrence::{
    compute_cycle_boundaries, frame_period, merge, resolve_detailed, window_clamp_warning,
    ClampContext, ClampedDateWarning, CycleWindow, RecurrenceError,
};

/// Planned window and due date for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPlan {
    pub template_id: TaskTemplateId,
    pub title: String,
    pub window: CycleWindow,
    pub due_date: NaiveDate,
}

/// Everything needed to persist one period, computed without I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodPlan {
    pub work_id: WorkId,
    pub reference_date: NaiveDate,
    pub window: CycleWindow,
    pub due_date: NaiveDate,
    pub tasks: Vec<TaskPlan>,
    pub warnings: Vec<ClampedDateWarning>,
}

/// Plans the period of `work` framed by `reference`.
///
/// Each task is placed in its own cadence's window containing the later of
/// the work window start and the task's effective start, so tasks that
/// inherit the cadence share the work window.
///
/// # Errors
///
/// Any recurrence or offset error, at work or task level, aborts the whole
/// plan. So does a task template listed twice.
pub fn plan_period(work: &RecurringWork, reference: NaiveDate) -> Result<PeriodPlan, RecurrenceError> {
    let window = frame_period(work.recurrence(), reference, work.framing_policy())?;
    let mut warnings = Vec::new();
    warnings.extend(window_clamp_warning(
        work.recurrence(),
        &window,
        ClampContext::WorkWindowStart,
    ));

    let due = resolve_detailed(&window, work.due_rule(), ClampContext::WorkDueDate)?;
    warnings.extend(due.warning);

    let mut tasks = Vec::with_capacity(work.tasks().len());
    let mut templates = HashSet::with_capacity(work.tasks().len());
    for task in work.tasks() {
        if !templates.insert(task.template_id) {
            return Err(RecurrenceError::invalid_config(format!(
                "task template {} is listed more than once",
                task.template_id
            )));
        }
        let config = merge(work.recurrence(), work.due_rule(), task)?;
        let task_window = compute_cycle_boundaries(&config.recurrence, window.start, 1)?
            .next()
            .ok_or_else(|| {
                RecurrenceError::unresolved(
                    reference,
                    format!("task '{}' has no window in the effective range", config.title),
                )
            })?;
        warnings.extend(window_clamp_warning(
            &config.recurrence,
            &task_window,
            ClampContext::TaskWindowStart,
        ));

        let task_due = resolve_detailed(&task_window, &config.due_rule, ClampContext::TaskDueDate)?;
        warnings.extend(task_due.warning);

        tasks.push(TaskPlan {
            template_id: config.template_id,
            title: config.title,
            window: task_window,
            due_date: task_due.date,
        });
    }

    Ok(PeriodPlan {
        work_id: work.id(),
        reference_date: reference,
        window,
        due_date: due.date,
        tasks,
        warnings,
    })
}
