//! RecurringWork - the configuration a period is generated from.

use crate::domain::foundation::{ValidationError, WorkId};
use crate::domain::recurrence::{
    DueDateRule, PeriodFramingPolicy, RecurrenceDefinition, TaskRecurrenceOverride,
};

/// A recurring service obligation with its cadence, framing, due rule and
/// ordered task templates.
///
/// Immutable once loaded; generation only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringWork {
    id: WorkId,
    name: String,
    recurrence: RecurrenceDefinition,
    framing_policy: PeriodFramingPolicy,
    due_rule: DueDateRule,
    tasks: Vec<TaskRecurrenceOverride>,
}

impl RecurringWork {
    /// Creates a work item with no tasks.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if the name is blank. Recurrence consistency is
    /// checked when a period is planned, not here.
    pub fn new(
        id: WorkId,
        name: impl Into<String>,
        recurrence: RecurrenceDefinition,
        framing_policy: PeriodFramingPolicy,
        due_rule: DueDateRule,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self::reconstitute(
            id,
            name,
            recurrence,
            framing_policy,
            due_rule,
            Vec::new(),
        ))
    }

    /// Rebuilds a work item from storage without validation.
    pub fn reconstitute(
        id: WorkId,
        name: String,
        recurrence: RecurrenceDefinition,
        framing_policy: PeriodFramingPolicy,
        due_rule: DueDateRule,
        tasks: Vec<TaskRecurrenceOverride>,
    ) -> Self {
        Self {
            id,
            name,
            recurrence,
            framing_policy,
            due_rule,
            tasks,
        }
    }

    /// Appends a task template; order is preserved in generated instances.
    pub fn with_task(mut self, task: TaskRecurrenceOverride) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn id(&self) -> WorkId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn recurrence(&self) -> &RecurrenceDefinition {
        &self.recurrence
    }

    pub fn framing_policy(&self) -> PeriodFramingPolicy {
        self.framing_policy
    }

    pub fn due_rule(&self) -> &DueDateRule {
        &self.due_rule
    }

    pub fn tasks(&self) -> &[TaskRecurrenceOverride] {
        &self.tasks
    }
}
