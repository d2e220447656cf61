//! Per-task recurrence overrides and their resolution against the parent
//! work's configuration.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{CycleAnchor, DueDateRule, Frequency, RecurrenceDefinition, RecurrenceError};
use crate::domain::foundation::TaskTemplateId;

/// A task-level setting that either follows the parent or replaces it.
///
/// On the wire an inherited value is the string `"inherit"`, `null`, or an
/// absent field; anything else is the override value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inheritable<T> {
    Inherit,
    Override(T),
}

impl<T> Default for Inheritable<T> {
    fn default() -> Self {
        Inheritable::Inherit
    }
}

impl<T> Inheritable<T> {
    pub fn is_inherit(&self) -> bool {
        matches!(self, Inheritable::Inherit)
    }

    pub fn as_override(&self) -> Option<&T> {
        match self {
            Inheritable::Inherit => None,
            Inheritable::Override(value) => Some(value),
        }
    }
}

impl<T: Clone> Inheritable<T> {
    /// The override, or a copy of `parent`.
    pub fn resolve_or(&self, parent: &T) -> T {
        match self {
            Inheritable::Inherit => parent.clone(),
            Inheritable::Override(value) => value.clone(),
        }
    }
}

impl<T> From<Option<T>> for Inheritable<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Inheritable::Inherit, Inheritable::Override)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum InheritMarker {
    Inherit,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InheritableRepr<T> {
    Marker(InheritMarker),
    Value(T),
}

impl<T: Serialize> Serialize for Inheritable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Inheritable::Inherit => serializer.serialize_str("inherit"),
            Inheritable::Override(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Inheritable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = Option::<InheritableRepr<T>>::deserialize(deserializer)?;
        Ok(match repr {
            None | Some(InheritableRepr::Marker(InheritMarker::Inherit)) => Inheritable::Inherit,
            Some(InheritableRepr::Value(value)) => Inheritable::Override(value),
        })
    }
}

/// The recurrence-related settings a task template carries.
///
/// An anchor override is field-wise: unset fields inside it still come from
/// the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecurrenceOverride {
    pub template_id: TaskTemplateId,
    pub title: String,
    #[serde(default)]
    pub frequency: Inheritable<Frequency>,
    #[serde(default)]
    pub anchor: Inheritable<CycleAnchor>,
    #[serde(default)]
    pub due_rule: Inheritable<DueDateRule>,
}

impl TaskRecurrenceOverride {
    /// A task that follows the parent work in everything.
    pub fn inheriting(template_id: TaskTemplateId, title: impl Into<String>) -> Self {
        Self {
            template_id,
            title: title.into(),
            frequency: Inheritable::Inherit,
            anchor: Inheritable::Inherit,
            due_rule: Inheritable::Inherit,
        }
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Inheritable::Override(frequency);
        self
    }

    pub fn with_anchor(mut self, anchor: CycleAnchor) -> Self {
        self.anchor = Inheritable::Override(anchor);
        self
    }

    pub fn with_due_rule(mut self, due_rule: DueDateRule) -> Self {
        self.due_rule = Inheritable::Override(due_rule);
        self
    }
}

/// Fully resolved configuration for one task. Contains no inherit markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveTaskConfig {
    pub template_id: TaskTemplateId,
    pub title: String,
    pub recurrence: RecurrenceDefinition,
    pub due_rule: DueDateRule,
}

/// Resolves `task` against the parent work's recurrence and due rule.
///
/// Effective dates always come from the parent. The merged recurrence and
/// due rule are validated before returning.
pub fn merge(
    parent_recurrence: &RecurrenceDefinition,
    parent_due_rule: &DueDateRule,
    task: &TaskRecurrenceOverride,
) -> Result<EffectiveTaskConfig, RecurrenceError> {
    let anchor = match &task.anchor {
        Inheritable::Inherit => parent_recurrence.anchor,
        Inheritable::Override(anchor) => anchor.or(&parent_recurrence.anchor),
    };

    let recurrence = RecurrenceDefinition {
        frequency: task.frequency.resolve_or(&parent_recurrence.frequency),
        anchor,
        effective_start_date: parent_recurrence.effective_start_date,
        effective_end_date: parent_recurrence.effective_end_date,
    };
    recurrence.validate().map_err(|err| match err {
        RecurrenceError::InvalidRecurrenceConfig { reason } => RecurrenceError::invalid_config(
            format!("task '{}': {}", task.title, reason),
        ),
        other => other,
    })?;

    let due_rule = task.due_rule.resolve_or(parent_due_rule);
    due_rule.validate()?;

    Ok(EffectiveTaskConfig {
        template_id: task.template_id,
        title: task.title.clone(),
        recurrence,
        due_rule,
    })
}
