//! Recurrence engine - cadences, period framing and due dates.
//!
//! Everything here is pure: no I/O, no clocks, no shared state. Callers pass
//! the reference date in.
//!
//! Flow: a [`RecurrenceDefinition`] yields [`CycleWindow`]s, framing picks
//! one window for a reference date, and a [`DueDateRule`] turns that window
//! into a due date. Task overrides are merged against the parent work before
//! the same steps run per task.

pub mod calendar;
mod cycle;
mod definition;
mod due_date;
mod errors;
mod framing;
mod task_override;

pub use cycle::{
    compute_cycle_boundaries, next_window, previous_window, window_clamp_warning,
    window_containing, CycleBoundaries, CycleWindow,
};
pub use definition::{AnchorWeekday, CycleAnchor, Frequency, RecurrenceDefinition};
pub use due_date::{
    resolve, resolve_detailed, DueDateResolution, DueDateRule, OffsetAnchor, OffsetUnit,
};
pub use errors::{ClampContext, ClampedDateWarning, RecurrenceError};
pub use framing::{frame_period, select_framed_period, PeriodFramingPolicy};
pub use task_override::{merge, EffectiveTaskConfig, Inheritable, TaskRecurrenceOverride};
