//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, statuses, errors)
//! - `recurrence` - Pure recurrence engine: cycles, framing, due dates, task overrides
//! - `work` - Recurring work items, period planning and generated instances

pub mod foundation;
pub mod recurrence;
pub mod work;
