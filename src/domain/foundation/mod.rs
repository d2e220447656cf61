//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the workcycle domain.

mod errors;
mod ids;
mod instance_status;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{TaskInstanceId, TaskTemplateId, WorkId, WorkPeriodId};
pub use instance_status::InstanceStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
