//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (generate, update status) write; the preview handler only
//! reads.

pub mod handlers;

pub use handlers::{
    GeneratePeriodsCommand, GeneratePeriodsError, GeneratePeriodsHandler, GenerationOutcome,
    GenerationResult, PeriodPreview, PreviewPeriodError, PreviewPeriodHandler, PreviewPeriodQuery,
    SkipReason, UpdatePeriodStatusCommand, UpdatePeriodStatusHandler, UpdatePeriodStatusResult,
};
