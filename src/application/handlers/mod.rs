//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod work;

pub use work::{
    GeneratePeriodsCommand, GeneratePeriodsError, GeneratePeriodsHandler, GenerationOutcome,
    GenerationResult, PeriodPreview, PreviewPeriodError, PreviewPeriodHandler, PreviewPeriodQuery,
    SkipReason, UpdatePeriodStatusCommand, UpdatePeriodStatusHandler, UpdatePeriodStatusResult,
};
