//! Work handlers - period generation, preview and status changes.

mod generate_periods;
mod preview_period;
mod retry;
mod update_period_status;

pub use generate_periods::{
    GeneratePeriodsCommand, GeneratePeriodsError, GeneratePeriodsHandler, GenerationOutcome,
    GenerationResult, SkipReason,
};
pub use preview_period::{PeriodPreview, PreviewPeriodError, PreviewPeriodHandler, PreviewPeriodQuery};
pub use update_period_status::{
    UpdatePeriodStatusCommand, UpdatePeriodStatusHandler, UpdatePeriodStatusResult,
};
