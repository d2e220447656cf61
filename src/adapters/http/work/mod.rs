//! HTTP adapter for work period endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, GeneratePeriodsRequest, GenerationResponse, PeriodResponse, PreviewQuery,
    PreviewResponse, StatusResponse, TaskResponse, UpdateStatusRequest, WarningResponse,
    WindowResponse,
};
pub use handlers::{status_for, WorkHandlers};
pub use routes::work_routes;
