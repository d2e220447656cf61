//! Work module - recurring work items, their planned periods and the
//! instances generated from them.

mod period_instance;
mod planner;
mod recurring_work;
mod task_instance;

pub use period_instance::WorkPeriodInstance;
pub use planner::{plan_period, PeriodPlan, TaskPlan};
pub use recurring_work::RecurringWork;
pub use task_instance::TaskInstance;
