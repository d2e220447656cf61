//! In-memory adapters for tests and local runs.

mod work_period_store;
mod work_reader;

pub use work_period_store::InMemoryWorkPeriodStore;
pub use work_reader::InMemoryWorkReader;
