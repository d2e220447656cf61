//! PostgreSQL adapters - Database implementations for the store ports.
//!
//! - `PostgresWorkReader` - Loads work configuration and task templates
//! - `PostgresWorkPeriodStore` - Idempotent period and task instance storage

mod work_period_store;
mod work_reader;

pub use work_period_store::PostgresWorkPeriodStore;
pub use work_reader::PostgresWorkReader;
