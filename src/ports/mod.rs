//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `WorkReader` - Loads recurring work configuration
//! - `WorkPeriodStore` - Persists generated period and task instances

mod work_period_store;
mod work_reader;

pub use work_period_store::{InsertOutcome, WorkPeriodStore};
pub use work_reader::WorkReader;
