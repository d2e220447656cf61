//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed work reader and period store
//! - `memory` - In-memory equivalents for tests and local runs
//! - `http` - axum REST API

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::{InMemoryWorkPeriodStore, InMemoryWorkReader};
pub use postgres::{PostgresWorkPeriodStore, PostgresWorkReader};
