//! Workcycle - recurrence and due-date engine for recurring service work.
//!
//! Decides which calendar window is "the period" for a recurring work item,
//! what its due date is, and generates the period and its task instances
//! idempotently.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
