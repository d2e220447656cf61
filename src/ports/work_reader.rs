//! WorkReader port - loads recurring work configuration.
//!
//! Work items and their task templates are authored elsewhere; this crate
//! only reads them.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, WorkId};
use crate::domain::work::RecurringWork;

#[async_trait]
pub trait WorkReader: Send + Sync {
    /// Load a work item with its task templates in order.
    ///
    /// Returns `None` if the work doesn't exist.
    async fn find_work(&self, id: &WorkId) -> Result<Option<RecurringWork>, DomainError>;
}
