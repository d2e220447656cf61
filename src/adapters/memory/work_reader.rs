//! In-memory WorkReader for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, WorkId};
use crate::domain::work::RecurringWork;
use crate::ports::WorkReader;

/// Work configuration held in a map.
#[derive(Default)]
pub struct InMemoryWorkReader {
    works: RwLock<HashMap<WorkId, RecurringWork>>,
}

impl InMemoryWorkReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a work item.
    pub async fn insert(&self, work: RecurringWork) {
        self.works.write().await.insert(work.id(), work);
    }
}

#[async_trait]
impl WorkReader for InMemoryWorkReader {
    async fn find_work(&self, id: &WorkId) -> Result<Option<RecurringWork>, DomainError> {
        Ok(self.works.read().await.get(id).cloned())
    }
}
