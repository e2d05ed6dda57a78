//! Lead store seam.
//!
//! Persistence belongs to the embedding application; the engines only need
//! read access to leads and partial write-back of computed fields. The
//! trait is dyn-compatible so engines can hold `Arc<dyn LeadStore>`.
//!
//! `MemoryLeadStore` is the reference implementation, used by tests and by
//! embedders that keep leads in process memory. Note the engines follow a
//! read-compute-write pattern that is not transactionally guarded:
//! concurrent synthesis of the same lead is last-writer-wins.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::EngineError;
use crate::types::{Lead, LeadPatch};

/// Read/write access to lead records.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Fetch a lead by id, or `None` if it does not exist.
    async fn get_lead(&self, id: &str) -> Result<Option<Lead>, EngineError>;

    /// Apply a partial field update to a lead.
    async fn update_lead(&self, id: &str, patch: LeadPatch) -> Result<(), EngineError>;

    /// Fetch all leads. Order is unspecified.
    async fn all_leads(&self) -> Result<Vec<Lead>, EngineError>;
}

/// In-memory lead store backed by a `RwLock<HashMap>`.
#[derive(Default)]
pub struct MemoryLeadStore {
    leads: RwLock<HashMap<String, Lead>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a lead.
    pub fn upsert(&self, lead: Lead) {
        self.leads.write().insert(lead.id.clone(), lead);
    }

    pub fn len(&self) -> usize {
        self.leads.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.read().is_empty()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn get_lead(&self, id: &str) -> Result<Option<Lead>, EngineError> {
        Ok(self.leads.read().get(id).cloned())
    }

    async fn update_lead(&self, id: &str, patch: LeadPatch) -> Result<(), EngineError> {
        let mut leads = self.leads.write();
        let lead = leads
            .get_mut(id)
            .ok_or_else(|| EngineError::LeadNotFound(id.to_string()))?;
        patch.apply(lead);
        Ok(())
    }

    async fn all_leads(&self) -> Result<Vec<Lead>, EngineError> {
        Ok(self.leads.read().values().cloned().collect())
    }
}
