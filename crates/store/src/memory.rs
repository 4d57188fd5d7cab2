//! In-memory collaborator implementations.
//!
//! These back the resolver's tests and embedded use. They implement the same
//! contracts as the production collaborators, including the availability
//! filter of the content join.

use std::collections::HashMap;

use covenant_types::{BindingRecord, BoundContent, ContentRecord, ContractMetadata, StoreError};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{ChainService, ContentStore};

/// In-memory ledger holding contract metadata by uid.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    contracts: RwLock<HashMap<u64, ContractMetadata>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish or replace a contract.
    pub async fn publish(&self, contract: ContractMetadata) {
        debug!("publishing contract {}", contract.uid);
        let mut contracts = self.contracts.write().await;
        contracts.insert(contract.uid, contract);
    }

    /// Remove a contract from the ledger.
    pub async fn retract(&self, uid: u64) {
        let mut contracts = self.contracts.write().await;
        contracts.remove(&uid);
    }
}

#[async_trait::async_trait]
impl ChainService for MemoryLedger {
    async fn contract(&self, uid: u64) -> Result<Option<ContractMetadata>, StoreError> {
        let contracts = self.contracts.read().await;
        Ok(contracts.get(&uid).cloned())
    }
}

/// In-memory private content store holding bindings and content records.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    bindings: RwLock<Vec<BindingRecord>>,
    contents: RwLock<HashMap<u64, ContentRecord>>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding record.
    pub async fn insert_binding(&self, binding: BindingRecord) {
        let mut bindings = self.bindings.write().await;
        bindings.push(binding);
    }

    /// Insert a content record.
    pub async fn insert_content(&self, content: ContentRecord) {
        let mut contents = self.contents.write().await;
        contents.insert(content.uid, content);
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryContentStore {
    async fn bound_content(&self, contract_uid: u64, declare_uids: &[u64]) -> Result<Vec<BoundContent>, StoreError> {
        let bindings = self.bindings.read().await;
        let contents = self.contents.read().await;

        let mut rows = Vec::new();
        for binding in bindings.iter() {
            if binding.contract_uid != contract_uid || !binding.available || !declare_uids.contains(&binding.declare_uid) {
                continue;
            }
            let Some(content) = contents.get(&binding.content_uid) else {
                continue;
            };
            if !content.available {
                continue;
            }
            rows.push(BoundContent {
                declare_uid: binding.declare_uid,
                content: content.clone(),
            });
        }
        Ok(rows)
    }
}
