//! Ledger seam: read-only contract metadata lookup.

use covenant_types::{ContractMetadata, StoreError};

/// Read-only view of the ledger service.
///
/// The ledger is the source of truth for declare maps and exec patterns.
/// Lookups are blocking-I/O suspension points; implementations must not
/// require the caller to hold any resolver-internal lock across them.
#[async_trait::async_trait]
pub trait ChainService: Send + Sync {
    /// Fetch contract metadata by uid.
    ///
    /// Returns `Ok(None)` when the uid is unknown to the ledger; `Err` is
    /// reserved for query-layer failures.
    async fn contract(&self, uid: u64) -> Result<Option<ContractMetadata>, StoreError>;
}
