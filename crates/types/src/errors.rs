//! Error taxonomy for the execution resolver.

use std::time::Duration;

use thiserror::Error;

/// Failures raised by the collaborator stores (ledger, private content
/// store).
///
/// These describe query-layer breakage, never a "dependency simply absent"
/// condition; missing bindings are silently omitted from resolution results.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("ledger query failed: {reason}")]
    Ledger { reason: String },

    #[error("content store query failed: {reason}")]
    Query { reason: String },
}

impl StoreError {
    /// Create a ledger query error.
    pub fn ledger(reason: impl Into<String>) -> Self {
        Self::Ledger { reason: reason.into() }
    }

    /// Create a content store query error.
    pub fn query(reason: impl Into<String>) -> Self {
        Self::Query { reason: reason.into() }
    }
}

/// Failures surfaced to callers of the execution resolver.
///
/// All variants propagate uncaught; none are retried automatically. The only
/// retry-like behavior in the subsystem is that failed builds are never
/// cached, so the next caller re-attempts.
///
/// Variants are `Clone` so one shared build outcome can be handed to every
/// concurrent waiter of a deduplicated build.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("contract not found: {uid}")]
    ContractNotFound { uid: u64 },

    #[error("requested orgs are not an authorized execution group for contract {uid}")]
    Unauthorized { uid: u64 },

    #[error("store query failed: {0}")]
    Store(#[from] StoreError),

    #[error("build timed out after {timeout:?}")]
    BuildTimeout { timeout: Duration },

    #[error("build failed: {stderr}")]
    BuildFailed { stderr: String },

    #[error("malformed content for declare `{name}`: {reason}")]
    MalformedContent { name: String, reason: String },
}

impl ResolveError {
    /// Create a contract not found error.
    pub fn contract_not_found(uid: u64) -> Self {
        Self::ContractNotFound { uid }
    }

    /// Create an unauthorized execution group error.
    pub fn unauthorized(uid: u64) -> Self {
        Self::Unauthorized { uid }
    }

    /// Create a build timeout error.
    pub fn build_timeout(timeout: Duration) -> Self {
        Self::BuildTimeout { timeout }
    }

    /// Create a build failure error carrying the compiler's stderr.
    pub fn build_failed(stderr: impl Into<String>) -> Self {
        Self::BuildFailed { stderr: stderr.into() }
    }

    /// Create a malformed content error for a named declare.
    pub fn malformed_content(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
