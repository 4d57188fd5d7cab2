//! Assembled execution results and cached build artifacts.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

/// Read-only snapshot assembled for one execution request.
#[derive(Debug, Clone, Default)]
pub struct ExecutionBundle {
    /// Compiled artifact, or the raw source bytes when compilation was not
    /// requested.
    pub artifact: Vec<u8>,

    /// Resolved data dependencies, name -> `{"V": {key: value}}` payload.
    /// Names whose binding or content is unavailable are absent.
    pub data: IndexMap<String, Value>,

    /// Resolved function dependencies, name -> executable source, verbatim.
    pub functions: IndexMap<String, String>,
}

/// A successfully built artifact held by the compile cache.
///
/// Entries are created on the first successful build for a contract uid and
/// are never mutated in place; invalidation drops the entry so the next
/// caller rebuilds wholesale.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Contract the artifact was built for.
    pub contract_uid: u64,

    /// Compiler standard output, verbatim.
    pub artifact: Vec<u8>,

    /// When the build completed.
    pub built_at: DateTime<Utc>,
}
