//! Binding and content records held by the private content store.

use serde::{Deserialize, Serialize};

/// Association of a declare slot to a concrete content record for one
/// contract.
///
/// Many bindings may reference the same declare uid over time; the store is
/// expected to keep exactly one available per `(contract_uid, declare_uid)`
/// pair. The resolver only consumes that invariant, it does not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingRecord {
    /// Store-assigned binding uid.
    pub uid: u64,

    /// Contract this binding belongs to.
    pub contract_uid: u64,

    /// Declare slot being satisfied.
    pub declare_uid: u64,

    /// Content record backing the slot.
    pub content_uid: u64,

    /// Whether this binding currently participates in resolution.
    pub available: bool,
}

/// A content payload in the private local store.
///
/// Immutable once read for a resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Store-assigned content uid.
    pub uid: u64,

    /// Raw payload: structured key/value text for data declares, executable
    /// source for function declares.
    pub content: String,

    /// Whether this content currently participates in resolution.
    pub available: bool,
}

/// One row of the declare -> binding -> content join.
#[derive(Debug, Clone)]
pub struct BoundContent {
    /// Declare uid the row satisfies.
    pub declare_uid: u64,

    /// Content record reached through the available binding.
    pub content: ContentRecord,
}
