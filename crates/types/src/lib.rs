//! # Covenant Types
//!
//! Shared type definitions for the Covenant contract execution resolver.
//!
//! This crate holds the data model exchanged between the ledger, the private
//! content store, and the resolver: contract metadata with its declare maps
//! and execution patterns, binding and content records, the assembled
//! execution bundle, and the error taxonomy surfaced to callers.

pub mod bundle;
pub mod contract;
pub mod errors;
pub mod record;

pub use bundle::{CacheEntry, ExecutionBundle};
pub use contract::{ContractMetadata, ExecPattern};
pub use errors::{ResolveError, StoreError};
pub use record::{BindingRecord, BoundContent, ContentRecord};
