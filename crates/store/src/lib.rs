//! # Covenant Store
//!
//! Collaborator seams consumed by the execution resolver.
//!
//! The resolver never talks to the ledger or the private content store
//! directly; it goes through the [`ChainService`] and [`ContentStore`] traits
//! defined here. Production deployments implement them over the blockchain
//! RPC client and the relational store; the in-memory implementations in
//! [`memory`] back tests and embedded use.

pub mod chain;
pub mod content;
pub mod memory;

pub use chain::ChainService;
pub use content::ContentStore;
pub use memory::{MemoryContentStore, MemoryLedger};
