//! # Covenant Resolver
//!
//! Contract execution resolution for permissioned data collaborations.
//!
//! Given a contract uid and the set of organizations requesting to run it,
//! the resolver verifies the requesting organizations form an authorized
//! execution group, joins the contract's declared data and function
//! dependencies to available private-store content, and produces a
//! deduplicated, cached, compiled execution artifact.
//!
//! ## Architecture
//!
//! - **`authorize`**: position-wise matching of a requested org sequence
//!   against a contract's registered execution patterns
//! - **`bindings`**: declare name -> binding -> content resolution, filtered
//!   by availability
//! - **`compile`**: bounded LRU artifact cache with single-flight build
//!   deduplication and a hard build timeout
//! - **`resolve`**: the orchestrator composing the above per request
//! - **`config`**: compiler, cache, and timeout settings
//!
//! The ledger and the private content store are consumed through the trait
//! seams in `covenant-store`; the HTTP controller layer sits above this crate
//! and is out of scope here.

pub mod authorize;
pub mod bindings;
pub mod compile;
pub mod config;
pub mod resolve;

// Re-export commonly used types for convenience
pub use authorize::authorize;
pub use bindings::BindingResolver;
pub use compile::CompileCache;
pub use config::{CompilerConfig, ConfigError, ResolverConfig, load_config_from_path, validate_config};
pub use covenant_types::{ExecutionBundle, ResolveError};
pub use resolve::ExecutionResolver;
