//! Execution request orchestration.
//!
//! One [`ExecutionResolver`] instance is constructed at service start and
//! shared by every request-serving task; the compile cache it owns is the
//! only mutable shared structure in the subsystem.

use std::sync::Arc;

use covenant_store::{ChainService, ContentStore};
use covenant_types::{ExecutionBundle, ResolveError};
use tracing::{debug, warn};

use crate::authorize::authorize;
use crate::bindings::BindingResolver;
use crate::compile::CompileCache;
use crate::config::ResolverConfig;

/// Composes authorization, binding resolution, and compilation into one
/// resolve-and-assemble operation per execution request.
pub struct ExecutionResolver {
    chain: Arc<dyn ChainService>,
    bindings: BindingResolver,
    cache: Arc<CompileCache>,
}

impl ExecutionResolver {
    /// Create a resolver from its collaborators and configuration.
    pub fn new(chain: Arc<dyn ChainService>, store: Arc<dyn ContentStore>, config: &ResolverConfig) -> Self {
        Self {
            chain,
            bindings: BindingResolver::new(store),
            cache: Arc::new(CompileCache::new(config.compiler.clone(), config.cache_capacity, config.build_timeout())),
        }
    }

    /// Shared compile cache handle, for inspection and invalidation.
    pub fn cache(&self) -> &Arc<CompileCache> {
        &self.cache
    }

    /// Resolve a contract for execution by the requested org group.
    ///
    /// Steps run in order and short-circuit on the first failure:
    ///
    /// 1. contract metadata fetch, where an unknown uid is a not-found
    ///    error;
    /// 2. authorization of the requested org sequence;
    /// 3. data and function declare resolution; partial results are fine,
    ///    only query-layer failures terminate;
    /// 4. compilation through the cache, or raw-source pass-through when
    ///    `compile` is false.
    ///
    /// The returned bundle is a read-only snapshot; cache population is the
    /// only side effect.
    pub async fn resolve(&self, contract_uid: u64, requested_orgs: &[String], compile: bool) -> Result<ExecutionBundle, ResolveError> {
        debug!("resolving contract {contract_uid} for {requested_orgs:?}, compile: {compile}");

        let contract = self
            .chain
            .contract(contract_uid)
            .await?
            .ok_or_else(|| ResolveError::contract_not_found(contract_uid))?;

        if !authorize(&contract.exec_patterns, requested_orgs) {
            warn!("orgs {requested_orgs:?} are not an authorized execution group for contract {contract_uid}");
            return Err(ResolveError::unauthorized(contract_uid));
        }

        let data = self.bindings.resolve_data(contract_uid, &contract.data_declares).await?;
        let functions = self.bindings.resolve_functions(contract_uid, &contract.function_declares).await?;

        let artifact = if compile {
            self.cache.get_or_build(contract_uid, &contract.source).await?
        } else {
            contract.source.into_bytes()
        };

        Ok(ExecutionBundle { artifact, data, functions })
    }
}
