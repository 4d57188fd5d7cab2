//! Declare resolution through the binding -> content join.
//!
//! A contract exposes named dependency slots ("declares") for data and for
//! functions. The private content store binds each slot to concrete content;
//! this module joins a contract's declare map to the available content and
//! shapes the payloads for the executor.

use std::{collections::HashMap, sync::Arc};

use covenant_store::ContentStore;
use covenant_types::ResolveError;
use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value};
use tracing::{error, warn};

/// Resolves named declares to concrete private-store content.
pub struct BindingResolver {
    store: Arc<dyn ContentStore>,
}

impl BindingResolver {
    /// Create a resolver over a content store.
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Resolve data declares, re-encoding each payload into the executor's
    /// `{"V": {key: value}}` wrapper.
    ///
    /// Declares with no available binding are absent from the result, not
    /// errors. Malformed stored content is a fatal internal error: it is
    /// logged with full context and surfaced, never swallowed.
    pub async fn resolve_data(&self, contract_uid: u64, declares: &IndexMap<String, u64>) -> Result<IndexMap<String, Value>, ResolveError> {
        let raw = self.resolve_raw(contract_uid, declares).await?;

        let mut resolved = IndexMap::new();
        for (name, content) in raw {
            match parse_data_content(&content) {
                Ok(value) => {
                    resolved.insert(name, value);
                }
                Err(reason) => {
                    error!("malformed data content for declare `{name}` on contract {contract_uid}: {reason} (raw: {content:?})");
                    return Err(ResolveError::malformed_content(name, reason));
                }
            }
        }
        Ok(resolved)
    }

    /// Resolve function declares; executable content passes through
    /// unmodified.
    pub async fn resolve_functions(&self, contract_uid: u64, declares: &IndexMap<String, u64>) -> Result<IndexMap<String, String>, ResolveError> {
        self.resolve_raw(contract_uid, declares).await
    }

    /// Map declare names to raw content for every declare with a surviving
    /// join row.
    async fn resolve_raw(&self, contract_uid: u64, declares: &IndexMap<String, u64>) -> Result<IndexMap<String, String>, ResolveError> {
        if declares.is_empty() {
            return Ok(IndexMap::new());
        }

        let declare_uids: Vec<u64> = declares.values().copied().collect();
        let rows = self.store.bound_content(contract_uid, &declare_uids).await?;

        let mut by_declare: HashMap<u64, String> = HashMap::new();
        for row in rows {
            if by_declare.contains_key(&row.declare_uid) {
                // The store is expected to keep one available binding per
                // declare; keep the first row if that slips.
                warn!("multiple available bindings for declare {} on contract {contract_uid}", row.declare_uid);
                continue;
            }
            by_declare.insert(row.declare_uid, row.content.content);
        }

        let mut resolved = IndexMap::new();
        for (name, declare_uid) in declares {
            if let Some(content) = by_declare.get(declare_uid) {
                resolved.insert(name.clone(), content.clone());
            }
        }
        Ok(resolved)
    }
}

/// Parse the two-token `<key> <integer>` data encoding.
fn parse_data_content(raw: &str) -> Result<Value, String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(format!("expected key/value token pairs, got {} tokens", tokens.len()));
    }

    let mut values = JsonMap::new();
    for pair in tokens.chunks(2) {
        let value: i64 = pair[1]
            .parse()
            .map_err(|_| format!("expected integer value for key `{}`, got `{}`", pair[0], pair[1]))?;
        values.insert(pair[0].to_string(), Value::from(value));
    }
    Ok(Value::Object(JsonMap::from_iter([("V".to_string(), Value::Object(values))])))
}
