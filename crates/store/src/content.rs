//! Private content store seam: the declare -> binding -> content join.

use covenant_types::{BoundContent, StoreError};

/// Relational query capability over the private local store.
///
/// Implementations must express the join
///
/// ```sql
/// SELECT declare_uid, content.*
/// FROM bindings JOIN content ON bindings.content_uid = content.uid
/// WHERE bindings.contract_uid = ?
///   AND bindings.declare_uid IN (?)
///   AND bindings.available AND content.available
/// ```
///
/// so that rows whose binding or content is unavailable never reach the
/// resolver. Declares with no surviving row are simply absent from the
/// result, which callers treat as "dependency not currently satisfiable".
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Run the availability-filtered join for one contract and a set of
    /// declare uids.
    async fn bound_content(&self, contract_uid: u64, declare_uids: &[u64]) -> Result<Vec<BoundContent>, StoreError>;
}
