use std::collections::HashMap;

use log::*;
use sellercloud_tools::{SellerCloudApiError, DEFAULT_PAGE_SIZE};

use crate::traits::RemoteOrderApi;

/// Resolves the SellerCloud numeric order id for orders that already exist remotely, keyed by the reference id
/// SellerCloud echoes back.
///
/// Lookups are chunked to the remote page cap so a single page can never truncate the result set. The result
/// may still be a strict subset of the request (the remote does not guarantee to echo every id); callers must
/// treat unresolved ids as "excluded from write-back this run".
pub async fn resolve_reference_ids<R: RemoteOrderApi>(
    api: &R,
    reference_ids: &[String],
) -> Result<HashMap<String, i64>, SellerCloudApiError> {
    let mut resolved = HashMap::with_capacity(reference_ids.len());
    for chunk in reference_ids.chunks(DEFAULT_PAGE_SIZE) {
        let items = api.orders_by_source_ids(chunk).await?;
        for item in items {
            resolved.insert(item.source_order_id, item.id);
        }
    }
    if resolved.len() < reference_ids.len() {
        debug!(
            "🔎️ Duplicate lookup resolved {} of {} reference ids; the rest stay unresolved this run",
            resolved.len(),
            reference_ids.len()
        );
    }
    Ok(resolved)
}
