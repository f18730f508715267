use std::collections::HashSet;

use log::*;
use sellercloud_tools::DEFAULT_PAGE_SIZE;

use crate::{db_types::SkuPriceIndex, sync_api::errors::OrderSyncError, traits::RemoteOrderApi};

/// Skus per catalog lookup, a SellerCloud request-size limit.
pub const CATALOG_BATCH_SIZE: usize = DEFAULT_PAGE_SIZE;

/// Resolves the wholesale price of every sku in the run's sku universe, in batches of
/// [`CATALOG_BATCH_SIZE`]. Skus SellerCloud does not return are left out of the index: they are not in the
/// remote catalog and any order containing them will fail validation.
///
/// A lookup failure aborts the run: without a usable catalog no order can be validated.
pub async fn resolve_sku_prices<R: RemoteOrderApi>(
    api: &R,
    sku_universe: &HashSet<String>,
) -> Result<SkuPriceIndex, OrderSyncError> {
    let mut skus: Vec<String> = sku_universe.iter().cloned().collect();
    skus.sort_unstable();
    let mut index = SkuPriceIndex::with_capacity(skus.len());
    for batch in skus.chunks(CATALOG_BATCH_SIZE) {
        let items = api.catalog_by_skus(batch).await.map_err(OrderSyncError::SkuResolution)?;
        for item in items {
            index.insert(item.sku, item.wholesale_price.unwrap_or_default());
        }
    }
    info!("📇️ Resolved {} of {} skus against the SellerCloud catalog", index.len(), skus.len());
    Ok(index)
}
