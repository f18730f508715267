use std::collections::HashMap;

use log::*;
use sellercloud_tools::{CreateOrderOutcome, CustomerRecord, DEFAULT_PAGE_SIZE};

use crate::{
    db_types::{PurchaseOrder, ShippingCostTable, SkuPriceIndex},
    sync_api::{duplicates::resolve_reference_ids, payload::build_order},
    traits::{Notifier, RemoteOrderApi, SyncDatabase},
};

/// Orders per SellerCloud create-order batch. A remote request-size constraint, not a logical unit.
pub const ORDER_BATCH_SIZE: usize = DEFAULT_PAGE_SIZE;

/// Splits `items` into consecutive batches of at most `batch_size`, preserving order.
pub fn partition_batches<T>(items: Vec<T>, batch_size: usize) -> Vec<Vec<T>> {
    let mut batches = Vec::with_capacity(items.len().div_ceil(batch_size.max(1)));
    let mut batch = Vec::with_capacity(batch_size.min(items.len()));
    for item in items {
        batch.push(item);
        if batch.len() == batch_size {
            batches.push(std::mem::take(&mut batch));
        }
    }
    if !batch.is_empty() {
        batches.push(batch);
    }
    batches
}

/// Per-group submission counters, absorbed into the run summary by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupStats {
    pub created: usize,
    pub duplicates_resolved: usize,
    pub skipped: usize,
    pub written_back: usize,
}

/// Submits one customer group's orders in sequential batches of [`ORDER_BATCH_SIZE`].
///
/// Per batch: every order is built, priced and submitted; duplicates are resolved in one call at the end of
/// the batch; then exactly the orders carrying a remote id are written back in one bulk update. The duplicate
/// index is scoped to the batch and cleared regardless of outcome.
pub struct BatchSubmitter<'a, R, D, N>
where
    R: RemoteOrderApi,
    D: SyncDatabase,
    N: Notifier,
{
    api: &'a R,
    db: &'a D,
    notifier: &'a N,
    sku_prices: &'a SkuPriceIndex,
    shipping_costs: &'a ShippingCostTable,
}

impl<'a, R, D, N> BatchSubmitter<'a, R, D, N>
where
    R: RemoteOrderApi,
    D: SyncDatabase,
    N: Notifier,
{
    pub fn new(
        api: &'a R,
        db: &'a D,
        notifier: &'a N,
        sku_prices: &'a SkuPriceIndex,
        shipping_costs: &'a ShippingCostTable,
    ) -> Self {
        Self { api, db, notifier, sku_prices, shipping_costs }
    }

    pub async fn submit_group(&self, customer: &CustomerRecord, orders: Vec<PurchaseOrder>) -> GroupStats {
        let mut stats = GroupStats::default();
        let batches = partition_batches(orders, ORDER_BATCH_SIZE);
        debug!("🚚️ Submitting {} batch(es) for {}", batches.len(), customer.name());
        for batch in batches {
            self.submit_batch(customer, batch, &mut stats).await;
        }
        stats
    }

    async fn submit_batch(&self, customer: &CustomerRecord, batch: Vec<PurchaseOrder>, stats: &mut GroupStats) {
        // Orders that carry a remote id and are ready for write-back.
        let mut completed: Vec<PurchaseOrder> = Vec::new();
        // The batch's duplicate index: reference id -> the order awaiting its remote id.
        let mut duplicates: HashMap<String, PurchaseOrder> = HashMap::new();

        for mut order in batch {
            let (submission, amounts) = match build_order(&order, customer, self.sku_prices, self.shipping_costs) {
                Ok(built) => built,
                Err(failure) => {
                    let (subject, body) = failure.notification();
                    self.notifier.notify(&subject, &body).await;
                    info!("⏭️ Skipping order {}: {failure}", order.purchase_order_number);
                    stats.skipped += 1;
                    continue;
                },
            };
            order.order_amounts = Some(amounts);
            let reference_id = submission.order_details.order_source_order_id.clone();
            match self.api.submit_order(&submission).await {
                Ok(CreateOrderOutcome::Created(remote_id)) => {
                    info!("📦️ Order uploaded: {reference_id} -> SellerCloud #{remote_id}");
                    order.sellercloud_order_id = Some(remote_id);
                    stats.created += 1;
                    completed.push(order);
                },
                Ok(CreateOrderOutcome::AlreadyExists) => {
                    info!("📦️ Order {reference_id} already exists in SellerCloud");
                    if let Some(displaced) = duplicates.insert(reference_id.clone(), order) {
                        // Two orders in the batch derived the same reference id. Only one can claim the
                        // remote order; the other is excluded from write-back this run.
                        warn!(
                            "📦️ Order {} also maps to reference id {reference_id}; it will not be written back \
                             this run",
                            displaced.purchase_order_number
                        );
                        stats.skipped += 1;
                    }
                },
                Err(e) => {
                    let payload = serde_json::to_string_pretty(&submission).unwrap_or_default();
                    self.notifier
                        .notify(
                            "There was an error uploading an order to SellerCloud",
                            &format!("Order: {payload}\n\nError: {e}"),
                        )
                        .await;
                    warn!("📦️ Order {reference_id} rejected: {e}");
                    stats.skipped += 1;
                },
            }
        }

        if !duplicates.is_empty() {
            self.resolve_duplicates(&mut duplicates, &mut completed, stats).await;
        }

        if !completed.is_empty() {
            match self.db.write_back(&completed).await {
                Ok(()) => {
                    debug!("🗃️ Wrote back {} order(s)", completed.len());
                    stats.written_back += completed.len();
                },
                Err(e) => {
                    let orders: Vec<&str> =
                        completed.iter().map(|o| o.purchase_order_number.as_str()).collect();
                    self.notifier
                        .notify(
                            "There was an error updating purchase orders in the database after upload",
                            &format!("Error: {e}\n\nOrders: {orders:?}"),
                        )
                        .await;
                },
            }
        }
    }

    /// Resolves the batch's duplicate index in one (chunked) lookup and moves resolved orders to `completed`.
    /// The index is consumed either way; unresolved orders are excluded from write-back this run.
    async fn resolve_duplicates(
        &self,
        duplicates: &mut HashMap<String, PurchaseOrder>,
        completed: &mut Vec<PurchaseOrder>,
        stats: &mut GroupStats,
    ) {
        let reference_ids: Vec<String> = duplicates.keys().cloned().collect();
        match resolve_reference_ids(self.api, &reference_ids).await {
            Ok(resolved) => {
                for (reference_id, remote_id) in resolved {
                    if let Some(mut order) = duplicates.remove(&reference_id) {
                        order.sellercloud_order_id = Some(remote_id);
                        stats.duplicates_resolved += 1;
                        completed.push(order);
                    }
                }
            },
            Err(e) => {
                self.notifier
                    .notify(
                        "There was an error getting the SellerCloud ids for duplicate orders",
                        &format!("Error: {e}\n\nOrder reference ids: {reference_ids:?}"),
                    )
                    .await;
            },
        }
        for (reference_id, _) in duplicates.drain() {
            debug!("🔎️ Duplicate {reference_id} left unresolved; excluded from write-back this run");
            stats.skipped += 1;
        }
    }
}
