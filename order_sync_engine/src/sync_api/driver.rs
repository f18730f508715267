use log::*;

use crate::{
    sync_api::{
        batch::{BatchSubmitter, GroupStats},
        catalog::resolve_sku_prices,
        errors::OrderSyncError,
    },
    traits::{Notifier, RemoteOrderApi, SyncDatabase},
};

/// Counters for one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub loaded: usize,
    pub created: usize,
    pub duplicates_resolved: usize,
    pub skipped: usize,
    pub written_back: usize,
}

impl RunSummary {
    fn absorb(&mut self, stats: GroupStats) {
        self.created += stats.created;
        self.duplicates_resolved += stats.duplicates_resolved;
        self.skipped += stats.skipped;
        self.written_back += stats.written_back;
    }
}

/// Top-level control for one reconciliation run:
/// load candidates → resolve the sku catalog → per customer group: fetch the customer and submit the group.
///
/// There are no retries across stages. Any stage failure aborts the run and a top-level notification carries
/// the error. This is a batch job; the next scheduled invocation picks up whatever this run left behind.
pub struct ReconciliationDriver<D, R, N>
where
    D: SyncDatabase,
    R: RemoteOrderApi,
    N: Notifier,
{
    db: D,
    api: R,
    notifier: N,
}

impl<D, R, N> ReconciliationDriver<D, R, N>
where
    D: SyncDatabase,
    R: RemoteOrderApi,
    N: Notifier,
{
    pub fn new(db: D, api: R, notifier: N) -> Self {
        Self { db, api, notifier }
    }

    pub async fn run(self) -> Result<RunSummary, OrderSyncError> {
        let result = self.run_pipeline().await;
        if let Err(e) = &result {
            error!("🏁️ Order sync run aborted: {e}");
            self.notifier.notify("Order sync run failed", &format!("Error: {e}\n\nDetail: {e:?}")).await;
        }
        result
    }

    async fn run_pipeline(&self) -> Result<RunSummary, OrderSyncError> {
        let unsynced = self.db.load_unsynced_orders().await?;
        if unsynced.is_empty() {
            info!("🏁️ No orders to upload");
            return Ok(RunSummary::default());
        }
        let mut summary = RunSummary { loaded: unsynced.order_count(), ..Default::default() };
        info!("🏁️ Loaded {} unsynced order(s) across {} customer group(s)", summary.loaded, unsynced.by_customer.len());

        let shipping_costs = self.db.shipping_cost_table().await?;
        let sku_prices = resolve_sku_prices(&self.api, &unsynced.sku_universe).await?;

        for (customer_id, orders) in unsynced.by_customer {
            let customer = self
                .api
                .customer_by_id(customer_id)
                .await
                .map_err(|source| OrderSyncError::CustomerLookup { customer_id, source })?;
            let submitter = BatchSubmitter::new(&self.api, &self.db, &self.notifier, &sku_prices, &shipping_costs);
            let stats = submitter.submit_group(&customer, orders).await;
            summary.absorb(stats);
        }

        info!(
            "🏁️ Run complete. {} created, {} duplicates resolved, {} skipped, {} written back of {} loaded",
            summary.created, summary.duplicates_resolved, summary.skipped, summary.written_back, summary.loaded
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod test {
    use osync_common::Money;

    use super::*;
    use crate::{
        test_utils::{memory_db, seed_purchase_order, seed_shipping_cost, synced_state, MockRemoteApi, RecordingNotifier},
        traits::LogNotifier,
    };

    #[tokio::test]
    async fn an_empty_candidate_set_short_circuits() {
        let db = memory_db().await;
        let api = MockRemoteApi::default();
        let summary = ReconciliationDriver::new(db, api, LogNotifier).run().await.unwrap();
        assert_eq!(summary, RunSummary::default());
    }

    #[tokio::test]
    async fn end_to_end_po1001_is_created_and_written_back() {
        let _ = env_logger::try_init();
        let db = memory_db().await;
        seed_purchase_order(&db, "PO1001", "ABC").await;
        seed_shipping_cost(&db, "X1", Money::from_dollars(1.50)).await;
        let api = MockRemoteApi::default()
            .with_catalog([("X1".to_string(), Some(Money::from_cents(1000)))])
            .with_customer(501, "Acme Wholesale", "orders@acme.example", 0.10)
            .with_created_id("ABCPO1001", 4242);
        let notifier = RecordingNotifier::default();

        let summary = ReconciliationDriver::new(db.clone(), api.clone(), notifier.clone()).run().await.unwrap();

        assert_eq!(summary, RunSummary {
            loaded: 1,
            created: 1,
            duplicates_resolved: 0,
            skipped: 0,
            written_back: 1,
        });
        assert!(notifier.messages().is_empty());
        let (in_sellercloud, remote_id, shipping) = synced_state(&db, "PO1001").await;
        assert!(in_sellercloud);
        assert_eq!(remote_id, Some(4242));
        assert_eq!(shipping, Some(Money::from_cents(300)));
    }

    #[tokio::test]
    async fn a_sku_missing_from_the_catalog_skips_the_order_with_one_notification() {
        let db = memory_db().await;
        seed_purchase_order(&db, "PO1001", "ABC").await;
        seed_shipping_cost(&db, "X1", Money::from_dollars(1.50)).await;
        // Catalog lookup succeeds but does not return X1.
        let api = MockRemoteApi::default().with_customer(501, "Acme Wholesale", "orders@acme.example", 0.10);
        let notifier = RecordingNotifier::default();

        let summary = ReconciliationDriver::new(db.clone(), api, notifier.clone()).run().await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.written_back, 0);
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].1.contains("X1"));
        let (in_sellercloud, remote_id, _) = synced_state(&db, "PO1001").await;
        assert!(!in_sellercloud);
        assert_eq!(remote_id, None);
    }

    #[tokio::test]
    async fn a_catalog_failure_aborts_the_run_with_a_notification() {
        let db = memory_db().await;
        seed_purchase_order(&db, "PO1001", "ABC").await;
        let api = MockRemoteApi::default().fail_catalog();
        let notifier = RecordingNotifier::default();

        let err = ReconciliationDriver::new(db, api, notifier.clone()).run().await.unwrap_err();

        assert!(matches!(err, OrderSyncError::SkuResolution(_)));
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "Order sync run failed");
    }
}
