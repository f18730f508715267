use thiserror::Error;

use crate::db_types::{PurchaseOrder, ShippingCostTable, UnsyncedOrders};

/// What the engine needs from the local relational store.
///
/// The store itself (schema, queries, connection handling) is a collaborator; the engine only sees this trait.
/// A single handle is reused for the whole run and explicitly closed on completion or top-level failure.
#[allow(async_fn_in_trait)]
pub trait SyncDatabase: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Loads the purchase orders that have not been synced to SellerCloud (`in_sellercloud = 0`,
    /// `is_cancelled = 0`), grouped by SellerCloud customer id, together with the run's sku universe.
    async fn load_unsynced_orders(&self) -> Result<UnsyncedOrders, SyncDatabaseError>;

    /// Loads the per-unit shipping cost table, keyed by sku and by sku alias.
    async fn shipping_cost_table(&self) -> Result<ShippingCostTable, SyncDatabaseError>;

    /// Persists the remote order id and shipping cost for the given orders, and marks them as synced, in one
    /// bulk update. Every order passed in must carry a `sellercloud_order_id`.
    async fn write_back(&self, orders: &[PurchaseOrder]) -> Result<(), SyncDatabaseError>;

    /// Marks the given purchase order as cancelled. Used by the cancellation flow, not the sync run.
    async fn mark_cancelled(&self, purchase_order_number: &str) -> Result<(), SyncDatabaseError>;

    /// Returns the known SellerCloud order ids, either for the given purchase order numbers, or for every
    /// synced order when `None`.
    async fn remote_order_ids(&self, purchase_order_numbers: Option<&[String]>)
        -> Result<Vec<i64>, SyncDatabaseError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), SyncDatabaseError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum SyncDatabaseError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} is not write-back-eligible: it has no SellerCloud order id")]
    MissingRemoteId(String),
    #[error("Order {0} has no computed amounts to write back")]
    MissingAmounts(String),
}

impl From<sqlx::Error> for SyncDatabaseError {
    fn from(e: sqlx::Error) -> Self {
        SyncDatabaseError::DatabaseError(e.to_string())
    }
}
