//! `SqliteDatabase` is the concrete [`SyncDatabase`] implementation backing the sync engine.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, orders, shipping};
use crate::{
    db_types::{PurchaseOrder, ShippingCostTable, UnsyncedOrders},
    traits::{SyncDatabase, SyncDatabaseError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using `OSYNC_DATABASE_URL` or the default location.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date.
    pub async fn run_migrations(&self) -> Result<(), SyncDatabaseError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| SyncDatabaseError::DatabaseError(e.to_string()))?;
        info!("🗃️ Migrations complete");
        Ok(())
    }
}

impl SyncDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn load_unsynced_orders(&self) -> Result<UnsyncedOrders, SyncDatabaseError> {
        let mut conn = self.pool.acquire().await.map_err(SyncDatabaseError::from)?;
        orders::fetch_unsynced_orders(&mut conn).await
    }

    async fn shipping_cost_table(&self) -> Result<ShippingCostTable, SyncDatabaseError> {
        let mut conn = self.pool.acquire().await.map_err(SyncDatabaseError::from)?;
        shipping::fetch_shipping_costs(&mut conn).await
    }

    async fn write_back(&self, orders: &[PurchaseOrder]) -> Result<(), SyncDatabaseError> {
        let mut tx = self.pool.begin().await.map_err(SyncDatabaseError::from)?;
        for order in orders {
            orders::write_back_order(order, &mut tx).await?;
        }
        tx.commit().await.map_err(SyncDatabaseError::from)?;
        debug!("🗃️ {} order(s) marked as synced", orders.len());
        Ok(())
    }

    async fn mark_cancelled(&self, purchase_order_number: &str) -> Result<(), SyncDatabaseError> {
        let mut conn = self.pool.acquire().await.map_err(SyncDatabaseError::from)?;
        let known = orders::mark_cancelled(purchase_order_number, &mut conn).await?;
        if !known {
            warn!("🗃️ Asked to cancel unknown purchase order {purchase_order_number}");
        }
        Ok(())
    }

    async fn remote_order_ids(
        &self,
        purchase_order_numbers: Option<&[String]>,
    ) -> Result<Vec<i64>, SyncDatabaseError> {
        let mut conn = self.pool.acquire().await.map_err(SyncDatabaseError::from)?;
        orders::fetch_remote_order_ids(purchase_order_numbers, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), SyncDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}
