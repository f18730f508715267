//! Order Sync Engine
//!
//! Reconciles purchase orders held in the local store with SellerCloud: orders not yet present remotely are
//! created there, and the remote order id plus the computed shipping cost are written back once confirmed.
//!
//! The library is divided into three main sections:
//! 1. Database management ([`mod@sqlite`]). The [`traits::SyncDatabase`] trait describes what the engine needs
//!    from the local store; [`SqliteDatabase`] is the provided implementation.
//! 2. The reconciliation pipeline ([`mod@sync_api`]): sku catalog resolution, pricing and shipping calculation,
//!    payload building, batched submission with duplicate resolution, and the top-level driver.
//! 3. The external seams ([`mod@traits`]): the database, the remote order API, and the notification channel are
//!    all traits, so every per-order failure is a typed value and notification policy stays out of the business
//!    logic.
pub mod db_types;
pub mod sqlite;
pub mod sync_api;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_utils;

pub use sqlite::SqliteDatabase;
pub use sync_api::{
    driver::{ReconciliationDriver, RunSummary},
    errors::{BuildFailure, OrderSyncError},
};
