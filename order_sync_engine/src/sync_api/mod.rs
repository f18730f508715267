//! The reconciliation pipeline.
//!
//! Data flow for one run: the driver loads candidates and the sku universe, [`catalog`] resolves wholesale
//! prices, then per customer group [`batch`] partitions orders into fixed-size batches and, per order, has
//! [`payload`] validate and assemble the submission with amounts from [`pricing`]. After each batch,
//! [`duplicates`] resolves the remote ids of orders SellerCloud reported as already existing, and the batch's
//! confirmed orders are written back in one bulk update.
pub mod batch;
pub mod catalog;
pub mod driver;
pub mod duplicates;
pub mod errors;
pub mod payload;
pub mod pricing;
