//! A minimal client for the zip-tax.com sales-tax-rate API.
//!
//! This feeds a reporting concern, not the order-sync hot path. Connection-level failures are retried up to
//! [`MAX_ATTEMPTS`] times with a [`REQUEST_TIMEOUT`] per attempt; any other failure is surfaced immediately.
mod api;
mod error;

pub use api::{ZipTaxApi, MAX_ATTEMPTS, REQUEST_TIMEOUT};
pub use error::ZipTaxError;
