//! A typed REST client for the SellerCloud order-management API.
//!
//! Covers the operations the order-sync engine consumes: order creation, customer lookup, catalog lookup by sku
//! list, order lookup by source-order-id list, and order deletion (used by the cancellation flow). Authentication
//! is a bearer token fetched lazily from the `/token` endpoint and cached for the lifetime of the client.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::{SellerCloudApi, DEFAULT_PAGE_SIZE};
pub use config::SellerCloudConfig;
pub use data_objects::{
    CatalogItem,
    CatalogPage,
    CreateOrderOutcome,
    CustomerDetails,
    CustomerGeneral,
    CustomerOrderOptions,
    CustomerRecord,
    OrderDetails,
    OrderLine,
    OrderSubmission,
    OrdersPage,
    RemoteOrderRef,
    ShippingAddress,
    ShippingMethodDetails,
};
pub use error::SellerCloudApiError;
