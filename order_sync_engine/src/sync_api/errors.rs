use std::fmt::Write;

use sellercloud_tools::SellerCloudApiError;
use thiserror::Error;

use crate::traits::SyncDatabaseError;

/// Fatal, run-aborting errors. Per-order failures never surface here; they are [`BuildFailure`] values handled
/// in-flow with a notification.
#[derive(Debug, Error)]
pub enum OrderSyncError {
    #[error("Database error: {0}")]
    Database(#[from] SyncDatabaseError),
    #[error("Could not resolve the sku catalog, no orders can be validated: {0}")]
    SkuResolution(SellerCloudApiError),
    #[error("Could not fetch customer {customer_id} from SellerCloud: {source}")]
    CustomerLookup {
        customer_id: i64,
        source: SellerCloudApiError,
    },
}

/// Why an order could not be turned into a SellerCloud submission. The order is skipped for this run (it
/// remains eligible for a future run) and a notification describing the failure is sent.
#[derive(Debug, Clone, Error)]
pub enum BuildFailure {
    #[error("Order {} has items that are not sellable in SellerCloud", .0.purchase_order_number)]
    InvalidSkus(MissingPartsReport),
    #[error("No shipping cost on file for sku {sku} (order {purchase_order_number})")]
    MissingShippingCost {
        purchase_order_number: String,
        sku: String,
    },
    #[error("Ship method '{ship_method}' has no carrier mapping (order {purchase_order_number})")]
    UnmappedShipMethod {
        purchase_order_number: String,
        ship_method: String,
    },
}

impl BuildFailure {
    /// The notification subject and body for this failure.
    pub fn notification(&self) -> (String, String) {
        match self {
            BuildFailure::InvalidSkus(report) => (report.subject(), report.body()),
            BuildFailure::MissingShippingCost { purchase_order_number, sku } => (
                "Error Calculating Shipping".to_string(),
                format!(
                    "There was an error calculating shipping for order {purchase_order_number}: sku {sku} was not \
                     found in the shipping cost table."
                ),
            ),
            BuildFailure::UnmappedShipMethod { purchase_order_number, ship_method } => (
                "Unmapped shipping method".to_string(),
                format!(
                    "Order {purchase_order_number} requests shipping method '{ship_method}', which has no \
                     carrier mapping. The order was skipped."
                ),
            ),
        }
    }
}

//--------------------------------------  MissingPartsReport  --------------------------------------------------------
/// The invalid skus of one order: unknown skus and skus known to SellerCloud but carrying no positive
/// wholesale price.
#[derive(Debug, Clone)]
pub struct MissingPartsReport {
    pub purchase_order_number: String,
    pub dropshipper_name: String,
    pub parts: Vec<MissingPart>,
}

#[derive(Debug, Clone)]
pub struct MissingPart {
    pub sku: String,
    pub quantity: i64,
    /// True when the sku exists in the catalog but its wholesale price is missing or non-positive.
    pub known_but_unpriced: bool,
}

impl MissingPartsReport {
    pub fn subject(&self) -> String {
        format!("Missing parts for order {}", self.purchase_order_number)
    }

    pub fn body(&self) -> String {
        let mut body = format!(
            "The following parts for order {} from {} are not sellable in SellerCloud:\n\n",
            self.purchase_order_number, self.dropshipper_name
        );
        for part in &self.parts {
            let _ = writeln!(body, "{} - {} units", part.sku, part.quantity);
        }
        if self.parts.iter().any(|p| p.known_but_unpriced) {
            body.push_str(
                "\nAt least one of these skus exists in SellerCloud but has no positive wholesale price.\n",
            );
        }
        body
    }
}
