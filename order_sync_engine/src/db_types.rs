use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use osync_common::Money;
use serde::Serialize;
use sqlx::FromRow;

/// Wholesale price per sku, for every sku appearing in the current run's candidate orders.
/// Built once per run; a sku absent from the index is treated as not sellable for the rest of the run.
pub type SkuPriceIndex = HashMap<String, Money>;

/// Per-unit shipping cost keyed by sku (and sku alias). Loaded once per run, read-only.
pub type ShippingCostTable = HashMap<String, Money>;

//--------------------------------------    PurchaseOrder    ---------------------------------------------------------
/// A purchase order as loaded from the local store, in its "not yet synced" state.
///
/// `order_amounts` and `sellercloud_order_id` start out empty and are attached in-memory as the order moves
/// through the pipeline. An order is write-back-eligible if and only if it carries a `sellercloud_order_id`.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrder {
    pub id: i64,
    pub purchase_order_number: String,
    /// The SellerCloud customer id of the dropshipper this order belongs to.
    pub remote_customer_id: i64,
    pub dropshipper_code: String,
    pub date_added: DateTime<Utc>,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub tax_exempt: bool,
    pub ships_with_company_account: bool,
    pub ship_method: String,
    pub items: Vec<OrderItem>,
    pub order_amounts: Option<OrderAmounts>,
    pub sellercloud_order_id: Option<i64>,
}

impl PurchaseOrder {
    /// The canonical order reference id used to detect duplicates remotely: the purchase order number, prefixed
    /// with the dropshipper code unless it already is. Stable and idempotent across runs.
    pub fn reference_id(&self) -> String {
        if self.purchase_order_number.starts_with(&self.dropshipper_code) {
            self.purchase_order_number.clone()
        } else {
            format!("{}{}", self.dropshipper_code, self.purchase_order_number)
        }
    }
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub sku: String,
    pub quantity: i64,
}

/// An order item that passed sku validation, carrying the wholesale unit price from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedItem {
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,
}

//--------------------------------------     OrderAmounts    ---------------------------------------------------------
/// Derived amounts for one order: the rounded shipping total and the per-sku unit-price breakdown.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderAmounts {
    pub shipping_total: Money,
    pub sku_prices: HashMap<String, Money>,
}

//--------------------------------------    UnsyncedOrders   ---------------------------------------------------------
/// The load result for one run: candidate orders grouped by SellerCloud customer id, plus the sku universe
/// (every sku appearing in any candidate order) used to build the [`SkuPriceIndex`] with as few catalog calls
/// as possible.
#[derive(Debug, Clone, Default)]
pub struct UnsyncedOrders {
    pub by_customer: BTreeMap<i64, Vec<PurchaseOrder>>,
    pub sku_universe: HashSet<String>,
}

impl UnsyncedOrders {
    pub fn is_empty(&self) -> bool {
        self.by_customer.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.by_customer.values().map(Vec::len).sum()
    }
}

//--------------------------------------    Database rows    ---------------------------------------------------------
/// One row of the unsynced-orders query, before items are attached.
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseOrderRow {
    pub id: i64,
    pub purchase_order_number: String,
    pub sellercloud_customer_id: i64,
    pub dropshipper_code: String,
    pub date_added: DateTime<Utc>,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub is_exempt: bool,
    pub ships_with_company_account: bool,
    pub ship_method: String,
}

impl PurchaseOrderRow {
    pub fn into_order(self, items: Vec<OrderItem>) -> PurchaseOrder {
        PurchaseOrder {
            id: self.id,
            purchase_order_number: self.purchase_order_number,
            remote_customer_id: self.sellercloud_customer_id,
            dropshipper_code: self.dropshipper_code,
            date_added: self.date_added,
            customer_first_name: self.customer_first_name,
            customer_last_name: self.customer_last_name,
            phone: self.phone,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            country: self.country,
            tax_exempt: self.is_exempt,
            ships_with_company_account: self.ships_with_company_account,
            ship_method: self.ship_method,
            items,
            order_amounts: None,
            sellercloud_order_id: None,
        }
    }
}
