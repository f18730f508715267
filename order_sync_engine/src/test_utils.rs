//! Shared fixtures for the engine's unit tests: canned orders and customers, an in-memory database, and a
//! scriptable stand-in for the SellerCloud API.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::{TimeZone, Utc};
use osync_common::Money;
use sellercloud_tools::{
    CatalogItem,
    CreateOrderOutcome,
    CustomerGeneral,
    CustomerOrderOptions,
    CustomerRecord,
    OrderSubmission,
    RemoteOrderRef,
    SellerCloudApiError,
};

use crate::{
    db_types::{OrderItem, PurchaseOrder},
    traits::{Notifier, RemoteOrderApi},
    SqliteDatabase,
};

pub fn sample_order(po: &str, code: &str) -> PurchaseOrder {
    PurchaseOrder {
        id: 1,
        purchase_order_number: po.to_string(),
        remote_customer_id: 501,
        dropshipper_code: code.to_string(),
        date_added: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        customer_first_name: "Jo".to_string(),
        customer_last_name: "Soap".to_string(),
        phone: "555-0100".to_string(),
        address: "12 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "Illinois".to_string(),
        zip: "62701".to_string(),
        country: "United States".to_string(),
        tax_exempt: false,
        ships_with_company_account: true,
        ship_method: "UPS Ground".to_string(),
        items: vec![OrderItem { sku: "X1".to_string(), quantity: 2 }],
        order_amounts: None,
        sellercloud_order_id: None,
    }
}

pub fn sample_customer(name: &str, discount: f64) -> CustomerRecord {
    CustomerRecord {
        general: CustomerGeneral { name: name.to_string(), email: "orders@acme.example".to_string() },
        order_options: CustomerOrderOptions { wholesale_discount: discount },
    }
}

//--------------------------------------    MockRemoteApi    ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum ScriptedOutcome {
    Created(i64),
    Duplicate,
    Reject(String),
}

#[derive(Debug, Default)]
struct MockState {
    catalog: HashMap<String, Option<Money>>,
    catalog_fails: bool,
    customers: HashMap<i64, CustomerRecord>,
    submissions: HashMap<String, ScriptedOutcome>,
    remote_orders: HashMap<String, i64>,
    catalog_batch_sizes: Vec<usize>,
    order_lookup_sizes: Vec<usize>,
    submitted_reference_ids: Vec<String>,
}

/// A scriptable [`RemoteOrderApi`]: responses are keyed by sku, customer id or reference id, and every call's
/// request shape is recorded for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockRemoteApi {
    state: Arc<Mutex<MockState>>,
}

impl MockRemoteApi {
    pub fn with_catalog(self, entries: impl IntoIterator<Item = (String, Option<Money>)>) -> Self {
        self.state.lock().unwrap().catalog.extend(entries);
        self
    }

    pub fn fail_catalog(self) -> Self {
        self.state.lock().unwrap().catalog_fails = true;
        self
    }

    pub fn with_customer(self, id: i64, name: &str, email: &str, discount: f64) -> Self {
        let customer = CustomerRecord {
            general: CustomerGeneral { name: name.to_string(), email: email.to_string() },
            order_options: CustomerOrderOptions { wholesale_discount: discount },
        };
        self.state.lock().unwrap().customers.insert(id, customer);
        self
    }

    pub fn with_created_id(self, reference_id: &str, remote_id: i64) -> Self {
        self.state.lock().unwrap().submissions.insert(reference_id.to_string(), ScriptedOutcome::Created(remote_id));
        self
    }

    pub fn with_duplicate(self, reference_id: &str) -> Self {
        self.state.lock().unwrap().submissions.insert(reference_id.to_string(), ScriptedOutcome::Duplicate);
        self
    }

    pub fn with_rejection(self, reference_id: &str, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .submissions
            .insert(reference_id.to_string(), ScriptedOutcome::Reject(message.to_string()));
        self
    }

    pub fn with_remote_orders(self, entries: impl IntoIterator<Item = (String, i64)>) -> Self {
        self.state.lock().unwrap().remote_orders.extend(entries);
        self
    }

    pub fn catalog_batch_sizes(&self) -> Vec<usize> {
        self.state.lock().unwrap().catalog_batch_sizes.clone()
    }

    pub fn order_lookup_sizes(&self) -> Vec<usize> {
        self.state.lock().unwrap().order_lookup_sizes.clone()
    }

    pub fn submitted_reference_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().submitted_reference_ids.clone()
    }
}

impl RemoteOrderApi for MockRemoteApi {
    async fn submit_order(&self, order: &OrderSubmission) -> Result<CreateOrderOutcome, SellerCloudApiError> {
        let reference_id = order.order_details.order_source_order_id.clone();
        let mut state = self.state.lock().unwrap();
        state.submitted_reference_ids.push(reference_id.clone());
        match state.submissions.get(&reference_id) {
            Some(ScriptedOutcome::Created(id)) => Ok(CreateOrderOutcome::Created(*id)),
            Some(ScriptedOutcome::Duplicate) => Ok(CreateOrderOutcome::AlreadyExists),
            Some(ScriptedOutcome::Reject(message)) => {
                Err(SellerCloudApiError::QueryError { status: 400, message: message.clone() })
            },
            None => Err(SellerCloudApiError::QueryError {
                status: 500,
                message: format!("no scripted response for {reference_id}"),
            }),
        }
    }

    async fn customer_by_id(&self, customer_id: i64) -> Result<CustomerRecord, SellerCloudApiError> {
        self.state.lock().unwrap().customers.get(&customer_id).cloned().ok_or(SellerCloudApiError::QueryError {
            status: 404,
            message: format!("no such customer {customer_id}"),
        })
    }

    async fn catalog_by_skus(&self, skus: &[String]) -> Result<Vec<CatalogItem>, SellerCloudApiError> {
        let mut state = self.state.lock().unwrap();
        state.catalog_batch_sizes.push(skus.len());
        if state.catalog_fails {
            return Err(SellerCloudApiError::QueryError { status: 503, message: "catalog unavailable".to_string() });
        }
        let items = skus
            .iter()
            .filter_map(|sku| {
                state
                    .catalog
                    .get(sku)
                    .map(|price| CatalogItem { sku: sku.clone(), wholesale_price: *price })
            })
            .collect();
        Ok(items)
    }

    async fn orders_by_source_ids(&self, source_ids: &[String]) -> Result<Vec<RemoteOrderRef>, SellerCloudApiError> {
        let mut state = self.state.lock().unwrap();
        state.order_lookup_sizes.push(source_ids.len());
        let items = source_ids
            .iter()
            .filter_map(|source_id| {
                state
                    .remote_orders
                    .get(source_id)
                    .map(|id| RemoteOrderRef { id: *id, source_order_id: source_id.clone() })
            })
            .collect();
        Ok(items)
    }
}

//--------------------------------------   RecordingNotifier  --------------------------------------------------------

/// Captures every (subject, body) pair sent during a test.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, body: &str) {
        self.messages.lock().unwrap().push((subject.to_string(), body.to_string()));
    }
}

//--------------------------------------   Database fixtures  --------------------------------------------------------

/// A fresh in-memory database with the full schema. One connection only, since every `sqlite::memory:`
/// connection is its own database.
pub async fn memory_db() -> SqliteDatabase {
    let db = SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Error creating in-memory database");
    db.run_migrations().await.expect("Error running DB migrations");
    db
}

/// Inserts one unsynced purchase order matching [`sample_order`], with one line of 2 x "X1".
pub async fn seed_purchase_order(db: &SqliteDatabase, po: &str, code: &str) {
    let order = sample_order(po, code);
    let id: i64 = sqlx::query_scalar(
        r#"INSERT INTO purchase_orders (
          purchase_order_number, sellercloud_customer_id, dropshipper_code, date_added,
          customer_first_name, customer_last_name, phone, address, city, state, zip, country,
          is_exempt, ships_with_company_account, ship_method
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING id"#,
    )
    .bind(&order.purchase_order_number)
    .bind(order.remote_customer_id)
    .bind(&order.dropshipper_code)
    .bind(order.date_added)
    .bind(&order.customer_first_name)
    .bind(&order.customer_last_name)
    .bind(&order.phone)
    .bind(&order.address)
    .bind(&order.city)
    .bind(&order.state)
    .bind(&order.zip)
    .bind(&order.country)
    .bind(order.tax_exempt)
    .bind(order.ships_with_company_account)
    .bind(&order.ship_method)
    .fetch_one(db.pool())
    .await
    .expect("Error seeding purchase order");
    for item in &order.items {
        sqlx::query("INSERT INTO purchase_order_items (purchase_order_id, sku, quantity) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&item.sku)
            .bind(item.quantity)
            .execute(db.pool())
            .await
            .expect("Error seeding order item");
    }
}

pub async fn seed_shipping_cost(db: &SqliteDatabase, sku: &str, cost: Money) {
    sqlx::query("INSERT INTO part_shipping_costs (sku, shipping_cost) VALUES ($1, $2)")
        .bind(sku)
        .bind(cost)
        .execute(db.pool())
        .await
        .expect("Error seeding shipping cost");
}

/// The sync write-back state of one order: (in_sellercloud, sellercloud_order_id, shipping_cost).
pub async fn synced_state(db: &SqliteDatabase, po: &str) -> (bool, Option<i64>, Option<Money>) {
    sqlx::query_as(
        "SELECT in_sellercloud, sellercloud_order_id, shipping_cost FROM purchase_orders \
         WHERE purchase_order_number = $1",
    )
    .bind(po)
    .fetch_one(db.pool())
    .await
    .expect("Error reading sync state")
}
