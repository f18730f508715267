use osync_common::Money;
use serde::{Deserialize, Serialize};

/// Outcome of an order-creation call, after response classification.
///
/// SellerCloud reports "this source order id was already used" as an HTTP 500 whose body contains the phrase
/// "already exists". That case is a first-class outcome here, not an error: the caller resolves the remote id
/// through a source-order-id lookup instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOrderOutcome {
    /// The order was created; carries the numeric SellerCloud order id.
    Created(i64),
    /// An order with the same source order id already exists remotely.
    AlreadyExists,
}

//--------------------------------------   Order submission   --------------------------------------------------------

/// The order-creation request body, as SellerCloud expects it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderSubmission {
    pub customer_details: CustomerDetails,
    pub order_details: OrderDetails,
    pub products: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub shipping_method_details: ShippingMethodDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerDetails {
    #[serde(rename = "ID")]
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub business: String,
    pub is_wholesale: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderDetails {
    #[serde(rename = "CompanyID")]
    pub company_id: i64,
    pub tax_exempt: bool,
    pub channel: i64,
    #[serde(rename = "OrderSourceOrderID")]
    pub order_source_order_id: String,
    /// Formatted as `%Y-%m-%d %H:%M:%S`
    pub order_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderLine {
    #[serde(rename = "ProductID")]
    pub product_id: String,
    pub qty: i64,
    /// The wholesale discount rate, e.g. 0.10 for 10% off.
    pub discount_value: f64,
    /// 1 = percentage off.
    pub discount_type: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShippingMethodDetails {
    pub shipping_method: String,
    pub carrier: String,
    pub shipping_fee: Money,
    pub allow_shipping_even_not_paid: bool,
}

//--------------------------------------   API responses   -----------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    #[serde(rename = "Items")]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "ID")]
    pub sku: String,
    #[serde(rename = "WholeSalePrice")]
    pub wholesale_price: Option<Money>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
    #[serde(rename = "Items")]
    pub items: Vec<RemoteOrderRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrderRef {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "OrderSourceOrderID")]
    pub source_order_id: String,
}

/// A wholesale customer, as returned by `Customers/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "General")]
    pub general: CustomerGeneral,
    #[serde(rename = "OrderOptions")]
    pub order_options: CustomerOrderOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerGeneral {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerOrderOptions {
    #[serde(rename = "WholesaleDiscount")]
    pub wholesale_discount: f64,
}

impl CustomerRecord {
    pub fn name(&self) -> &str {
        &self.general.name
    }

    pub fn email(&self) -> &str {
        &self.general.email
    }

    pub fn wholesale_discount(&self) -> f64 {
        self.order_options.wholesale_discount
    }
}
