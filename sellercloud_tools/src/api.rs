use std::sync::Arc;

use log::*;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    config::SellerCloudConfig,
    data_objects::{CatalogItem, CatalogPage, CreateOrderOutcome, CustomerRecord, OrdersPage, RemoteOrderRef},
    OrderSubmission,
    SellerCloudApiError,
};

/// The maximum number of items SellerCloud returns (and accepts) per list query.
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Clone)]
pub struct SellerCloudApi {
    config: SellerCloudConfig,
    client: Arc<Client>,
    token: Arc<RwLock<Option<String>>>,
}

impl SellerCloudApi {
    pub fn new(config: SellerCloudConfig) -> Result<Self, SellerCloudApiError> {
        let client = Client::builder().build().map_err(|e| SellerCloudApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), token: Arc::new(RwLock::new(None)) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url)
    }

    /// Returns the cached bearer token, fetching one from the `/token` endpoint on first use.
    async fn access_token(&self) -> Result<String, SellerCloudApiError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            #[serde(rename = "Username")]
            username: &'a str,
            #[serde(rename = "Password")]
            password: &'a str,
        }
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }
        let body =
            TokenRequest { username: &self.config.username, password: self.config.password.reveal().as_str() };
        debug!("🔑️ Fetching SellerCloud access token");
        let response = self
            .client
            .post(self.url("token"))
            .json(&body)
            .send()
            .await
            .map_err(|e| SellerCloudApiError::Authentication(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SellerCloudApiError::Authentication(format!("Token request failed with {status}. {message}")));
        }
        let token =
            response.json::<TokenResponse>().await.map_err(|e| SellerCloudApiError::JsonError(e.to_string()))?;
        info!("🔑️ Got SellerCloud API access token");
        self.token.write().await.replace(token.access_token.clone());
        Ok(token.access_token)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, SellerCloudApiError> {
        let token = self.access_token().await?;
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url).bearer_auth(token);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| SellerCloudApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| SellerCloudApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| SellerCloudApiError::RestResponseError(e.to_string()))?;
            Err(SellerCloudApiError::QueryError { status, message })
        }
    }

    /// Submits an order for creation, classifying the response as created, already-existing, or failed.
    pub async fn create_order(&self, order: &OrderSubmission) -> Result<CreateOrderOutcome, SellerCloudApiError> {
        let token = self.access_token().await?;
        debug!("📦️ Creating order {}", order.order_details.order_source_order_id);
        let response = self
            .client
            .post(self.url("orders"))
            .bearer_auth(token)
            .json(order)
            .send()
            .await
            .map_err(|e| SellerCloudApiError::RestResponseError(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| SellerCloudApiError::RestResponseError(e.to_string()))?;
        classify_create_response(status, &body)
    }

    pub async fn customer_by_id(&self, customer_id: i64) -> Result<CustomerRecord, SellerCloudApiError> {
        let path = format!("Customers/{customer_id}");
        debug!("Fetching customer #{customer_id}");
        let customer = self.rest_query::<CustomerRecord, ()>(Method::GET, &path, &[], None).await?;
        info!("Fetched customer #{customer_id} ({})", customer.name());
        Ok(customer)
    }

    /// Looks up catalog entries for the given skus (at most [`DEFAULT_PAGE_SIZE`] per call).
    /// Skus not present in the catalog are simply absent from the result.
    pub async fn catalog_by_skus(&self, skus: &[String]) -> Result<Vec<CatalogItem>, SellerCloudApiError> {
        let sku_list = skus.join(", ");
        let page_size = DEFAULT_PAGE_SIZE.to_string();
        let params = [("model.sKU", sku_list.as_str()), ("model.pageSize", page_size.as_str())];
        let page = self.rest_query::<CatalogPage, ()>(Method::GET, "Catalog", &params, None).await?;
        debug!("Catalog lookup returned {} of {} requested skus", page.items.len(), skus.len());
        Ok(page.items)
    }

    /// Looks up orders by their source order ids (at most [`DEFAULT_PAGE_SIZE`] per call).
    pub async fn orders_by_source_ids(&self, source_ids: &[String]) -> Result<Vec<RemoteOrderRef>, SellerCloudApiError> {
        let id_list = source_ids.join(", ");
        let page_size = DEFAULT_PAGE_SIZE.to_string();
        let params = [("model.orderSourceOrderIDList", id_list.as_str()), ("model.pageSize", page_size.as_str())];
        let page = self.rest_query::<OrdersPage, ()>(Method::GET, "Orders", &params, None).await?;
        debug!("Source-id lookup returned {} of {} requested orders", page.items.len(), source_ids.len());
        Ok(page.items)
    }

    pub async fn delete_order(&self, order_id: i64) -> Result<(), SellerCloudApiError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .delete(self.url(&format!("Orders/{order_id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SellerCloudApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            info!("🗑️ Deleted order #{order_id}");
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(SellerCloudApiError::QueryError { status, message })
        }
    }
}

/// Response classification for order creation: 200 carries the numeric order id in the body; a 500 whose body
/// mentions "already exists" is a duplicate; everything else is a hard failure.
fn classify_create_response(status: StatusCode, body: &str) -> Result<CreateOrderOutcome, SellerCloudApiError> {
    if status.is_success() {
        let id = body
            .trim()
            .parse::<i64>()
            .map_err(|e| SellerCloudApiError::JsonError(format!("Expected a numeric order id, got '{body}'. {e}")))?;
        return Ok(CreateOrderOutcome::Created(id));
    }
    if status == StatusCode::INTERNAL_SERVER_ERROR && body.contains("already exists") {
        return Ok(CreateOrderOutcome::AlreadyExists);
    }
    Err(SellerCloudApiError::QueryError { status: status.as_u16(), message: body.to_string() })
}
