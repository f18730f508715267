use sellercloud_tools::{
    CatalogItem,
    CreateOrderOutcome,
    CustomerRecord,
    OrderSubmission,
    RemoteOrderRef,
    SellerCloudApi,
    SellerCloudApiError,
};

/// The slice of the SellerCloud API the sync pipeline consumes. The concrete client lives in
/// `sellercloud_tools`; this seam keeps the pipeline testable without HTTP.
#[allow(async_fn_in_trait)]
pub trait RemoteOrderApi {
    /// Submits an order for creation. The response is pre-classified: creation, duplicate, or error.
    async fn submit_order(&self, order: &OrderSubmission) -> Result<CreateOrderOutcome, SellerCloudApiError>;

    async fn customer_by_id(&self, customer_id: i64) -> Result<CustomerRecord, SellerCloudApiError>;

    /// Catalog lookup for at most one page worth of skus. Skus the remote does not know are absent from the
    /// result.
    async fn catalog_by_skus(&self, skus: &[String]) -> Result<Vec<CatalogItem>, SellerCloudApiError>;

    /// Order lookup by source order id, at most one page worth of ids. The result may be a strict subset of
    /// the request.
    async fn orders_by_source_ids(&self, source_ids: &[String]) -> Result<Vec<RemoteOrderRef>, SellerCloudApiError>;
}

impl RemoteOrderApi for SellerCloudApi {
    async fn submit_order(&self, order: &OrderSubmission) -> Result<CreateOrderOutcome, SellerCloudApiError> {
        self.create_order(order).await
    }

    async fn customer_by_id(&self, customer_id: i64) -> Result<CustomerRecord, SellerCloudApiError> {
        SellerCloudApi::customer_by_id(self, customer_id).await
    }

    async fn catalog_by_skus(&self, skus: &[String]) -> Result<Vec<CatalogItem>, SellerCloudApiError> {
        SellerCloudApi::catalog_by_skus(self, skus).await
    }

    async fn orders_by_source_ids(&self, source_ids: &[String]) -> Result<Vec<RemoteOrderRef>, SellerCloudApiError> {
        SellerCloudApi::orders_by_source_ids(self, source_ids).await
    }
}
