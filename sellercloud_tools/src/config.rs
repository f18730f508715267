use log::*;
use osync_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct SellerCloudConfig {
    /// e.g. "https://my-company.api.sellercloud.us/rest/api"
    pub base_url: String,
    pub username: String,
    pub password: Secret<String>,
}

impl SellerCloudConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("OSYNC_SC_BASE_URL").unwrap_or_else(|_| {
            warn!("OSYNC_SC_BASE_URL not set, using (probably useless) default");
            "https://example.api.sellercloud.us/rest/api".to_string()
        });
        let username = std::env::var("OSYNC_SC_USERNAME").unwrap_or_else(|_| {
            warn!("OSYNC_SC_USERNAME not set, using (probably useless) default");
            "api_user@example.com".to_string()
        });
        let password = Secret::new(std::env::var("OSYNC_SC_PASSWORD").unwrap_or_else(|_| {
            warn!("OSYNC_SC_PASSWORD not set, using (probably useless) default");
            "hunter2".to_string()
        }));
        Self { base_url: base_url.trim_end_matches('/').to_string(), username, password }
    }
}
