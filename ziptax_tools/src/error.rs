use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZipTaxError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the zip-tax API: {0}")]
    Connection(String),
    #[error("Invalid zip-tax response: {0}")]
    Response(String),
    #[error("The zip-tax API returned no results for postal code {0}")]
    NoResults(String),
}
