use std::time::Instant;

use checkout_core::collaborators::{ContactSubmitter, LocalityLookup, ProductCatalog};
use checkout_core::config::{ApiConfig, CONTACT_PATH, POSTAL_CODES_PATH, PRODUCTS_PATH};
use checkout_core::error::TransportError;
use checkout_core::models::{ContactRecord, Locality, Product};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::{info, warn};

use super::error::ApiError;
use super::response::{error_message, parse_locality, parse_products};

/// Thin JSON client for the checkout backend.
#[derive(Debug, Clone)]
pub struct CheckoutApiClient {
    client: Client,
    config: ApiConfig,
}

impl CheckoutApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn products_url(&self) -> Result<Url, ApiError> {
        self.url(PRODUCTS_PATH)
    }

    pub fn contact_url(&self) -> Result<Url, ApiError> {
        self.url(CONTACT_PATH)
    }

    /// `/postalCodes/{code}`, with the code percent-encoded as one segment.
    pub fn postal_code_url(&self, postal_code: &str) -> Result<Url, ApiError> {
        let mut url = self.url(POSTAL_CODES_PATH)?;
        let url_text = url.to_string();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{url_text} cannot take path segments")))?
            .push(postal_code.trim());
        Ok(url)
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let endpoint = self.config.endpoint(path);
        Url::parse(&endpoint).map_err(|err| ApiError::Url(format!("{endpoint}: {err}")))
    }

    /// Send one JSON request. GET requests carry no body.
    async fn fetch_json(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let started = Instant::now();
        let label = url.path().to_string();
        let result = self.send(method, url, body).await;
        let elapsed_secs = started.elapsed().as_secs_f64();

        match &result {
            Ok(_) => info!(url = %label, elapsed_secs, "fetch ok"),
            Err(err) => warn!(url = %label, elapsed_secs, error = %err, "fetch failed"),
        }
        result
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value, ApiError> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if method != Method::GET {
            if let Some(body) = body {
                request = request.json(body);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let bytes = response.bytes().await.map_err(ApiError::Json)?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl LocalityLookup for CheckoutApiClient {
    async fn fetch_localities(&self, postal_code: &str) -> Result<Option<Locality>, TransportError> {
        let url = self.postal_code_url(postal_code)?;
        let body = self.fetch_json(Method::GET, url, None).await?;
        Ok(parse_locality(body)?)
    }
}

impl ProductCatalog for CheckoutApiClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, TransportError> {
        let url = self.products_url()?;
        let body = self.fetch_json(Method::GET, url, None).await?;
        Ok(parse_products(body)?)
    }
}

impl ContactSubmitter for CheckoutApiClient {
    async fn submit_contact(&self, payload: &ContactRecord) -> Result<Value, TransportError> {
        let url = self.contact_url()?;
        let body = serde_json::to_value(payload).map_err(ApiError::from)?;
        Ok(self.fetch_json(Method::POST, url, Some(&body)).await?)
    }
}
