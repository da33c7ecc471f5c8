//! Backend capabilities consumed by the page flows.

use std::future::Future;

use serde_json::Value;

use crate::error::TransportError;
use crate::models::{ContactRecord, Locality, Product};

pub trait LocalityLookup: Send + Sync + 'static {
    /// Resolve a postal code. `Ok(None)` means the backend had no data for it.
    fn fetch_localities(
        &self,
        postal_code: &str,
    ) -> impl Future<Output = Result<Option<Locality>, TransportError>> + Send;
}

pub trait ProductCatalog: Send + Sync {
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, TransportError>> + Send;
}

pub trait ContactSubmitter: Send + Sync + 'static {
    /// Submit the contact. The success value is opaque to the caller.
    fn submit_contact(
        &self,
        payload: &ContactRecord,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}
