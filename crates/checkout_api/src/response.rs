use checkout_core::models::{Locality, Product};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::error::ApiError;

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Message for a non-success response: the body's `error` field when present,
/// otherwise the status reason.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

/// The lookup endpoint answers with a locality object, an empty object or
/// `null`. Only a locality naming a city counts as a hit.
pub(crate) fn parse_locality(body: Value) -> Result<Option<Locality>, ApiError> {
    if body.is_null() {
        return Ok(None);
    }
    let locality: Locality = serde_json::from_value(body)?;
    Ok(Some(locality).filter(Locality::is_resolved))
}

pub(crate) fn parse_products(body: Value) -> Result<Vec<Product>, ApiError> {
    if body.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(body)?)
}
