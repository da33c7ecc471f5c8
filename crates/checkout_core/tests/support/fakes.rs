use std::sync::{Arc, Mutex};
use std::time::Duration;

use checkout_core::collaborators::{ContactSubmitter, LocalityLookup, ProductCatalog};
use checkout_core::error::TransportError;
use checkout_core::models::{ContactRecord, Locality, Product};
use serde_json::{json, Value};

/// Locality lookup that records every postal code it is asked for.
#[derive(Clone)]
pub struct RecordingLookup {
    calls: Arc<Mutex<Vec<String>>>,
    response: Arc<Mutex<Result<Option<Locality>, TransportError>>>,
}

impl Default for RecordingLookup {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            response: Arc::new(Mutex::new(Ok(None))),
        }
    }
}

impl RecordingLookup {
    pub fn resolving(locality: Locality) -> Self {
        let lookup = Self::default();
        lookup.respond_with(Ok(Some(locality)));
        lookup
    }

    pub fn respond_with(&self, response: Result<Option<Locality>, TransportError>) {
        *self.response.lock().expect("response lock") = response;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl LocalityLookup for RecordingLookup {
    async fn fetch_localities(&self, postal_code: &str) -> Result<Option<Locality>, TransportError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(postal_code.to_string());
        self.response.lock().expect("response lock").clone()
    }
}

/// Lookup that panics on its first call and answers normally afterwards.
#[derive(Clone)]
pub struct PanickingLookup {
    calls: Arc<Mutex<usize>>,
    locality: Locality,
}

impl PanickingLookup {
    pub fn then_resolving(locality: Locality) -> Self {
        Self {
            calls: Arc::default(),
            locality,
        }
    }
}

impl LocalityLookup for PanickingLookup {
    async fn fetch_localities(&self, postal_code: &str) -> Result<Option<Locality>, TransportError> {
        let call = {
            let mut calls = self.calls.lock().expect("calls lock");
            *calls += 1;
            *calls
        };
        if call == 1 {
            panic!("lookup backend crashed for {postal_code}");
        }
        Ok(Some(self.locality.clone()))
    }
}

/// Lookup whose answer depends on the postal code, for out-of-order tests.
#[derive(Clone, Default)]
pub struct ScriptedLookup {
    script: Arc<Vec<(String, Duration, Locality)>>,
}

impl ScriptedLookup {
    pub fn new(script: Vec<(&str, Duration, Locality)>) -> Self {
        Self {
            script: Arc::new(
                script
                    .into_iter()
                    .map(|(code, latency, locality)| (code.to_string(), latency, locality))
                    .collect(),
            ),
        }
    }
}

impl LocalityLookup for ScriptedLookup {
    async fn fetch_localities(&self, postal_code: &str) -> Result<Option<Locality>, TransportError> {
        let entry = self
            .script
            .iter()
            .find(|(code, _, _)| code == postal_code)
            .cloned();
        match entry {
            Some((_, latency, locality)) => {
                tokio::time::sleep(latency).await;
                Ok(Some(locality))
            }
            None => Ok(None),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingSubmitter {
    submissions: Arc<Mutex<Vec<ContactRecord>>>,
    failure: Arc<Mutex<Option<TransportError>>>,
}

impl RecordingSubmitter {
    pub fn failing(error: TransportError) -> Self {
        let submitter = Self::default();
        *submitter.failure.lock().expect("failure lock") = Some(error);
        submitter
    }

    pub fn submissions(&self) -> Vec<ContactRecord> {
        self.submissions.lock().expect("submissions lock").clone()
    }
}

impl ContactSubmitter for RecordingSubmitter {
    async fn submit_contact(&self, payload: &ContactRecord) -> Result<Value, TransportError> {
        self.submissions
            .lock()
            .expect("submissions lock")
            .push(payload.clone());
        let failure = self.failure.lock().expect("failure lock").clone();
        match failure {
            Some(error) => Err(error),
            None => Ok(json!({ "ok": true })),
        }
    }
}

pub struct StaticCatalog {
    pub products: Result<Vec<Product>, TransportError>,
}

impl ProductCatalog for StaticCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, TransportError> {
        self.products.clone()
    }
}

pub fn locality(city: &str) -> Locality {
    Locality {
        city: city.to_string(),
        town: format!("{city} town"),
        state: format!("{city} state"),
        colonies: vec![format!("{city} centro"), format!("{city} norte")],
    }
}

pub fn product(name: &str, price: &str) -> Product {
    Product {
        name: name.to_string(),
        price: price.to_string(),
        image: format!("https://img.test/{name}.png"),
    }
}
