use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://blackisp.herokuapp.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_URL_ENV: &str = "CHECKOUT_API_URL";
pub const API_TIMEOUT_ENV: &str = "CHECKOUT_API_TIMEOUT_SECS";

pub const PRODUCTS_PATH: &str = "/products";
pub const CONTACT_PATH: &str = "/contact";
pub const POSTAL_CODES_PATH: &str = "/postalCodes";

/// Where the checkout backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Defaults overridden by `CHECKOUT_API_URL` and
    /// `CHECKOUT_API_TIMEOUT_SECS` when they are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(&url);
        }
        if let Some(secs) = lookup(API_TIMEOUT_ENV).and_then(|raw| raw.trim().parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        config
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Paths starting with `/` are resolved against the base URL; anything
    /// else is taken as an absolute URL.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            path.to_string()
        }
    }
}
