use serde::{Deserialize, Serialize};

/// Shipping contact submitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub name: String,
    pub last_name: String,
    pub telephone: String,
    pub email: String,
    pub code: String,
    pub state: String,
    pub town: String,
    pub colony: String,
    pub city: String,
    pub street: String,
    pub policy: bool,
}

impl Default for ContactRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            last_name: String::new(),
            telephone: String::new(),
            email: String::new(),
            code: String::new(),
            state: String::new(),
            town: String::new(),
            colony: String::new(),
            city: String::new(),
            street: String::new(),
            policy: true,
        }
    }
}

/// Product line as returned by the catalog. Prices arrive as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Numeric price. Blank prices count as zero; unparseable ones are `None`.
    pub fn price_value(&self) -> Option<f64> {
        let trimmed = self.price.trim();
        if trimmed.is_empty() {
            return Some(0.0);
        }
        trimmed.parse::<f64>().ok().filter(|price| price.is_finite())
    }
}

/// Locality data resolved from a postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub colonies: Vec<String>,
}

impl Locality {
    /// A lookup only counts as a hit when it names a city.
    pub fn is_resolved(&self) -> bool {
        !self.city.trim().is_empty()
    }
}
