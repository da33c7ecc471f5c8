//! Order summary: the product list and its total.

use tracing::warn;

use crate::collaborators::ProductCatalog;
use crate::currency::format_price;
use crate::error::TransportError;
use crate::models::Product;

pub const SHIPPING_PENDING_LABEL: &str = "A calcular";

/// One rendered row of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub name: String,
    pub image: String,
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderSummary {
    products: Vec<Product>,
}

impl OrderSummary {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Fetch the product list once. No retries.
    pub async fn load<C: ProductCatalog>(catalog: &C) -> Result<Self, TransportError> {
        let products = catalog.fetch_products().await?;
        Ok(Self::new(products))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Sum of every product price. Prices that do not parse are skipped.
    pub fn total(&self) -> f64 {
        self.products
            .iter()
            .filter_map(|product| {
                let price = product.price_value();
                if price.is_none() {
                    warn!(
                        product = %product.name,
                        price = %product.price,
                        "skipping unparseable price"
                    );
                }
                price
            })
            .sum()
    }

    pub fn lines(&self) -> Vec<SummaryLine> {
        self.products
            .iter()
            .map(|product| SummaryLine {
                name: product.name.clone(),
                image: product.image.clone(),
                price: format_price(product.price_value().unwrap_or(0.0)),
            })
            .collect()
    }

    pub fn subtotal_display(&self) -> String {
        format_price(self.total())
    }

    /// Shipping is not computed yet, so the total equals the subtotal.
    pub fn total_display(&self) -> String {
        format_price(self.total())
    }

    pub fn shipping_display(&self) -> &'static str {
        SHIPPING_PENDING_LABEL
    }
}
