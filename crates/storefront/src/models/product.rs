//! Catalog product.

use rust_decimal::Decimal;

use harvest_hub_core::{ProductId, format_money};

/// A product shown on the shop pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub category: String,
    pub description: String,
}

impl Product {
    /// Price formatted for display, e.g. `$2.67`.
    #[must_use]
    pub fn display_price(&self) -> String {
        format_money(self.price)
    }
}
