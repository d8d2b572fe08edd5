//! Cart line items and the derived cart summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;
use super::product::Product;

/// One row in the cart: a specific product+size combination and its quantity.
///
/// Identity is the `(product_id, size)` pair; the cart never holds two lines
/// with the same pair. Serializes in camelCase because the persisted
/// `"cartItems"` snapshot is shared with the mobile shells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image_refs: Vec<String>,
    pub unit_price: Price,
    pub size: String,
    pub quantity: u32,
    #[serde(default)]
    pub category: Option<CategoryId>,
}

impl CartLineItem {
    /// Build the candidate line for adding `product` in `size`.
    ///
    /// Quantity comes from the product's preselected quantity (reorder flows)
    /// and defaults to one; zero is never produced.
    #[must_use]
    pub fn for_product(product: &Product, size: &str) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image_refs: product.image_refs.clone(),
            unit_price: product.price,
            size: size.to_string(),
            quantity: product.quantity.unwrap_or(1).max(1),
            category: product.category.clone(),
        }
    }

    /// Whether this line is the `(product_id, size)` pair.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: &str) -> bool {
        self.product_id == *product_id && self.size == size
    }

    /// Extended price of this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.line_total(self.quantity)
    }
}

/// Derived cart aggregate, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Sum of all line quantities.
    pub total_quantity: u32,
    /// Sum of `unit_price * quantity`, rounded to two decimal places.
    pub total_price: Decimal,
    /// Number of distinct lines.
    pub line_count: usize,
}

impl CartSummary {
    /// Compute the summary for a slice of cart lines.
    #[must_use]
    pub fn of(items: &[CartLineItem]) -> Self {
        let total_price: Decimal = items.iter().map(CartLineItem::line_total).sum();
        Self {
            total_quantity: items.iter().map(|line| line.quantity).sum(),
            total_price: total_price.round_dp(2),
            line_count: items.len(),
        }
    }
}

impl Default for CartSummary {
    fn default() -> Self {
        Self {
            total_quantity: 0,
            total_price: Decimal::ZERO,
            line_count: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, size: &str, price: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            image_refs: vec![],
            unit_price: Price::parse(price).unwrap(),
            size: size.to_string(),
            quantity,
            category: None,
        }
    }

    #[test]
    fn test_summary_totals() {
        let items = vec![line("P1", "M", "19.99", 3), line("P2", "L", "100", 1)];
        let summary = CartSummary::of(&items);
        assert_eq!(summary.total_quantity, 4);
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.total_price, "159.97".parse().unwrap());
    }

    #[test]
    fn test_summary_rounds_to_two_decimals() {
        let items = vec![line("P1", "M", "0.333", 3)];
        let summary = CartSummary::of(&items);
        assert_eq!(summary.total_price, "1.00".parse().unwrap());
    }

    #[test]
    fn test_summary_of_empty_cart() {
        assert_eq!(CartSummary::of(&[]), CartSummary::default());
    }

    #[test]
    fn test_snapshot_roundtrip_is_camel_case() {
        let items = vec![line("P1", "M", "249.90", 2)];
        let json = serde_json::to_string(&items).unwrap();
        assert!(json.contains("\"productId\":\"P1\""));
        assert!(json.contains("\"unitPrice\":\"249.90\""));
        let back: Vec<CartLineItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, items);
    }
}
