//! Cart lines as exchanged with the cart resource.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// One cart line joined with its product, as returned by `GET /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Selling price times quantity, `None` if the price is not numeric or
    /// the product overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product
            .discount_amount()?
            .checked_mul(Decimal::from(self.quantity))
    }
}

/// Body of `POST /cart` and `PUT /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Acknowledgement body returned by mutations that do not echo the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Sum of line totals.
///
/// Returns `None` as soon as one line has a non-numeric selling price or the
/// sum overflows; an empty cart totals zero.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| {
        total.checked_add(item.line_total()?)
    })
}

/// Sum of quantities across all lines.
#[must_use]
pub fn cart_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, discount_price: &str, quantity: u32) -> CartItem {
        CartItem {
            product: Product {
                id: ProductId::new(id),
                product_name: format!("Product {id}"),
                brand: "Brand".to_string(),
                price: "100".to_string(),
                discount_price: discount_price.to_string(),
                image_url: String::new(),
                quantity: "1 pc".to_string(),
                category: "Misc".to_string(),
                sub_category: "Misc".to_string(),
                absolute_url: String::new(),
            },
            quantity,
        }
    }

    #[test]
    fn test_total_and_count() {
        let items = vec![item("7", "50", 2)];
        assert_eq!(cart_total(&items), Some(Decimal::new(100, 0)));
        assert_eq!(cart_count(&items), 2);
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(cart_total(&[]), Some(Decimal::ZERO));
        assert_eq!(cart_count(&[]), 0);
    }

    #[test]
    fn test_non_numeric_price_poisons_total() {
        let items = vec![item("1", "10.5", 2), item("2", "call us", 1)];
        assert_eq!(cart_total(&items), None);
        assert_eq!(cart_count(&items), 3);
    }

    #[test]
    fn test_overflowing_line_has_no_total() {
        let items = vec![item("1", "79228162514264337593543950335", 2)];
        assert_eq!(items.first().unwrap().line_total(), None);
        assert_eq!(cart_total(&items), None);
    }

    #[test]
    fn test_overflowing_sum_has_no_total() {
        let items = vec![
            item("1", "79228162514264337593543950335", 1),
            item("2", "1", 1),
        ];
        assert_eq!(cart_total(&items), None);
        assert_eq!(cart_count(&items), 2);
    }

    #[test]
    fn test_cart_line_request_wire_format() {
        let request = CartLineRequest {
            product_id: ProductId::new("7"),
            quantity: 2,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"product_id":"7","quantity":2}"#);
    }
}
