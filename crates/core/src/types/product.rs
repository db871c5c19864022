//! Catalog product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{discount_fraction, parse_amount};

/// A product as stored in the catalog and returned by the API.
///
/// All fields are kept as text; numeric fields are parsed by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Sequential catalog id. Older clients send it as `id`.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: ProductId,
    pub product_name: String,
    pub brand: String,
    /// List price.
    pub price: String,
    /// Selling price, never above `price` in well-formed data.
    pub discount_price: String,
    pub image_url: String,
    /// Pack size, e.g. "500 g".
    pub quantity: String,
    pub category: String,
    pub sub_category: String,
    pub absolute_url: String,
}

impl Product {
    /// Parsed list price.
    #[must_use]
    pub fn price_amount(&self) -> Option<Decimal> {
        parse_amount(&self.price)
    }

    /// Parsed selling price.
    #[must_use]
    pub fn discount_amount(&self) -> Option<Decimal> {
        parse_amount(&self.discount_price)
    }

    /// Fraction of the list price saved, zero when it cannot be computed.
    #[must_use]
    pub fn discount_fraction(&self) -> Decimal {
        discount_fraction(&self.price, &self.discount_price)
    }
}

/// Product fields supplied on insert; the catalog assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_name: String,
    pub brand: String,
    pub price: String,
    pub discount_price: String,
    pub image_url: String,
    pub quantity: String,
    pub category: String,
    pub sub_category: String,
    pub absolute_url: String,
}

impl NewProduct {
    /// Attach an id, producing the stored record.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            product_name: self.product_name,
            brand: self.brand,
            price: self.price,
            discount_price: self.discount_price,
            image_url: self.image_url,
            quantity: self.quantity,
            category: self.category,
            sub_category: self.sub_category,
            absolute_url: self.absolute_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> NewProduct {
        NewProduct {
            product_name: "Toned Milk".to_string(),
            brand: "Amul".to_string(),
            price: "60".to_string(),
            discount_price: "54".to_string(),
            image_url: "https://img.example/milk.jpg".to_string(),
            quantity: "1 L".to_string(),
            category: "Dairy".to_string(),
            sub_category: "Milk".to_string(),
            absolute_url: "https://shop.example/milk".to_string(),
        }
    }

    #[test]
    fn test_json_uses_storefront_field_names() {
        let product = sample().with_id(ProductId::new("1"));
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["_id"], "1");
        assert_eq!(json["productName"], "Toned Milk");
        assert_eq!(json["discountPrice"], "54");
        assert_eq!(json["subCategory"], "Milk");
        assert_eq!(json["absoluteUrl"], "https://shop.example/milk");
    }

    #[test]
    fn test_accepts_legacy_id_field() {
        let json = r#"{
            "id": "12",
            "productName": "Bread",
            "brand": "Modern",
            "price": "40",
            "discountPrice": "38",
            "imageUrl": "",
            "quantity": "400 g",
            "category": "Bakery",
            "subCategory": "Breads",
            "absoluteUrl": ""
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "12");
    }

    #[test]
    fn test_missing_id_decodes_as_invalid() {
        let json = serde_json::to_value(sample()).unwrap();
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(!product.id.is_valid());
    }

    #[test]
    fn test_amounts() {
        let product = sample().with_id(ProductId::new("1"));
        assert_eq!(product.price_amount(), Some(Decimal::new(60, 0)));
        assert_eq!(product.discount_amount(), Some(Decimal::new(54, 0)));
        assert_eq!(product.discount_fraction(), Decimal::new(1, 1));
    }
}
