//! Products, cart line items and stock records.
//!
//! Prices travel as JSON numbers (`"price": 179.9`) both on the wire and in
//! the persisted cart, so the decimal fields use `rust_decimal::serde::float`.
//!
//! Fields beyond the ones the cart reads are kept verbatim in `extra` and
//! written back unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};

/// A catalog product as returned by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    /// Product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price in BRL.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    /// Any other catalog attributes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductDetails {
    /// Turn the catalog record into a cart line item with the given amount.
    #[must_use]
    pub fn into_line_item(mut self, amount: u32) -> Product {
        self.extra.remove("amount");
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            image: self.image,
            amount,
            extra: self.extra,
        }
    }
}

/// A cart line item: a product plus the quantity currently in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID (unique within a cart).
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price in BRL.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    /// Quantity in the cart (at least 1).
    pub amount: u32,
    /// Catalog attributes carried over from [`ProductDetails::extra`].
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Copy of this line item with a different amount.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    /// Unit price.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::new(self.price, CurrencyCode::BRL)
    }

    /// Unit price multiplied by the amount.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::new(self.price * Decimal::from(self.amount), CurrencyCode::BRL)
    }
}

/// Remote stock record as returned by `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Product ID this record belongs to.
    pub id: ProductId,
    /// Units available.
    pub amount: u32,
}

impl Stock {
    /// Whether `requested` units can be served from this stock.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        self.amount >= requested
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn details() -> ProductDetails {
        ProductDetails {
            id: ProductId::new(1),
            title: "Tênis de Caminhada Leve Confortável".to_string(),
            price: Decimal::new(1799, 1),
            image: "https://example.com/shoe.jpg".to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_product_details_from_api_json() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe.jpg"
        }"#;
        let parsed: ProductDetails = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, details());
    }

    #[test]
    fn test_line_item_price_stays_numeric() {
        let item = details().into_line_item(2);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["price"], serde_json::json!(179.9));
        assert_eq!(value["amount"], serde_json::json!(2));
    }

    #[test]
    fn test_unknown_attributes_survive_into_line_item() {
        let json = r#"{
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe.jpg",
            "brand": "Adidas",
            "sizes": [38, 39],
            "amount": 7
        }"#;
        let parsed: ProductDetails = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.extra["brand"], serde_json::json!("Adidas"));

        let item = parsed.into_line_item(1);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["brand"], serde_json::json!("Adidas"));
        assert_eq!(value["sizes"], serde_json::json!([38, 39]));
        assert_eq!(value["amount"], serde_json::json!(1));
    }

    #[test]
    fn test_line_item_roundtrip_keeps_unknown_attributes() {
        let json = r#"{"id":2,"title":"t","price":139.9,"image":"i","amount":1,"brand":"Adidas"}"#;
        let item: Product = serde_json::from_str(json).unwrap();
        let bumped = item.with_amount(2);

        let value = serde_json::to_value(&bumped).unwrap();
        assert_eq!(value["brand"], serde_json::json!("Adidas"));
        assert_eq!(value["amount"], serde_json::json!(2));
    }

    #[test]
    fn test_with_amount_keeps_display_fields() {
        let item = details().into_line_item(1);
        let bumped = item.with_amount(3);
        assert_eq!(bumped.amount, 3);
        assert_eq!(bumped.title, item.title);
        assert_eq!(bumped.id, item.id);
    }

    #[test]
    fn test_subtotal() {
        let item = details().into_line_item(3);
        assert_eq!(item.subtotal().amount, Decimal::new(5397, 1));
        assert_eq!(item.unit_price().display(), "R$ 179,90");
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock {
            id: ProductId::new(1),
            amount: 2,
        };
        assert!(stock.covers(1));
        assert!(stock.covers(2));
        assert!(!stock.covers(3));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let parsed = serde_json::from_str::<Stock>(r#"{"id": 1, "amount": -1}"#);
        assert!(parsed.is_err());
    }
}
