//! The cart: an ordered, id-unique sequence of line items.
//!
//! All mutations are expressed as functions from one `Cart` to a new `Cart`,
//! so callers can compute the next state completely before committing it.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::{CurrencyCode, Price};
use super::product::Product;

/// Errors produced by cart transformations and cart validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// No line item with this product ID.
    #[error("product {0} is not in the cart")]
    ProductNotInCart(ProductId),
    /// A second line item with the same product ID.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
    /// A line item with an amount of zero.
    #[error("product {0} has an amount of zero")]
    ZeroAmount(ProductId),
}

/// Ordered collection of line items, unique by product ID.
///
/// Serializes as a bare JSON array of [`Product`] records. Deserialization
/// validates the same invariants as [`Cart::try_from_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, validating uniqueness and amounts.
    ///
    /// # Errors
    ///
    /// Returns `CartError::DuplicateProduct` if two items share an ID and
    /// `CartError::ZeroAmount` if any item has an amount of zero.
    pub fn try_from_items(items: Vec<Product>) -> Result<Self, CartError> {
        let mut seen = BTreeSet::new();
        for item in &items {
            if item.amount == 0 {
                return Err(CartError::ZeroAmount(item.id));
            }
            if !seen.insert(item.id) {
                return Err(CartError::DuplicateProduct(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over line items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    /// Position of a product in the cart.
    #[must_use]
    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Line item for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Current amount of a product, zero when absent.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |item| item.amount)
    }

    /// New cart with the product's amount replaced in place.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotInCart` if the product is absent and
    /// `CartError::ZeroAmount` if `amount` is zero.
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Result<Self, CartError> {
        if amount == 0 {
            return Err(CartError::ZeroAmount(id));
        }
        let index = self.position(id).ok_or(CartError::ProductNotInCart(id))?;

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == index {
                    item.with_amount(amount)
                } else {
                    item.clone()
                }
            })
            .collect();

        Ok(Self { items })
    }

    /// New cart with the product appended at the end.
    ///
    /// # Errors
    ///
    /// Returns `CartError::DuplicateProduct` if the product is already present
    /// and `CartError::ZeroAmount` if its amount is zero.
    pub fn with_product(&self, product: Product) -> Result<Self, CartError> {
        if product.amount == 0 {
            return Err(CartError::ZeroAmount(product.id));
        }
        if self.position(product.id).is_some() {
            return Err(CartError::DuplicateProduct(product.id));
        }

        let mut items = self.items.clone();
        items.push(product);
        Ok(Self { items })
    }

    /// New cart without the product.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotInCart` if the product is absent.
    pub fn without(&self, id: ProductId) -> Result<Self, CartError> {
        if self.position(id).is_none() {
            return Err(CartError::ProductNotInCart(id));
        }

        let items = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        Ok(Self { items })
    }

    /// Sum of all amounts.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let amount = self
            .items
            .iter()
            .map(|item| item.subtotal().amount)
            .fold(Decimal::ZERO, |acc, line| acc + line);
        Price::new(amount, CurrencyCode::BRL)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<Product>::deserialize(deserializer)?;
        Self::try_from_items(items).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, amount: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Tênis {id}"),
            price: Decimal::new(1000 + i64::from(id), 1),
            image: format!("https://example.com/{id}.jpg"),
            amount,
            extra: serde_json::Map::new(),
        }
    }

    fn cart_of(items: &[(i32, u32)]) -> Cart {
        Cart::try_from_items(items.iter().map(|&(id, amount)| item(id, amount)).collect())
            .unwrap()
    }

    fn ids(cart: &Cart) -> Vec<i32> {
        cart.iter().map(|item| item.id.as_i32()).collect()
    }

    #[test]
    fn test_try_from_items_rejects_duplicates() {
        let result = Cart::try_from_items(vec![item(1, 1), item(2, 1), item(1, 3)]);
        assert_eq!(result, Err(CartError::DuplicateProduct(ProductId::new(1))));
    }

    #[test]
    fn test_try_from_items_rejects_zero_amount() {
        let result = Cart::try_from_items(vec![item(1, 1), item(2, 0)]);
        assert_eq!(result, Err(CartError::ZeroAmount(ProductId::new(2))));
    }

    #[test]
    fn test_with_amount_preserves_position() {
        let cart = cart_of(&[(1, 1), (2, 2), (3, 1)]);
        let updated = cart.with_amount(ProductId::new(2), 5).unwrap();

        assert_eq!(ids(&updated), vec![1, 2, 3]);
        assert_eq!(updated.amount_of(ProductId::new(2)), 5);
        assert_eq!(updated.get(ProductId::new(1)), cart.get(ProductId::new(1)));
        assert_eq!(updated.get(ProductId::new(3)), cart.get(ProductId::new(3)));
        // The source cart is untouched
        assert_eq!(cart.amount_of(ProductId::new(2)), 2);
    }

    #[test]
    fn test_with_amount_absent_product() {
        let cart = cart_of(&[(1, 1)]);
        assert_eq!(
            cart.with_amount(ProductId::new(9), 2),
            Err(CartError::ProductNotInCart(ProductId::new(9)))
        );
    }

    #[test]
    fn test_with_product_appends() {
        let cart = cart_of(&[(1, 1)]);
        let updated = cart.with_product(item(2, 1)).unwrap();
        assert_eq!(ids(&updated), vec![1, 2]);
        assert!(cart.with_product(item(1, 1)).is_err());
    }

    #[test]
    fn test_without_keeps_order_of_remaining() {
        let cart = cart_of(&[(1, 1), (2, 1), (3, 1)]);
        let updated = cart.without(ProductId::new(2)).unwrap();
        assert_eq!(ids(&updated), vec![1, 3]);

        assert_eq!(
            updated.without(ProductId::new(2)),
            Err(CartError::ProductNotInCart(ProductId::new(2)))
        );
    }

    #[test]
    fn test_totals() {
        let cart = cart_of(&[(1, 2), (2, 3)]);
        assert_eq!(cart.total_items(), 5);
        // 100.1 * 2 + 100.2 * 3
        assert_eq!(cart.subtotal().amount, Decimal::new(5008, 1));
        assert_eq!(Cart::new().subtotal().display(), "R$ 0,00");
    }

    #[test]
    fn test_serde_roundtrip_preserves_order() {
        let cart = cart_of(&[(3, 1), (1, 4), (2, 2)]);
        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));

        let parsed: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cart);
        assert_eq!(ids(&parsed), vec![3, 1, 2]);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[
            {"id": 1, "title": "a", "price": 10.0, "image": "a.jpg", "amount": 1},
            {"id": 1, "title": "a", "price": 10.0, "image": "a.jpg", "amount": 2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
        assert!(serde_json::from_str::<Cart>(r#"{"id": 1}"#).is_err());
    }
}
