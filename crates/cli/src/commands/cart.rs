//! `cart` subcommands: run one cart operation and render the result.

use std::fmt::Write as _;

use rocketshoes_core::Cart;
use rocketshoes_storefront::notify::Notification;
use rocketshoes_storefront::services::{CartStore, UpdateProductAmount};
use serde::Serialize;

use crate::CartAction;

/// Run the requested operation against the store.
pub async fn apply(store: &CartStore, action: CartAction) {
    match action {
        CartAction::Show => {}
        CartAction::Add { product_id } => store.add_product(product_id).await,
        CartAction::Remove { product_id } => store.remove_product(product_id).await,
        CartAction::Update { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await;
        }
    }
}

/// Human-readable cart listing.
pub fn render_table(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty".to_string();
    }

    let mut out = String::new();
    for item in cart {
        let _ = writeln!(out, "#{:<4} {}", item.id, item.title);
        let _ = writeln!(
            out,
            "      {} x {} = {}",
            item.amount,
            item.unit_price(),
            item.subtotal()
        );
    }

    let total = cart.total_items();
    let noun = if total == 1 { "item" } else { "items" };
    let _ = write!(out, "{total} {noun}, total {}", cart.subtotal());
    out
}

#[derive(Serialize)]
struct CartOutput<'a> {
    items: &'a Cart,
    total_items: u64,
    subtotal: String,
    notifications: Vec<NotificationOutput>,
}

#[derive(Serialize)]
struct NotificationOutput {
    kind: Notification,
    message: &'static str,
}

/// JSON document with the cart, its totals and any notifications.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn render_json(cart: &Cart, notifications: &[Notification]) -> Result<String, serde_json::Error> {
    let output = CartOutput {
        items: cart,
        total_items: cart.total_items(),
        subtotal: cart.subtotal().display(),
        notifications: notifications
            .iter()
            .map(|&kind| NotificationOutput {
                kind,
                message: kind.message(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}
