//! Wiring tests for `AppState`.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::StubApi;
use rocketshoes_storefront::config::{CatalogApiConfig, StorefrontConfig};
use rocketshoes_storefront::notify::{ChannelNotifier, drain};
use rocketshoes_storefront::state::AppState;

fn config(api: &StubApi, dir: &std::path::Path) -> StorefrontConfig {
    StorefrontConfig {
        api: CatalogApiConfig::with_base_url(&api.base_url()).unwrap(),
        data_dir: dir.join("data"),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

#[tokio::test]
async fn test_state_persists_into_data_dir() {
    let api = StubApi::start().await.unwrap();
    api.add_product(1, "Tênis de Caminhada Leve Confortável", 179.9, 2)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let (notifier, mut rx) = ChannelNotifier::new();
    let state = AppState::new(config(&api, dir.path()), Arc::new(notifier))
        .await
        .unwrap();
    state.cart().add_product(ProductId::new(1)).await;
    assert!(drain(&mut rx).is_empty());
    assert!(dir.path().join("data").is_dir());

    let (notifier, _rx) = ChannelNotifier::new();
    let reopened = AppState::new(config(&api, dir.path()), Arc::new(notifier))
        .await
        .unwrap();
    assert_eq!(reopened.cart().cart().await.amount_of(ProductId::new(1)), 1);
}

#[tokio::test]
async fn test_state_starts_empty_without_data_dir() {
    let api = StubApi::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let (notifier, _rx) = ChannelNotifier::new();
    let state = AppState::new(config(&api, dir.path()), Arc::new(notifier))
        .await
        .unwrap();

    assert!(state.cart().cart().await.is_empty());
    assert_eq!(state.config().data_dir, dir.path().join("data"));
}
