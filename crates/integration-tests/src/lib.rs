//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests run against [`StubApi`], an in-process `axum` server that answers
//! `GET /stock/{id}` and `GET /products/{id}` with canned responses. No
//! external services are needed.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// A canned response for one resource.
#[derive(Debug, Clone)]
pub enum Canned {
    /// 200 with a JSON body.
    Json(Value),
    /// Bare status code with an empty body.
    Status(StatusCode),
    /// 200 with a raw (possibly invalid) body.
    Raw(String),
}

impl IntoResponse for Canned {
    fn into_response(self) -> Response {
        match self {
            Self::Json(value) => axum::Json(value).into_response(),
            Self::Status(status) => status.into_response(),
            Self::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        }
    }
}

#[derive(Default)]
struct StubState {
    products: RwLock<HashMap<i32, Canned>>,
    stock: RwLock<HashMap<i32, Canned>>,
    product_hits: AtomicUsize,
    stock_hits: AtomicUsize,
    last_authorization: RwLock<Option<String>>,
}

impl StubState {
    async fn record_auth(&self, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_authorization.write().await = auth;
    }
}

/// In-process product/stock API.
///
/// Unknown ids answer 404. The server task lives until the runtime shuts
/// down, which for `#[tokio::test]` is the end of the test.
#[derive(Clone)]
pub struct StubApi {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubApi {
    /// Start an empty stub on an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot bind.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(StubState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state })
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Register a catalog product and its stock.
    pub async fn add_product(&self, id: i32, title: &str, price: f64, stock: u32) {
        self.set_product(
            id,
            Canned::Json(json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
            })),
        )
        .await;
        self.set_stock_amount(id, stock).await;
    }

    /// Replace the `/products/{id}` response.
    pub async fn set_product(&self, id: i32, response: Canned) {
        self.state.products.write().await.insert(id, response);
    }

    /// Replace the `/stock/{id}` response.
    pub async fn set_stock(&self, id: i32, response: Canned) {
        self.state.stock.write().await.insert(id, response);
    }

    /// Set the available stock for a product.
    pub async fn set_stock_amount(&self, id: i32, amount: u32) {
        self.set_stock(id, Canned::Json(json!({ "id": id, "amount": amount })))
            .await;
    }

    /// Number of `/products/{id}` requests served.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    /// Number of `/stock/{id}` requests served.
    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request.
    pub async fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.read().await.clone()
    }
}

async fn stock(State(state): State<Arc<StubState>>, Path(id): Path<i32>, headers: HeaderMap) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers).await;
    lookup(&state.stock, id).await
}

async fn product(State(state): State<Arc<StubState>>, Path(id): Path<i32>, headers: HeaderMap) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    state.record_auth(&headers).await;
    lookup(&state.products, id).await
}

async fn lookup(table: &RwLock<HashMap<i32, Canned>>, id: i32) -> Response {
    table
        .read()
        .await
        .get(&id)
        .cloned()
        .map_or_else(|| StatusCode::NOT_FOUND.into_response(), IntoResponse::into_response)
}
