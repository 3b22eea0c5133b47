//! Axum server setup
//!
//! Boot order: run the schema initializer, then bind and serve. A schema
//! failure is returned before the listener is opened.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::{ensure_schema, DbError, OrderStore};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Deployment tag reported by `GET /`
    pub tag: String,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            tag: "dev".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub tag: String,
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::orders::router())
        .layer(middleware)
        .with_state(Arc::new(state))
}

/// Initialize the schema, then run the HTTP server until shutdown.
///
/// # Example
///
/// ```ignore
/// let connections = Arc::new(PgConnectionManager::postgres(DatabaseConfig::from_env()?));
/// let store = Arc::new(PgOrderStore::new(connections));
/// run_server(store, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    store: Arc<dyn OrderStore>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let outcome = ensure_schema(store.as_ref())
        .await
        .map_err(ServerError::Schema)?;
    tracing::info!(?outcome, "Schema ready");

    let state = AppState {
        store,
        tag: config.tag.clone(),
    };
    let app = build_router(state, config.request_timeout);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(tag = %config.tag, "Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("error initializing database: {0}")]
    Schema(#[source] DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryOrderStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn seeded_store() -> Arc<InMemoryOrderStore> {
        let store = Arc::new(InMemoryOrderStore::with_catalog([(1, "Nova"), (2, "Aster")]));
        ensure_schema(store.as_ref()).await.unwrap();
        store
    }

    fn app(store: Arc<InMemoryOrderStore>) -> Router {
        let state = AppState {
            store,
            tag: "v1.2.3".into(),
        };
        build_router(state, Duration::from_secs(5))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn banner_reports_tag() {
        let response = app(seeded_store().await)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Server is running with tag v1.2.3");
    }

    #[tokio::test]
    async fn list_orders_returns_nested_totals() {
        let response = app(seeded_store().await)
            .oneshot(Request::builder().uri("/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let orders = body.as_array().unwrap();
        assert_eq!(orders.len(), 2);

        assert_eq!(orders[0]["username"], "Kaneel");
        assert_eq!(orders[0]["items"].as_array().unwrap().len(), 2);
        assert_eq!(orders[0]["items"][0]["game_name"], "Nova");
        assert_eq!(orders[0]["items"][0]["quantity"], 10);
        assert_eq!(orders[1]["username"], "Dias");
        assert_eq!(orders[1]["items"][0]["order_item_id"], 3);
    }

    #[tokio::test]
    async fn list_orders_failure_is_generic_500() {
        let store = seeded_store().await;
        store.fail_reads(true);

        let response = app(store)
            .oneshot(Request::builder().uri("/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "an internal error occurred");
    }

    #[tokio::test]
    async fn create_order_then_item() {
        let app = app(seeded_store().await);

        let response = app
            .clone()
            .oneshot(post_json("/orders", r#"{"username": "Mira"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let order = json_body(response).await;
        assert_eq!(order["order_id"], 3);
        assert_eq!(order["items"].as_array().unwrap().len(), 0);

        let response = app
            .clone()
            .oneshot(post_json(
                "/orders/3/items",
                r#"{"game_id": 2, "unit_price": 14.99, "quantity": 2}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let item = json_body(response).await;
        assert_eq!(item["order_id"], 3);
        assert_eq!(item["total_price"], 29.98);
    }

    #[tokio::test]
    async fn item_for_unknown_order_is_conflict() {
        let response = app(seeded_store().await)
            .oneshot(post_json(
                "/orders/999/items",
                r#"{"game_id": 1, "unit_price": 1.00, "quantity": 1}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_quantity_is_bad_request() {
        let response = app(seeded_store().await)
            .oneshot(post_json(
                "/orders/1/items",
                r#"{"game_id": 1, "unit_price": 1.00, "quantity": 0}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
