//! Order endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use orderctl_core::{Decimal, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderWithItems};
use serde::Deserialize;

use crate::db::OrderRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Create order item request (order id comes from the path)
#[derive(Deserialize)]
pub struct CreateOrderItemRequest {
    pub game_id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// GET /orders - all orders with nested items and totals
async fn list_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderWithItems>>, ApiError> {
    let orders = OrderRepo::new(state.store.as_ref()).list_with_items().await?;
    Ok(Json(orders))
}

/// POST /orders - create an empty order
async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = OrderRepo::new(state.store.as_ref()).create_order(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /orders/{order_id}/items - add an item to an order
async fn create_order_item(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<OrderId>,
    Json(req): Json<CreateOrderItemRequest>,
) -> Result<(StatusCode, Json<OrderItem>), ApiError> {
    let request = NewOrderItem {
        order_id,
        game_id: req.game_id,
        unit_price: req.unit_price,
        quantity: req.quantity,
    };
    let item = OrderRepo::new(state.store.as_ref())
        .create_order_item(request)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Order routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{order_id}/items", post(create_order_item))
}
