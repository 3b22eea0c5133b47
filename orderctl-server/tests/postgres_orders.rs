//! PostgreSQL integration tests
//!
//! Run with POSTGRES_HOST / POSTGRES_PORT / POSTGRES_DB / POSTGRES_USER /
//! POSTGRES_PASSWORD pointing at a scratch database:
//! cargo test -p orderctl-server --test postgres_orders -- --ignored --test-threads=1

use std::sync::Arc;

use orderctl_core::{Decimal, NewOrder, NewOrderItem};
use orderctl_server::{
    ensure_schema, DatabaseConfig, OrderRepo, OrderStore, PgConnectionManager, PgOrderStore,
    SchemaOutcome,
};

async fn store_with_catalog() -> PgOrderStore {
    let config = DatabaseConfig::from_env().expect("POSTGRES_* required");
    let connections = Arc::new(PgConnectionManager::postgres(config));
    let pool = connections.get().await.expect("connection failed");

    // Games is owned by the catalog service; stand in for it here
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS Games (game_id SERIAL PRIMARY KEY, name TEXT NOT NULL)",
    )
    .execute(&pool)
    .await
    .expect("create Games");
    sqlx::query(
        "INSERT INTO Games (game_id, name) VALUES (1, 'Nova'), (2, 'Aster') ON CONFLICT DO NOTHING",
    )
    .execute(&pool)
    .await
    .expect("seed Games");

    PgOrderStore::new(connections)
}

#[tokio::test]
#[ignore = "requires database"]
async fn schema_bootstrap_is_idempotent() {
    let store = store_with_catalog().await;

    let first = ensure_schema(&store).await.expect("first bootstrap");
    let second = ensure_schema(&store).await.expect("second bootstrap");

    assert!(matches!(
        first,
        SchemaOutcome::Created | SchemaOutcome::AlreadyInitialized
    ));
    assert_eq!(second, SchemaOutcome::AlreadyInitialized);
    assert!(store.is_initialized().await.unwrap());
}

#[tokio::test]
#[ignore = "requires database"]
async fn written_items_show_up_in_totals() {
    let store = store_with_catalog().await;
    ensure_schema(&store).await.expect("bootstrap");
    let repo = OrderRepo::new(&store);

    let order = repo
        .create_order(NewOrder {
            username: "Integration".into(),
        })
        .await
        .expect("create order");
    repo.create_order_item(NewOrderItem {
        order_id: order.order_id,
        game_id: 2,
        unit_price: Decimal::new(1499, 2),
        quantity: 4,
    })
    .await
    .expect("create item");

    let orders = repo.list_with_items().await.expect("list");
    let listed = orders
        .iter()
        .find(|o| o.order_id == order.order_id)
        .expect("new order listed");

    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].game_name, "Aster");
    assert_eq!(listed.total_price, Decimal::new(5996, 2));
}

#[tokio::test]
#[ignore = "requires database"]
async fn item_for_missing_order_is_integrity_violation() {
    let store = store_with_catalog().await;
    ensure_schema(&store).await.expect("bootstrap");

    let err = OrderRepo::new(&store)
        .create_order_item(NewOrderItem {
            order_id: i32::MAX,
            game_id: 1,
            unit_price: Decimal::new(100, 2),
            quantity: 1,
        })
        .await
        .unwrap_err();

    assert!(err.is_integrity_violation());
}
