//! Schema bootstrap
//!
//! Probe for order 1; when it is readable the database is considered
//! initialized and nothing else runs. Otherwise create the tables and seed
//! fixture orders through the order writer.
//!
//! Runs once at startup, before the server accepts traffic. It is not safe
//! when several processes boot against the same empty database at the
//! same time: both can see "absent" and both will seed. Deployments are
//! expected to start a single instance first.

use orderctl_core::{Decimal, GameId, NewOrder, NewOrderItem};

use super::repos::OrderRepo;
use super::{DbError, OrderStore};

/// What `ensure_schema` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// Existing data found, no DDL or inserts were run
    AlreadyInitialized,
    /// Tables created and fixtures seeded
    Created,
}

/// Fixture line: (game id, unit price in cents, quantity)
type FixtureLine = (GameId, i64, i32);

const FIXTURES: &[(&str, &[FixtureLine])] = &[
    ("Kaneel", &[(1, 2695, 10), (2, 1499, 5)]),
    ("Dias", &[(1, 2695, 3)]),
];

/// Ensure the order tables exist and carry the baseline fixtures.
pub async fn ensure_schema(store: &dyn OrderStore) -> Result<SchemaOutcome, DbError> {
    if store.is_initialized().await? {
        tracing::info!("Orders table already exists, skipping initialization");
        return Ok(SchemaOutcome::AlreadyInitialized);
    }

    store.create_tables().await?;
    seed_fixtures(&OrderRepo::new(store)).await?;

    tracing::info!("Database initialized");
    Ok(SchemaOutcome::Created)
}

async fn seed_fixtures(repo: &OrderRepo<'_>) -> Result<(), DbError> {
    for (username, lines) in FIXTURES {
        let order = repo
            .create_order(NewOrder {
                username: (*username).to_owned(),
            })
            .await?;

        for &(game_id, cents, quantity) in lines.iter() {
            repo.create_order_item(NewOrderItem {
                order_id: order.order_id,
                game_id,
                unit_price: Decimal::new(cents, 2),
                quantity,
            })
            .await?;
        }
    }
    Ok(())
}
