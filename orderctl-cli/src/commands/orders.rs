//! Order commands - list, create, add-item
//!
//! Output is JSON on stdout, matching the HTTP API bodies.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orderctl_core::{Decimal, GameId, NewOrder, NewOrderItem, OrderId};
use orderctl_server::OrderRepo;
use serde::Serialize;

use super::DbArgs;

#[derive(Parser, Debug)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// Print all orders with nested items and totals
    List {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Create an empty order
    Create {
        /// Customer username
        #[arg(long, short = 'u')]
        username: String,
    },
    /// Add a line item to an existing order
    AddItem {
        /// Order to add the item to
        #[arg(long)]
        order_id: OrderId,

        /// Catalog game id
        #[arg(long)]
        game_id: GameId,

        /// Unit price, e.g. 26.95
        #[arg(long)]
        unit_price: Decimal,

        /// Number of units (must be positive)
        #[arg(long)]
        quantity: i32,
    },
}

pub async fn run_orders(args: OrdersArgs) -> Result<()> {
    let store = args.db.open_store()?;
    let repo = OrderRepo::new(&store);

    match args.command {
        OrdersCommand::List { pretty } => {
            let orders = repo
                .list_with_items()
                .await
                .context("Failed to list orders")?;
            tracing::debug!(count = orders.len(), "Fetched orders");
            print_json(&orders, pretty)
        }
        OrdersCommand::Create { username } => {
            let order = repo
                .create_order(NewOrder { username })
                .await
                .context("Failed to create order")?;
            print_json(&order, false)
        }
        OrdersCommand::AddItem {
            order_id,
            game_id,
            unit_price,
            quantity,
        } => {
            let item = repo
                .create_order_item(NewOrderItem {
                    order_id,
                    game_id,
                    unit_price,
                    quantity,
                })
                .await
                .with_context(|| format!("Failed to add item to order {}", order_id))?;
            print_json(&item, false)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
