use std::collections::{HashMap, HashSet};

use orderctl_core::{fold_rows, line_total, Decimal, ItemRow, OrderFolder, OrderRow};
use proptest::prelude::*;

// Row shape: (order id, optional (price in cents, quantity)).
// Small id range so orders repeat and interleave.
fn arb_rows() -> impl Strategy<Value = Vec<(i32, Option<(i64, i32)>)>> {
    prop::collection::vec(
        (
            1..8i32,
            prop::option::of((0..=99_999i64, 1..=500i32)),
        ),
        0..200,
    )
}

fn build_rows(spec: &[(i32, Option<(i64, i32)>)]) -> Vec<OrderRow> {
    spec.iter()
        .enumerate()
        .map(|(i, (order_id, item))| OrderRow {
            order_id: *order_id,
            username: format!("user-{}", order_id),
            item: item.map(|(cents, quantity)| ItemRow {
                order_item_id: i as i32 + 1,
                game_id: (i % 3) as i32 + 1,
                game_name: format!("game-{}", i % 3),
                unit_price: Decimal::new(cents, 2),
                quantity,
            }),
        })
        .collect()
}

proptest! {
    /// Property: each order id appears once, with one item per non-null item row
    #[test]
    fn prop_orders_unique_and_items_counted(spec in arb_rows()) {
        let orders = fold_rows(build_rows(&spec));

        let mut seen = HashSet::new();
        for order in &orders {
            prop_assert!(seen.insert(order.order_id), "order {} emitted twice", order.order_id);
        }

        let distinct: HashSet<_> = spec.iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(seen, distinct);

        let mut expected_items: HashMap<i32, usize> = HashMap::new();
        for (id, item) in &spec {
            let count = expected_items.entry(*id).or_default();
            if item.is_some() {
                *count += 1;
            }
        }
        for order in &orders {
            prop_assert_eq!(order.items.len(), expected_items[&order.order_id]);
        }
    }

    /// Property: order total equals the sum of unit_price × quantity over its items
    #[test]
    fn prop_total_is_sum_of_lines(spec in arb_rows()) {
        let orders = fold_rows(build_rows(&spec));

        for order in &orders {
            let expected: Decimal = order
                .items
                .iter()
                .map(|line| line_total(line.unit_price, line.quantity))
                .sum();
            prop_assert_eq!(order.total_price, expected);
            prop_assert!(order.total_price.scale() <= 2);

            for line in &order.items {
                prop_assert_eq!(line.total_price, line.unit_price * Decimal::from(line.quantity));
            }
        }
    }

    /// Property: orders with only null item rows have no items and a zero total
    #[test]
    fn prop_itemless_orders_are_empty(spec in arb_rows()) {
        let orders = fold_rows(build_rows(&spec));

        for order in &orders {
            let has_item = spec
                .iter()
                .any(|(id, item)| *id == order.order_id && item.is_some());
            if !has_item {
                prop_assert!(order.items.is_empty());
                prop_assert!(order.total_price.is_zero());
            }
        }
    }

    /// Property: output follows first appearance, items follow row arrival
    #[test]
    fn prop_first_seen_order_preserved(spec in arb_rows()) {
        let rows = build_rows(&spec);
        let orders = fold_rows(rows.clone());

        let mut first_seen = Vec::new();
        for row in &rows {
            if !first_seen.contains(&row.order_id) {
                first_seen.push(row.order_id);
            }
        }
        let output: Vec<_> = orders.iter().map(|o| o.order_id).collect();
        prop_assert_eq!(output, first_seen);

        for order in &orders {
            let ids: Vec<_> = order.items.iter().map(|l| l.order_item_id).collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            // item ids are assigned in row order, so arrival order means ascending
            prop_assert_eq!(ids, sorted);
        }
    }

    /// Property: pushing rows one at a time matches folding the whole batch
    #[test]
    fn prop_incremental_matches_batch(spec in arb_rows()) {
        let rows = build_rows(&spec);
        let batch = fold_rows(rows.clone());

        let mut folder = OrderFolder::new();
        for row in rows {
            folder.push(row);
        }
        prop_assert_eq!(folder.len(), batch.len());

        let incremental = folder.finish();
        for (a, b) in incremental.iter().zip(&batch) {
            prop_assert_eq!(a.order_id, b.order_id);
            prop_assert_eq!(a.items.len(), b.items.len());
            prop_assert_eq!(a.total_price, b.total_price);
        }
    }
}

#[test]
fn concrete_scenario_totals() {
    let rows = build_rows(&[
        (1, Some((2695, 10))),
        (1, Some((1499, 5))),
        (2, Some((2695, 3))),
    ]);

    let orders = fold_rows(rows);
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].total_price, Decimal::new(34445, 2));
    assert_eq!(orders[1].total_price, Decimal::new(8085, 2));
}
