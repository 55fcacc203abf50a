//! Merging several orders into one

use std::collections::HashSet;

use shared::models::Order;

use super::{add_units, recompute_totals};
use crate::error::{PosError, PosResult};

/// Result of a merge: the order to update and the orders to delete
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub target: Order,
    pub removed: Vec<i64>,
}

/// Merge `orders` into the first one
///
/// Lines with the same menu item and note add up; anything else is appended
/// as a new line. All orders must be open (unpaid, not finished).
pub fn merge_orders(orders: Vec<Order>) -> PosResult<MergeOutcome> {
    if orders.len() < 2 {
        return Err(PosError::MergeInvalid(
            "at least two orders are required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for order in &orders {
        if order.paid {
            return Err(PosError::OrderAlreadyPaid(order.id));
        }
        if order.status.is_terminal() {
            return Err(PosError::OrderFinished(order.id));
        }
        if !seen.insert(order.id) {
            return Err(PosError::MergeInvalid(format!(
                "order {} listed twice",
                order.id
            )));
        }
    }

    let mut orders = orders.into_iter();
    let Some(mut target) = orders.next() else {
        return Err(PosError::MergeInvalid("no orders".to_string()));
    };

    let mut removed = Vec::new();
    for source in orders {
        for item in &source.items {
            add_units(&mut target.items, item, item.quantity);
        }
        removed.push(source.id);
    }
    recompute_totals(&mut target);

    tracing::info!(target_id = target.id, ?removed, "Orders merged");
    Ok(MergeOutcome { target, removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::fixtures::{line, order};
    use shared::models::{OrderStatus, UNSAVED_ITEM_ID};

    #[test]
    fn test_merge_sums_matching_lines() {
        let a = order(1, vec![line(11, 100, 2, None), line(12, 200, 1, Some("rare"))]);
        let b = order(2, vec![line(21, 100, 1, Some(" ")), line(22, 200, 1, None)]);
        let c = order(3, vec![line(31, 200, 3, Some("rare"))]);

        let outcome = merge_orders(vec![a, b, c]).unwrap();
        assert_eq!(outcome.removed, vec![2, 3]);

        let target = outcome.target;
        assert_eq!(target.id, 1);
        assert_eq!(target.items.len(), 3);
        assert_eq!(target.items[0].quantity, 3);
        assert_eq!(target.items[0].id, 11);
        assert_eq!(target.items[1].quantity, 4);
        assert_eq!(target.items[2].menu_item.id, 200);
        assert_eq!(target.items[2].note, None);
        assert_eq!(target.items[2].id, UNSAVED_ITEM_ID);
        assert_eq!(target.unit_count(), 8);
        assert_eq!(target.total_without_tax, 80.0);
        assert_eq!(target.total_with_tax, 88.0);
    }

    #[test]
    fn test_merge_preconditions() {
        assert!(matches!(
            merge_orders(vec![order(1, vec![])]),
            Err(PosError::MergeInvalid(_))
        ));

        let mut paid = order(2, vec![]);
        paid.paid = true;
        assert!(matches!(
            merge_orders(vec![order(1, vec![]), paid]),
            Err(PosError::OrderAlreadyPaid(2))
        ));

        let mut finished = order(2, vec![]);
        finished.status = OrderStatus::Finished;
        assert!(matches!(
            merge_orders(vec![order(1, vec![]), finished]),
            Err(PosError::OrderFinished(2))
        ));

        assert!(matches!(
            merge_orders(vec![order(1, vec![]), order(1, vec![])]),
            Err(PosError::MergeInvalid(_))
        ));
    }
}
