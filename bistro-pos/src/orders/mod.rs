//! Order workflows
//!
//! Every workflow works on a local copy of the order(s); nothing here talks
//! to the backend. [`crate::service::PosService`] persists the results.

pub mod editor;
pub mod merge;
pub mod split;
pub mod status;

pub use editor::OrderEditor;
pub use merge::{MergeOutcome, merge_orders};
pub use split::{MoveAmount, SourceAction, SplitPlan, SplitSession};
pub use status::{advance_status, change_status};

use shared::models::{MenuItemRef, Order, OrderItem, UNSAVED_ITEM_ID};

use crate::money::order_totals;

/// Recompute `totalWithoutTax` / `totalWithTax` from the lines
pub fn recompute_totals(order: &mut Order) {
    let (net, gross) = order_totals(&order.items);
    order.total_without_tax = net;
    order.total_with_tax = gross;
}

/// Add `quantity` units of `item`'s line to `items`, merging with a line of the
/// same menu item and note when one exists
pub(crate) fn add_units(items: &mut Vec<OrderItem>, item: &OrderItem, quantity: u32) {
    if quantity == 0 {
        return;
    }
    match items.iter_mut().find(|i| i.same_line_as(item)) {
        Some(existing) => existing.quantity += quantity,
        None => items.push(OrderItem {
            id: UNSAVED_ITEM_ID,
            menu_item: MenuItemRef {
                id: item.menu_item.id,
                name: item.menu_item.name.clone(),
            },
            quantity,
            price: item.price,
            tax: item.tax,
            note: item.normalized_note().map(str::to_string),
            completed: item.completed,
        }),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_add_units_merges_on_note() {
        let mut items = vec![line(1, 3, 1, Some("no onion"))];
        add_units(&mut items, &line(9, 3, 2, Some("  no onion ")), 2);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);

        add_units(&mut items, &line(9, 3, 1, None), 1);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, UNSAVED_ITEM_ID);
    }

    #[test]
    fn test_recompute_totals() {
        let order = order(1, vec![line(1, 1, 2, None), line(2, 2, 1, None)]);
        assert_eq!(order.total_without_tax, 30.0);
        assert_eq!(order.total_with_tax, 33.0);
    }
}
