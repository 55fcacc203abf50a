//! In-memory order editor
//!
//! Lines are addressed by their index in `order.items`. Lines never share a
//! (menu item, note) pair: edits that would create a duplicate fold the two
//! lines together.

use shared::models::{MenuItemRef, Order, OrderItem, OrderStatus, Product, UNSAVED_ITEM_ID};
use shared::models::order::normalize_note;

use super::{recompute_totals, status};
use crate::error::{PosError, PosResult};
use crate::money::require_amount;

#[derive(Debug, Clone)]
pub struct OrderEditor {
    order: Order,
    original: Order,
}

impl OrderEditor {
    /// Start editing; paid or finished orders are read-only
    pub fn new(order: Order) -> PosResult<Self> {
        if order.paid {
            return Err(PosError::OrderAlreadyPaid(order.id));
        }
        if order.status.is_terminal() {
            return Err(PosError::OrderFinished(order.id));
        }
        Ok(Self {
            original: order.clone(),
            order,
        })
    }

    /// Editor for a brand-new order on `table_id`
    pub fn new_for_table(table_id: i64) -> Self {
        let order = Order::new(Some(table_id));
        Self {
            original: order.clone(),
            order,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.order.items
    }

    /// Whether anything differs from the order the editor started with
    pub fn is_dirty(&self) -> bool {
        self.order != self.original
    }

    fn line_mut(&mut self, index: usize) -> PosResult<&mut OrderItem> {
        self.order
            .items
            .get_mut(index)
            .ok_or(PosError::ItemNotFound(index))
    }

    /// Add one unit of `product`; returns the index of the line it landed on
    pub fn add_product(&mut self, product: &Product, note: Option<&str>) -> PosResult<usize> {
        if !product.available {
            return Err(PosError::ProductUnavailable(product.id));
        }
        require_amount(product.price, "price")?;
        require_amount(product.tax, "tax")?;

        let index = match self
            .order
            .items
            .iter()
            .position(|i| i.matches(product.id, note))
        {
            Some(index) => {
                self.order.items[index].quantity += 1;
                index
            }
            None => {
                self.order.items.push(OrderItem {
                    id: UNSAVED_ITEM_ID,
                    menu_item: MenuItemRef {
                        id: product.id,
                        name: product.name.clone(),
                    },
                    quantity: 1,
                    price: product.price,
                    tax: product.tax,
                    note: normalize_note(note).map(str::to_string),
                    completed: false,
                });
                self.order.items.len() - 1
            }
        };
        recompute_totals(&mut self.order);
        Ok(index)
    }

    /// Set a line's quantity; zero removes the line
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> PosResult<()> {
        if quantity == 0 {
            return self.remove_line(index).map(|_| ());
        }
        self.line_mut(index)?.quantity = quantity;
        recompute_totals(&mut self.order);
        Ok(())
    }

    pub fn increment(&mut self, index: usize) -> PosResult<()> {
        let quantity = self.line_mut(index)?.quantity;
        self.set_quantity(index, quantity + 1)
    }

    /// One unit fewer; the line goes away at zero
    pub fn decrement(&mut self, index: usize) -> PosResult<()> {
        let quantity = self.line_mut(index)?.quantity;
        self.set_quantity(index, quantity.saturating_sub(1))
    }

    pub fn remove_line(&mut self, index: usize) -> PosResult<OrderItem> {
        if index >= self.order.items.len() {
            return Err(PosError::ItemNotFound(index));
        }
        let removed = self.order.items.remove(index);
        recompute_totals(&mut self.order);
        Ok(removed)
    }

    /// Replace a line's note; returns the index the line ends up at
    ///
    /// If another line already carries the same menu item and note, the two
    /// are folded into that one.
    pub fn set_note(&mut self, index: usize, note: Option<&str>) -> PosResult<usize> {
        let menu_item_id = self.line_mut(index)?.menu_item.id;
        let twin = self
            .order
            .items
            .iter()
            .enumerate()
            .position(|(i, item)| i != index && item.matches(menu_item_id, note));

        match twin {
            Some(twin) => {
                let moved = self.order.items.remove(index);
                let twin = if twin > index { twin - 1 } else { twin };
                self.order.items[twin].quantity += moved.quantity;
                recompute_totals(&mut self.order);
                Ok(twin)
            }
            None => {
                self.line_mut(index)?.note = normalize_note(note).map(str::to_string);
                Ok(index)
            }
        }
    }

    /// Flip the kitchen "done" flag of a line
    pub fn toggle_completed(&mut self, index: usize) -> PosResult<bool> {
        let line = self.line_mut(index)?;
        line.completed = !line.completed;
        Ok(line.completed)
    }

    pub fn change_status(&mut self, target: OrderStatus) -> PosResult<()> {
        status::change_status(&mut self.order, target)
    }

    /// Finish editing and hand back the order to persist
    pub fn finish(mut self) -> Order {
        recompute_totals(&mut self.order);
        self.order
    }

    /// Throw the edits away
    pub fn discard(self) -> Order {
        self.original
    }
}
