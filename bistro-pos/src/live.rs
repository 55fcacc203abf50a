//! Live order board
//!
//! Local list of open orders kept current from the live channel. Updates are
//! merged by order id and the last message wins.

use std::sync::Arc;

use shared::models::{Order, OrderStatus};
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Effect of applying one update to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardChange {
    Inserted,
    Replaced,
    /// The order was closed (finished and paid) and left the board
    Removed,
    /// A closed order the board never held
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct OrderBoard {
    orders: Vec<Order>,
}

/// Orders that no longer belong on the board
fn is_closed(order: &Order) -> bool {
    order.paid && order.status == OrderStatus::Finished
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole board, e.g. after a REST refresh
    pub fn replace_all(&mut self, orders: Vec<Order>) {
        self.orders = orders.into_iter().filter(|o| !is_closed(o)).collect();
    }

    pub fn apply(&mut self, order: Order) -> BoardChange {
        let position = self.orders.iter().position(|o| o.id == order.id);
        match (position, is_closed(&order)) {
            (Some(index), true) => {
                self.orders.remove(index);
                BoardChange::Removed
            }
            (None, true) => BoardChange::Ignored,
            (Some(index), false) => {
                self.orders[index] = order;
                BoardChange::Replaced
            }
            (None, false) => {
                self.orders.push(order);
                BoardChange::Inserted
            }
        }
    }

    /// Drop an order that was deleted server-side (merge, emptied split)
    pub fn remove(&mut self, order_id: i64) -> Option<Order> {
        let index = self.orders.iter().position(|o| o.id == order_id)?;
        Some(self.orders.remove(index))
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, order_id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    pub fn for_table(&self, table_id: i64) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(move |o| o.table_id == Some(table_id))
    }

    pub fn by_status(&self, status: OrderStatus) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.status == status)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Apply updates from `updates` to `board` until cancelled or the channel closes
///
/// Returns the number of updates applied.
pub async fn follow(
    board: Arc<RwLock<OrderBoard>>,
    mut updates: broadcast::Receiver<Order>,
    shutdown: CancellationToken,
) -> usize {
    let mut applied = 0;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            result = updates.recv() => match result {
                Ok(order) => {
                    let order_id = order.id;
                    let change = board.write().await.apply(order);
                    tracing::debug!(order_id, ?change, "Board updated");
                    applied += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Board lagged {n} updates, refresh to resync");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Update channel closed, board no longer live");
                    break;
                }
            }
        }
    }
    applied
}

/// Wait for a [`follow`] task; `None` when it panicked or was aborted
pub async fn join_follower(handle: JoinHandle<usize>) -> Option<usize> {
    match handle.await {
        Ok(applied) => Some(applied),
        Err(e) => {
            tracing::error!("Live board task failed: {e}");
            None
        }
    }
}
