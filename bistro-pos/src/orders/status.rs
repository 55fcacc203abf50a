//! Order status transitions

use shared::models::{Order, OrderStatus};

use crate::error::{PosError, PosResult};

/// Manually set the status of an unfinished order
///
/// Only `Pending`, `InProgress` and `Completed` can be picked by hand;
/// `Finished` is reached by paying.
pub fn change_status(order: &mut Order, target: OrderStatus) -> PosResult<()> {
    if order.status.is_terminal() {
        return Err(PosError::OrderFinished(order.id));
    }
    if !order.status.can_change_to(target) {
        return Err(PosError::InvalidStatusChange {
            from: order.status,
            to: target,
        });
    }
    if order.status != target {
        tracing::debug!(order_id = order.id, from = ?order.status, to = ?target, "Order status changed");
        order.status = target;
    }
    Ok(())
}

/// Move to the next kitchen status, stopping at `Completed`
pub fn advance_status(order: &mut Order) -> PosResult<OrderStatus> {
    let next = order
        .status
        .next()
        .filter(|s| !s.is_terminal())
        .ok_or(PosError::InvalidStatusChange {
            from: order.status,
            to: OrderStatus::Finished,
        })?;
    change_status(order, next)?;
    Ok(next)
}
