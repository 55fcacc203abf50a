//! Invoice emission

use chrono::{DateTime, Utc};
use shared::models::{Invoice, Order};

use super::session::Settlement;
use crate::error::{PosError, PosResult};
use crate::money::{approx_eq, to_decimal};

/// Invoice recording how `settlement` was paid
pub fn build_invoice(settlement: &Settlement, date: DateTime<Utc>) -> Invoice {
    Invoice {
        id: None,
        date,
        paid_with_card: settlement.card,
        paid_with_cash: settlement.cash,
        order_id: settlement.order_id,
    }
}

/// The order as it looks once paid: `paid` set, COMPLETED promoted to FINISHED
pub fn settle_order(order: &Order) -> Order {
    let mut settled = order.clone();
    settled.paid = true;
    settled.status = order.status.after_payment();
    settled
}

/// Check the settlement against the order and produce the invoice and the
/// updated order
pub fn complete_payment(
    order: &Order,
    settlement: &Settlement,
    date: DateTime<Utc>,
) -> PosResult<(Invoice, Order)> {
    if order.paid {
        return Err(PosError::OrderAlreadyPaid(order.id));
    }
    if settlement.order_id != order.id {
        return Err(PosError::InvalidStage(format!(
            "settlement is for order {}, not {}",
            settlement.order_id, order.id
        )));
    }
    let settled = to_decimal(settlement.cash) + to_decimal(settlement.card);
    if !approx_eq(settled, to_decimal(order.total_with_tax)) {
        return Err(PosError::SplitMismatch {
            cash: settlement.cash,
            card: settlement.card,
            target: order.total_with_tax,
        });
    }

    Ok((build_invoice(settlement, date), settle_order(order)))
}
