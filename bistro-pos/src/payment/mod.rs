//! Payment processing
//!
//! - [`tally`]: cash denomination counting and change
//! - [`session`]: the per-order payment state machine (cash, card, mixed)
//! - [`invoice`]: turning a settlement into an invoice and a paid order

pub mod invoice;
pub mod session;
pub mod tally;

pub use invoice::{build_invoice, complete_payment, settle_order};
pub use session::{PaymentMode, PaymentSession, PaymentStage, Settlement};
pub use tally::{CashTally, Denomination};

use rust_decimal::Decimal;

use crate::error::{PosError, PosResult};
use crate::money::{approx_eq, round_cents, to_f64};

/// Split `target` into `(cash, card)` given the cash handed over
///
/// The card covers whatever cash does not: `card = target - cash`, then
/// `cash = target - card`.
pub fn split_mixed(target: Decimal, cash_tendered: Decimal) -> (Decimal, Decimal) {
    let card = round_cents(target - cash_tendered);
    let cash = round_cents(target - card);
    (cash, card)
}

/// Check a mixed split before an invoice is emitted
///
/// Both parts must be positive, cash must stay below the target and the two
/// must add up to the target within a cent.
pub fn validate_split(target: Decimal, cash: Decimal, card: Decimal) -> PosResult<()> {
    let mismatch = || PosError::SplitMismatch {
        cash: to_f64(cash),
        card: to_f64(card),
        target: to_f64(target),
    };

    if card <= Decimal::ZERO || cash <= Decimal::ZERO || cash >= target {
        return Err(mismatch());
    }
    if !approx_eq(cash + card, target) {
        return Err(mismatch());
    }
    Ok(())
}
