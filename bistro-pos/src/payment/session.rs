//! Payment session state machine
//!
//! ```text
//! Tendering ──confirm──▶ Completed                       (cash)
//! Tendering ──confirm──▶ AwaitingCard ──approve──▶ Completed   (mixed, card)
//!                        AwaitingCard ──decline──▶ Tendering
//! ```

use rust_decimal::Decimal;
use shared::models::Order;

use super::tally::{CashTally, Denomination};
use super::{split_mixed, validate_split};
use crate::error::{PosError, PosResult};
use crate::money::{require_amount, round_cents, to_decimal, to_f64, to_f64_floor};

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMode {
    #[default]
    Cash,
    /// Part cash, the rest by card
    Mixed,
    Card,
}

/// Amounts settled for one order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub order_id: i64,
    pub mode: PaymentMode,
    /// Cash kept for the order (tendered minus change)
    pub cash: f64,
    pub card: f64,
    /// Cash physically handed over
    pub tendered: f64,
    /// Cash handed back
    pub change: f64,
}

impl Settlement {
    pub fn total(&self) -> f64 {
        to_f64(to_decimal(self.cash) + to_decimal(self.card))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentStage {
    /// Counting cash
    Tendering,
    /// Waiting for the card terminal to approve `card`
    AwaitingCard { cash: f64, card: f64 },
    Completed(Settlement),
}

/// Payment of a single order
#[derive(Debug, Clone)]
pub struct PaymentSession {
    order_id: i64,
    target: Decimal,
    mode: PaymentMode,
    tally: CashTally,
    stage: PaymentStage,
}

impl PaymentSession {
    /// Start paying `order`; its tax-inclusive total is the target
    pub fn new(order: &Order, mode: PaymentMode) -> PosResult<Self> {
        if order.paid {
            return Err(PosError::OrderAlreadyPaid(order.id));
        }
        if order.is_empty() {
            return Err(PosError::OrderEmpty(order.id));
        }
        let target = round_cents(require_amount(order.total_with_tax, "order total")?);

        tracing::debug!(order_id = order.id, target = %target, ?mode, "Payment started");
        Ok(Self {
            order_id: order.id,
            target,
            mode,
            tally: CashTally::new(),
            stage: PaymentStage::Tendering,
        })
    }

    pub fn order_id(&self) -> i64 {
        self.order_id
    }

    pub fn target(&self) -> f64 {
        to_f64(self.target)
    }

    pub fn mode(&self) -> PaymentMode {
        self.mode
    }

    pub fn stage(&self) -> &PaymentStage {
        &self.stage
    }

    pub fn tally(&self) -> &CashTally {
        &self.tally
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.stage {
            PaymentStage::Completed(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.stage, PaymentStage::Completed(_))
    }

    fn require_tendering(&self, action: &str) -> PosResult<()> {
        match self.stage {
            PaymentStage::Tendering => Ok(()),
            _ => Err(PosError::InvalidStage(format!(
                "cannot {action} in stage {:?}",
                self.stage
            ))),
        }
    }

    /// Switch between cash, card and mixed while still tendering
    pub fn set_mode(&mut self, mode: PaymentMode) -> PosResult<()> {
        self.require_tendering("change payment mode")?;
        self.mode = mode;
        Ok(())
    }

    /// Mutable access to the cash tally while tendering
    pub fn tally_mut(&mut self) -> PosResult<&mut CashTally> {
        self.require_tendering("count cash")?;
        Ok(&mut self.tally)
    }

    pub fn add(&mut self, denomination: Denomination) -> PosResult<()> {
        self.tally_mut()?.add(denomination);
        Ok(())
    }

    pub fn remove(&mut self, denomination: Denomination) -> PosResult<()> {
        self.tally_mut()?.remove(denomination);
        Ok(())
    }

    pub fn set(&mut self, denomination: Denomination, count: u32) -> PosResult<()> {
        self.tally_mut()?.set(denomination, count);
        Ok(())
    }

    pub fn reset(&mut self) -> PosResult<()> {
        self.tally_mut()?.reset();
        Ok(())
    }

    pub fn cash_total(&self) -> f64 {
        self.tally.total()
    }

    /// Cash tendered minus the target; negative while underpaid
    pub fn change(&self) -> f64 {
        to_f64_floor(self.tally.total_decimal() - self.target)
    }

    /// Whether [`confirm`](Self::confirm) would succeed right now
    pub fn can_confirm(&self) -> bool {
        if self.stage != PaymentStage::Tendering {
            return false;
        }
        let cash = self.tally.total_decimal();
        match self.mode {
            PaymentMode::Cash => cash >= self.target,
            PaymentMode::Mixed => {
                let (cash, card) = split_mixed(self.target, cash);
                validate_split(self.target, cash, card).is_ok()
            }
            PaymentMode::Card => true,
        }
    }

    /// Confirm the tendered amounts
    ///
    /// Cash completes immediately; card and mixed move on to the card step.
    pub fn confirm(&mut self) -> PosResult<&PaymentStage> {
        self.require_tendering("confirm")?;
        let tendered = self.tally.total_decimal();

        self.stage = match self.mode {
            PaymentMode::Cash => {
                if tendered < self.target {
                    return Err(PosError::InsufficientCash {
                        tendered: to_f64(tendered),
                        target: to_f64(self.target),
                    });
                }
                let settlement = Settlement {
                    order_id: self.order_id,
                    mode: self.mode,
                    cash: to_f64(self.target),
                    card: 0.0,
                    tendered: to_f64(tendered),
                    change: self.change(),
                };
                tracing::info!(
                    order_id = self.order_id,
                    cash = settlement.cash,
                    change = settlement.change,
                    "Cash payment settled"
                );
                PaymentStage::Completed(settlement)
            }
            PaymentMode::Mixed => {
                let (cash, card) = split_mixed(self.target, tendered);
                validate_split(self.target, cash, card)?;
                PaymentStage::AwaitingCard {
                    cash: to_f64(cash),
                    card: to_f64(card),
                }
            }
            PaymentMode::Card => PaymentStage::AwaitingCard {
                cash: 0.0,
                card: to_f64(self.target),
            },
        };
        Ok(&self.stage)
    }

    /// The card terminal approved the card part
    pub fn approve_card(&mut self) -> PosResult<Settlement> {
        let PaymentStage::AwaitingCard { cash, card } = self.stage else {
            return Err(PosError::InvalidStage(
                "no card payment is pending".to_string(),
            ));
        };
        let settlement = Settlement {
            order_id: self.order_id,
            mode: self.mode,
            cash,
            card,
            tendered: cash,
            change: 0.0,
        };
        tracing::info!(order_id = self.order_id, cash, card, "Card payment approved");
        self.stage = PaymentStage::Completed(settlement);
        Ok(settlement)
    }

    /// The card was declined; back to tendering with the tally intact
    pub fn decline_card(&mut self) -> PosResult<()> {
        if !matches!(self.stage, PaymentStage::AwaitingCard { .. }) {
            return Err(PosError::InvalidStage(
                "no card payment is pending".to_string(),
            ));
        }
        tracing::warn!(order_id = self.order_id, "Card payment declined");
        self.stage = PaymentStage::Tendering;
        Ok(())
    }
}
