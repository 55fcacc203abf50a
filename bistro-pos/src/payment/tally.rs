//! Cash denomination tally

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{PosError, PosResult};
use crate::money::{from_cents, round_cents, to_decimal, to_f64, to_f64_floor};

/// A euro note or coin, by value in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Denomination(u32);

impl Denomination {
    /// Every accepted note and coin, largest first
    pub const ALL: [Denomination; 15] = [
        Denomination(50_000),
        Denomination(20_000),
        Denomination(10_000),
        Denomination(5_000),
        Denomination(2_000),
        Denomination(1_000),
        Denomination(500),
        Denomination(200),
        Denomination(100),
        Denomination(50),
        Denomination(20),
        Denomination(10),
        Denomination(5),
        Denomination(2),
        Denomination(1),
    ];

    pub fn from_cents(cents: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.0 == cents)
    }

    /// Look a denomination up by its face value (e.g. `0.5`)
    pub fn from_value(value: f64) -> Option<Self> {
        let cents = to_decimal(value) * Decimal::ONE_HUNDRED;
        if !cents.fract().is_zero() {
            return None;
        }
        cents.to_u32().and_then(Self::from_cents)
    }

    pub fn cents(self) -> u32 {
        self.0
    }

    pub fn value(self) -> Decimal {
        from_cents(self.0)
    }

    /// Notes are 5 euro and above
    pub fn is_note(self) -> bool {
        self.0 >= 500
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "€{}", self.value())
    }
}

/// Count of each denomination handed over by the customer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashTally {
    counts: BTreeMap<Denomination, u32>,
}

impl CashTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// One more of `denomination`
    pub fn add(&mut self, denomination: Denomination) {
        *self.counts.entry(denomination).or_insert(0) += 1;
    }

    /// One fewer of `denomination`, never below zero
    pub fn remove(&mut self, denomination: Denomination) {
        if let Some(count) = self.counts.get_mut(&denomination) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(&denomination);
            }
        }
    }

    pub fn set(&mut self, denomination: Denomination, count: u32) {
        if count == 0 {
            self.counts.remove(&denomination);
        } else {
            self.counts.insert(denomination, count);
        }
    }

    /// Set a count by face value, rejecting values that are not a euro note or coin
    pub fn set_value(&mut self, value: f64, count: u32) -> PosResult<()> {
        let denomination = Denomination::from_value(value)
            .ok_or_else(|| PosError::InvalidAmount(format!("{value} is not a denomination")))?;
        self.set(denomination, count);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Non-zero counts, largest denomination first
    pub fn entries(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        self.counts.iter().rev().map(|(d, c)| (*d, *c))
    }

    pub fn total_decimal(&self) -> Decimal {
        round_cents(
            self.counts
                .iter()
                .map(|(d, c)| d.value() * Decimal::from(*c))
                .sum(),
        )
    }

    /// Sum of value × count, rounded to cents
    pub fn total(&self) -> f64 {
        to_f64(self.total_decimal())
    }

    /// Tendered minus `target`, floored to cents; negative means underpaid
    pub fn change(&self, target: f64) -> f64 {
        to_f64_floor(self.total_decimal() - to_decimal(target))
    }

    pub fn covers(&self, target: f64) -> bool {
        self.total_decimal() >= round_cents(to_decimal(target))
    }
}
