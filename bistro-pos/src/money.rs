//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored as `f64` on the wire models. Every calculation converts
//! to `Decimal`, works there, and converts back rounded to cents.

use rust_decimal::prelude::*;
use shared::models::OrderItem;

use crate::error::{PosError, PosResult};

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum amount accepted as an order total or tender (€1,000,000)
const MAX_AMOUNT: f64 = 1_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_cents(value).to_f64().unwrap_or_default()
}

/// Convert Decimal back to f64, floored to 2 decimal places
#[inline]
pub fn to_f64_floor(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::ToNegativeInfinity)
        .to_f64()
        .unwrap_or_default()
}

#[inline]
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Integer cents as a Decimal amount
#[inline]
pub fn from_cents(cents: u32) -> Decimal {
    Decimal::new(i64::from(cents), DECIMAL_PLACES)
}

/// Whether two amounts agree within one cent
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < MONEY_TOLERANCE
}

/// Reject NaN, infinities, negatives and absurd amounts
pub fn require_amount(value: f64, field_name: &str) -> PosResult<Decimal> {
    if !value.is_finite() {
        return Err(PosError::InvalidAmount(format!(
            "{field_name} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(PosError::InvalidAmount(format!(
            "{field_name} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(PosError::InvalidAmount(format!(
            "{field_name} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(to_decimal(value))
}

/// Line total before tax
pub fn line_net(item: &OrderItem) -> Decimal {
    to_decimal(item.price) * Decimal::from(item.quantity)
}

/// Line total including tax (`tax` is a percentage)
pub fn line_gross(item: &OrderItem) -> Decimal {
    line_net(item) * (Decimal::ONE + to_decimal(item.tax) / Decimal::ONE_HUNDRED)
}

/// `(total_without_tax, total_with_tax)` for a set of lines, rounded to cents
pub fn order_totals(items: &[OrderItem]) -> (f64, f64) {
    let net: Decimal = items.iter().map(line_net).sum();
    let gross: Decimal = items.iter().map(line_gross).sum();
    (to_f64(net), to_f64(gross))
}
