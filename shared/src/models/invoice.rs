//! Invoice Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment record that closes an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub date: DateTime<Utc>,
    pub paid_with_card: f64,
    pub paid_with_cash: f64,
    pub order_id: i64,
}

impl Invoice {
    /// Amount settled across both tenders
    pub fn total(&self) -> f64 {
        self.paid_with_card + self.paid_with_cash
    }
}
