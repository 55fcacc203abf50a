//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item id used for lines that exist only locally and have not been
/// persisted yet
pub const UNSAVED_ITEM_ID: i64 = 0;

/// Order status
///
/// `Pending → InProgress → Completed → Finished`. `Finished` is terminal and
/// is only reached by settling the order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Finished,
}

impl OrderStatus {
    /// Statuses an operator may pick by hand
    pub const MANUAL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
    ];

    /// The status that follows this one in the kitchen flow
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Whether a manual status change from `self` to `target` is allowed
    pub fn can_change_to(self, target: Self) -> bool {
        !self.is_terminal() && Self::MANUAL.contains(&target)
    }

    /// Status after the order has been settled
    pub fn after_payment(self) -> Self {
        match self {
            Self::Completed => Self::Finished,
            other => other,
        }
    }
}

/// Reference to the menu item (product) an order line was created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRef {
    pub id: i64,
    pub name: String,
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Persisted id, [`UNSAVED_ITEM_ID`] for local lines
    pub id: i64,
    pub menu_item: MenuItemRef,
    pub quantity: u32,
    /// Unit price without tax
    pub price: f64,
    /// Tax rate in percent (e.g. 10 = 10%)
    pub tax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl OrderItem {
    /// Note with surrounding whitespace removed; blank notes count as none
    pub fn normalized_note(&self) -> Option<&str> {
        normalize_note(self.note.as_deref())
    }

    /// Whether this line stands for the given menu item and note
    pub fn matches(&self, menu_item_id: i64, note: Option<&str>) -> bool {
        self.menu_item.id == menu_item_id && self.normalized_note() == normalize_note(note)
    }

    /// Whether this line and `other` would merge into a single line
    pub fn same_line_as(&self, other: &OrderItem) -> bool {
        self.matches(other.menu_item.id, other.note.as_deref())
    }
}

/// Trim a note and treat blank text as no note
pub fn normalize_note(note: Option<&str>) -> Option<&str> {
    note.map(str::trim).filter(|n| !n.is_empty())
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub table_id: Option<i64>,
    #[serde(default)]
    pub total_with_tax: f64,
    #[serde(default)]
    pub total_without_tax: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// New, empty order for a table (id 0 until the backend assigns one)
    pub fn new(table_id: Option<i64>) -> Self {
        Self {
            id: 0,
            items: Vec::new(),
            table_id,
            total_with_tax: 0.0,
            total_without_tax: 0.0,
            status: OrderStatus::Pending,
            paid: false,
            created_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn item(&self, item_id: i64) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Whether the order is still open for edits and payment
    pub fn is_open(&self) -> bool {
        !self.paid && !self.status.is_terminal()
    }
}
