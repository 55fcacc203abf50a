use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Order;

// ==================== Notification Level ====================

/// Severity of an operator-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Notice category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    System,
    Network,
    /// Orders, payments, floor map
    Business,
}

/// Notice shown to the operator (toast / modal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    pub category: NotificationCategory,
}

impl NotificationPayload {
    fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level,
            category: NotificationCategory::Business,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, message)
    }

    pub fn with_category(mut self, category: NotificationCategory) -> Self {
        self.category = category;
        self
    }
}

// ==================== Live order channel ====================

/// Body sent to [`super::SUBSCRIBE_DESTINATION`] after subscribing, asking
/// the backend to start pushing order updates to this session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionIntent {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

impl SubscriptionIntent {
    pub fn orders(client_name: Option<String>) -> Self {
        Self {
            topic: super::ORDER_TOPIC.to_string(),
            client_name,
        }
    }
}

/// Body of a MESSAGE frame on [`super::ORDER_TOPIC`]: the full order as the
/// backend last saved it
pub type OrderUpdate = Order;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_constructors() {
        let n = NotificationPayload::success("Payment", "Order 4 paid");
        assert_eq!(n.level, NotificationLevel::Success);
        assert_eq!(n.category, NotificationCategory::Business);

        let n = NotificationPayload::error("Network", "offline")
            .with_category(NotificationCategory::Network);
        assert_eq!(n.category, NotificationCategory::Network);
        assert_eq!(n.level.to_string(), "error");
    }

    #[test]
    fn test_subscription_intent_body() {
        let intent = SubscriptionIntent::orders(None);
        let json = serde_json::to_string(&intent).unwrap();
        assert_eq!(json, r#"{"topic":"/topic/orders"}"#);
    }
}
