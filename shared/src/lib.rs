//! Shared types for Bistro
//!
//! Wire models, the unified error system and the live-channel frame codec
//! used by both the REST client and the point-of-sale workflows.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{Frame, NotificationLevel, NotificationPayload};
pub use models::{Invoice, Order, OrderItem, OrderStatus, TableMap, TableMapEntry};
