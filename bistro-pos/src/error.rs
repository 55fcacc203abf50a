//! Workflow errors

use bistro_client::ClientError;
use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

/// Errors raised by the till workflows
#[derive(Debug, Error)]
pub enum PosError {
    #[error("Order {0} is already paid")]
    OrderAlreadyPaid(i64),

    #[error("Order {0} is finished")]
    OrderFinished(i64),

    #[error("Order {0} has no items")]
    OrderEmpty(i64),

    #[error("Cannot change status from {from:?} to {to:?}")]
    InvalidStatusChange { from: OrderStatus, to: OrderStatus },

    #[error("Order item not found: {0}")]
    ItemNotFound(usize),

    #[error("Product {0} is not available")]
    ProductUnavailable(i64),

    #[error("Cannot merge: {0}")]
    MergeInvalid(String),

    #[error("Cannot split: {0}")]
    SplitInvalid(String),

    #[error("Cash tendered {tendered:.2} does not cover {target:.2}")]
    InsufficientCash { tendered: f64, target: f64 },

    #[error("Split cash {cash:.2} + card {card:.2} does not settle {target:.2}")]
    SplitMismatch { cash: f64, card: f64, target: f64 },

    #[error("Card payment for order {0} was declined")]
    CardDeclined(i64),

    #[error("Invalid payment step: {0}")]
    InvalidStage(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Floor map entry not found: {0}")]
    EntryNotFound(i64),

    #[error("Table {0} is already on the floor map")]
    TableAlreadyPlaced(i64),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<PosError> for AppError {
    fn from(err: PosError) -> Self {
        let err = match err {
            PosError::Client(client) => return client.into(),
            other => other,
        };
        let code = match &err {
            PosError::OrderAlreadyPaid(_) => ErrorCode::OrderAlreadyPaid,
            PosError::OrderFinished(_) => ErrorCode::OrderAlreadyFinished,
            PosError::OrderEmpty(_) => ErrorCode::OrderEmpty,
            PosError::InvalidStatusChange { .. } => ErrorCode::OrderInvalidStatus,
            PosError::ItemNotFound(_) => ErrorCode::OrderItemNotFound,
            PosError::ProductUnavailable(_) => ErrorCode::ProductUnavailable,
            PosError::MergeInvalid(_) => ErrorCode::OrderMergeInvalid,
            PosError::SplitInvalid(_) => ErrorCode::OrderSplitInvalid,
            PosError::InsufficientCash { .. } => ErrorCode::PaymentInsufficientAmount,
            PosError::SplitMismatch { .. } => ErrorCode::PaymentSplitMismatch,
            PosError::CardDeclined(_) => ErrorCode::PaymentCardDeclined,
            PosError::InvalidStage(_) => ErrorCode::PaymentInvalidStage,
            PosError::InvalidAmount(_) => ErrorCode::ValueOutOfRange,
            PosError::EntryNotFound(_) => ErrorCode::TableMapEntryNotFound,
            PosError::TableAlreadyPlaced(_) => ErrorCode::AlreadyExists,
            PosError::InvalidDimension(_) => ErrorCode::TableMapInvalidDimension,
            PosError::Template(_) => ErrorCode::InternalError,
            PosError::Client(_) => ErrorCode::Unknown,
        };
        AppError::with_message(code, err.to_string())
    }
}

pub type PosResult<T> = Result<T, PosError>;
