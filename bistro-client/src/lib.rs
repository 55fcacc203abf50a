//! Bistro Client - REST and live-channel client for the restaurant backend
//!
//! Thin typed wrappers over the backend's REST endpoints plus the STOMP
//! WebSocket subscription that streams order updates.

pub mod config;
pub mod error;
pub mod http;
pub mod live;

pub use config::{AssetUploadConfig, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use live::{LiveClient, LiveConfig, LiveEvent};

// Re-export shared types for convenience
pub use shared::models::{
    Invoice, InvoiceFilter, Order, OrderFilter, Product, ProductInput, TableMap, User, UserInput,
};
