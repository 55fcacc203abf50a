//! Bistro POS - point-of-sale workflows for the restaurant till
//!
//! # Modules
//!
//! ```text
//! bistro-pos/src/
//! ├── payment/     # cash tally, payment session, invoice emission
//! ├── orders/      # editor, merge, split, status changes
//! ├── table_map/   # floor map editor, drag bounds, scaling
//! ├── live.rs      # order board fed by the live channel
//! ├── print.rs     # ticket / receipt / table card markup
//! ├── service.rs   # workflows against the backend
//! └── ...          # config, logging, errors, money
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod live;
pub mod logger;
pub mod money;
pub mod notify;
pub mod orders;
pub mod payment;
pub mod print;
pub mod service;
pub mod table_map;

pub use backend::Backend;
pub use config::TillConfig;
pub use error::{PosError, PosResult};
pub use live::{BoardChange, OrderBoard};
pub use logger::{init_logger, init_logger_with_file};
pub use notify::{Notifier, TracingNotifier};
pub use orders::{MoveAmount, OrderEditor, SplitSession};
pub use payment::{CashTally, Denomination, PaymentMode, PaymentSession, Settlement};
pub use print::HtmlRenderer;
pub use service::{PosService, SplitResult};
pub use table_map::{DragBounds, TableMapEditor};

pub fn print_banner() {
    println!(
        r#"
    ____  _      __
   / __ )(_)____/ /__________
  / __  / / ___/ __/ ___/ __ \
 / /_/ / (__  ) /_/ /  / /_/ /
/_____/_/____/\__/_/   \____/
    "#
    );
}
