//! Floor map editing
//!
//! [`TableMapEditor`] mutates a local copy of the map; [`layout`] holds the
//! drag bounds and viewport scaling math.

pub mod editor;
pub mod layout;

pub use editor::TableMapEditor;
pub use layout::{DragBounds, scale_factor, scaled_map, to_design};
