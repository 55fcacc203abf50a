//! Floor map Model
//!
//! A floor map is the saved layout of table shapes for one dining room. It is
//! always loaded and saved as a whole.

use serde::{Deserialize, Serialize};

/// Visual shape of a table on the floor map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Rect,
    Square,
    Circle,
}

/// Position on the design canvas; `z` orders overlapping shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: i32,
}

/// Dining table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: i64,
    pub number: i32,
    pub capacity: i32,
    #[serde(default)]
    pub location: Option<String>,
}

/// One placed table on the floor map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMapEntry {
    pub id: i64,
    pub shape: TableShape,
    pub color: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub gap_x: f64,
    #[serde(default)]
    pub gap_y: f64,
    pub position: Position,
    pub table: Table,
}

/// Whole floor map, persisted in a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableMap {
    #[serde(default)]
    pub entries: Vec<TableMapEntry>,
}

impl TableMap {
    pub fn entry(&self, id: i64) -> Option<&TableMapEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entry placing the given table
    pub fn entry_for_table(&self, table_id: i64) -> Option<&TableMapEntry> {
        self.entries.iter().find(|e| e.table.id == table_id)
    }
}
