//! Floor map editor
//!
//! Entries added locally get negative placeholder ids until the map is saved
//! and reloaded.

use shared::models::{Position, Table, TableMap, TableMapEntry, TableShape};

use super::layout::DragBounds;
use crate::error::{PosError, PosResult};

const DEFAULT_SIZE: f64 = 80.0;
const DEFAULT_COLOR: &str = "#a1887f";

#[derive(Debug, Clone)]
pub struct TableMapEditor {
    map: TableMap,
    saved: TableMap,
    next_placeholder_id: i64,
}

fn require_size(value: f64, what: &str) -> PosResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PosError::InvalidDimension(format!(
            "{what} must be positive, got {value}"
        )))
    }
}

fn require_gap(value: f64, what: &str) -> PosResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PosError::InvalidDimension(format!(
            "{what} must be non-negative, got {value}"
        )))
    }
}

/// Square and circle keep width and height equal
fn constrained(shape: TableShape) -> bool {
    matches!(shape, TableShape::Square | TableShape::Circle)
}

impl TableMapEditor {
    pub fn new(map: TableMap) -> Self {
        Self {
            saved: map.clone(),
            map,
            next_placeholder_id: -1,
        }
    }

    pub fn map(&self) -> &TableMap {
        &self.map
    }

    pub fn is_dirty(&self) -> bool {
        self.map != self.saved
    }

    /// Record `map` (as returned by the backend) as the saved state
    pub fn mark_saved(&mut self, map: TableMap) {
        self.saved = map.clone();
        self.map = map;
    }

    /// Drop local edits
    pub fn revert(&mut self) {
        self.map = self.saved.clone();
    }

    fn entry_mut(&mut self, id: i64) -> PosResult<&mut TableMapEntry> {
        self.map
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(PosError::EntryNotFound(id))
    }

    fn top_z(&self, except: Option<i64>) -> Option<i32> {
        self.map
            .entries
            .iter()
            .filter(|e| Some(e.id) != except)
            .map(|e| e.position.z)
            .max()
    }

    /// Place `table` at the origin, above everything else
    pub fn add_table(&mut self, table: Table) -> PosResult<i64> {
        if self.map.entry_for_table(table.id).is_some() {
            return Err(PosError::TableAlreadyPlaced(table.id));
        }
        let id = self.next_placeholder_id;
        self.next_placeholder_id -= 1;
        let z = self.top_z(None).map_or(0, |z| z + 1);

        tracing::debug!(entry_id = id, table_number = table.number, "Table placed");
        self.map.entries.push(TableMapEntry {
            id,
            shape: TableShape::Rect,
            color: DEFAULT_COLOR.to_string(),
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            gap_x: 0.0,
            gap_y: 0.0,
            position: Position { x: 0.0, y: 0.0, z },
            table,
        });
        Ok(id)
    }

    pub fn remove(&mut self, id: i64) -> PosResult<TableMapEntry> {
        let index = self
            .map
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(PosError::EntryNotFound(id))?;
        Ok(self.map.entries.remove(index))
    }

    /// Put an entry above all others
    pub fn bring_to_front(&mut self, id: i64) -> PosResult<i32> {
        let z = self.top_z(Some(id)).map_or(0, |z| z + 1);
        let entry = self.entry_mut(id)?;
        entry.position.z = z;
        Ok(z)
    }

    /// Move an entry, clamped to `bounds`; returns the position it ended up at
    pub fn drag_to(&mut self, id: i64, x: f64, y: f64, bounds: &DragBounds) -> PosResult<(f64, f64)> {
        let (x, y) = bounds.clamp(x, y);
        let entry = self.entry_mut(id)?;
        entry.position.x = x;
        entry.position.y = y;
        Ok((x, y))
    }

    pub fn set_width(&mut self, id: i64, width: f64) -> PosResult<()> {
        let width = require_size(width, "width")?;
        let entry = self.entry_mut(id)?;
        entry.width = width;
        if constrained(entry.shape) {
            entry.height = width;
        }
        Ok(())
    }

    pub fn set_height(&mut self, id: i64, height: f64) -> PosResult<()> {
        let height = require_size(height, "height")?;
        let entry = self.entry_mut(id)?;
        entry.height = height;
        if constrained(entry.shape) {
            entry.width = height;
        }
        Ok(())
    }

    /// Change the shape; squares and circles take the width as their side
    pub fn set_shape(&mut self, id: i64, shape: TableShape) -> PosResult<()> {
        let entry = self.entry_mut(id)?;
        entry.shape = shape;
        if constrained(shape) {
            entry.height = entry.width;
        }
        Ok(())
    }

    pub fn set_color(&mut self, id: i64, color: impl Into<String>) -> PosResult<()> {
        let color = color.into();
        if color.trim().is_empty() {
            return Err(PosError::InvalidDimension("color must not be empty".to_string()));
        }
        self.entry_mut(id)?.color = color;
        Ok(())
    }

    pub fn set_gap(&mut self, id: i64, gap_x: f64, gap_y: f64) -> PosResult<()> {
        let gap_x = require_gap(gap_x, "gapX")?;
        let gap_y = require_gap(gap_y, "gapY")?;
        let entry = self.entry_mut(id)?;
        entry.gap_x = gap_x;
        entry.gap_y = gap_y;
        Ok(())
    }
}
