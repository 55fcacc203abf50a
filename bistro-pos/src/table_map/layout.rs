//! Drag bounds and viewport scaling

use shared::models::{TableMap, TableMapEntry};

use crate::error::{PosError, PosResult};

/// Area a table can be dragged in
///
/// Positions are clamped per axis to `[0, container - modal - offset]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBounds {
    pub container_width: f64,
    pub container_height: f64,
    pub modal_width: f64,
    pub modal_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl DragBounds {
    pub fn new(container_width: f64, container_height: f64) -> Self {
        Self {
            container_width,
            container_height,
            modal_width: 0.0,
            modal_height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn with_modal(mut self, width: f64, height: f64) -> Self {
        self.modal_width = width;
        self.modal_height = height;
        self
    }

    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn max_x(&self) -> f64 {
        (self.container_width - self.modal_width - self.offset_x).max(0.0)
    }

    pub fn max_y(&self) -> f64 {
        (self.container_height - self.modal_height - self.offset_y).max(0.0)
    }

    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        let x = if x.is_finite() { x } else { 0.0 };
        let y = if y.is_finite() { y } else { 0.0 };
        (x.clamp(0.0, self.max_x()), y.clamp(0.0, self.max_y()))
    }
}

/// `viewport_width / design_width`
pub fn scale_factor(viewport_width: f64, design_width: f64) -> PosResult<f64> {
    if !(design_width.is_finite() && design_width > 0.0) {
        return Err(PosError::InvalidDimension(format!(
            "design width must be positive, got {design_width}"
        )));
    }
    if !(viewport_width.is_finite() && viewport_width >= 0.0) {
        return Err(PosError::InvalidDimension(format!(
            "viewport width must be non-negative, got {viewport_width}"
        )));
    }
    Ok(viewport_width / design_width)
}

/// An entry as drawn at `factor`; `z` is untouched
pub fn scaled_entry(entry: &TableMapEntry, factor: f64) -> TableMapEntry {
    let mut scaled = entry.clone();
    scaled.width *= factor;
    scaled.height *= factor;
    scaled.gap_x *= factor;
    scaled.gap_y *= factor;
    scaled.position.x *= factor;
    scaled.position.y *= factor;
    scaled
}

pub fn scaled_map(map: &TableMap, factor: f64) -> TableMap {
    TableMap {
        entries: map.entries.iter().map(|e| scaled_entry(e, factor)).collect(),
    }
}

/// Convert a point on a scaled viewport back to design coordinates
pub fn to_design(x: f64, y: f64, factor: f64) -> (f64, f64) {
    if factor > 0.0 {
        (x / factor, y / factor)
    } else {
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Position, Table, TableShape};

    #[test]
    fn test_clamp() {
        let bounds = DragBounds::new(1000.0, 600.0)
            .with_modal(300.0, 100.0)
            .with_offset(20.0, 10.0);
        assert_eq!(bounds.max_x(), 680.0);
        assert_eq!(bounds.max_y(), 490.0);
        assert_eq!(bounds.clamp(-5.0, 50.0), (0.0, 50.0));
        assert_eq!(bounds.clamp(900.0, 900.0), (680.0, 490.0));
        assert_eq!(bounds.clamp(f64::NAN, 1.0), (0.0, 1.0));
    }

    #[test]
    fn test_tiny_container_pins_to_origin() {
        let bounds = DragBounds::new(100.0, 100.0).with_modal(200.0, 200.0);
        assert_eq!(bounds.clamp(40.0, 40.0), (0.0, 0.0));
    }

    #[test]
    fn test_scaling() {
        assert_eq!(scale_factor(600.0, 1200.0).unwrap(), 0.5);
        assert!(scale_factor(600.0, 0.0).is_err());

        let entry = TableMapEntry {
            id: 1,
            shape: TableShape::Rect,
            color: "#fff".to_string(),
            width: 120.0,
            height: 80.0,
            gap_x: 10.0,
            gap_y: 4.0,
            position: Position {
                x: 200.0,
                y: 100.0,
                z: 3,
            },
            table: Table {
                id: 1,
                number: 1,
                capacity: 4,
                location: None,
            },
        };
        let map = scaled_map(
            &TableMap {
                entries: vec![entry],
            },
            0.5,
        );
        let scaled = &map.entries[0];
        assert_eq!((scaled.width, scaled.height), (60.0, 40.0));
        assert_eq!((scaled.gap_x, scaled.gap_y), (5.0, 2.0));
        assert_eq!((scaled.position.x, scaled.position.y), (100.0, 50.0));
        assert_eq!(scaled.position.z, 3);
        assert_eq!(to_design(100.0, 50.0, 0.5), (200.0, 100.0));
    }
}
