//! Arena bounds, occupancy queries and food placement.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Position;

/// Walls sit on `x = ±half_width` and `y = ±half_height`; the playable
/// interior is strictly inside them.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GridBounds {
    pub half_width: i32,
    pub half_height: i32,
}

impl GridBounds {
    pub fn min_x(&self) -> i32 {
        1i32.saturating_sub(self.half_width)
    }

    pub fn max_x(&self) -> i32 {
        self.half_width.saturating_sub(1)
    }

    pub fn min_y(&self) -> i32 {
        1i32.saturating_sub(self.half_height)
    }

    pub fn max_y(&self) -> i32 {
        self.half_height.saturating_sub(1)
    }

    /// Width of the playable interior in cells.
    pub fn width(&self) -> i32 {
        span(self.min_x(), self.max_x())
    }

    /// Height of the playable interior in cells.
    pub fn height(&self) -> i32 {
        span(self.min_y(), self.max_y())
    }

    /// Interior cells, saturating at `usize::MAX`.
    pub fn cell_count(&self) -> usize {
        (self.width() as usize).saturating_mul(self.height() as usize)
    }

    /// True if `pos` lies in the playable interior.
    pub fn contains(&self, pos: Position) -> bool {
        (self.min_x()..=self.max_x()).contains(&pos.x)
            && (self.min_y()..=self.max_y()).contains(&pos.y)
    }

    /// Every cell of the surrounding wall ring, corners included.
    pub fn wall_cells(&self) -> Vec<Position> {
        let (w, h) = (self.half_width.max(0), self.half_height.max(0));
        let ring = (self.width() as usize)
            .saturating_add(2)
            .saturating_add(self.height() as usize)
            .saturating_mul(2);
        let mut cells = Vec::with_capacity(ring);
        for x in -w..=w {
            cells.push(Position::new(x, -h));
            cells.push(Position::new(x, h));
        }
        for y in (-h + 1)..h {
            cells.push(Position::new(-w, y));
            cells.push(Position::new(w, y));
        }
        cells
    }
}

/// Inclusive cell count between `min` and `max`, zero when empty.
fn span(min: i32, max: i32) -> i32 {
    let cells = i64::from(max) - i64::from(min) + 1;
    cells.clamp(0, i64::from(i32::MAX)) as i32
}

/// Returns true if any snake segment sits on `(x, y)`.
pub fn occupies(segments: &[Position], x: i32, y: i32) -> bool {
    segments.iter().any(|s| s.x == x && s.y == y)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("no free cell left in a {width}x{height} arena")]
    GridFull { width: i32, height: i32 },
}

/// Picks a free interior cell for food.
///
/// Starts from a random cell and scans forward in raster order (x first,
/// then the next row, wrapping at the bounds). The scan visits each interior
/// cell at most once.
pub fn place_food<R, F>(
    rng: &mut R,
    bounds: &GridBounds,
    is_blocked: F,
) -> Result<Position, PlacementError>
where
    R: Rng,
    F: Fn(Position) -> bool,
{
    let full = PlacementError::GridFull {
        width: bounds.width(),
        height: bounds.height(),
    };
    if bounds.cell_count() == 0 {
        return Err(full);
    }

    let mut pos = Position {
        x: rng.random_range(bounds.min_x()..=bounds.max_x()),
        y: rng.random_range(bounds.min_y()..=bounds.max_y()),
    };

    for _ in 0..bounds.cell_count() {
        if !is_blocked(pos) {
            return Ok(pos);
        }
        pos.x += 1;
        if pos.x > bounds.max_x() {
            pos.x = bounds.min_x();
            pos.y += 1;
            if pos.y > bounds.max_y() {
                pos.y = bounds.min_y();
            }
        }
    }

    Err(full)
}
