//! Grid collision against the tile map.
//!
//! Every non-empty map tile is a solid cell of `cell_size` pixels, with cell
//! (0, 0) at pixel (0, 0). Cells outside the map are open, so an actor can
//! walk off the edge of the map.

use std::collections::HashSet;

use crate::rect::Rect;
use crate::tilemap::TileMap;

#[derive(Debug, Clone)]
pub struct CollisionGrid {
    pub cell_size: i32,
    pub width: i32,
    pub height: i32,
    solids: HashSet<(i32, i32)>,
}

impl CollisionGrid {
    pub fn from_map(map: &TileMap, cell_size: i32) -> Self {
        let solids = map.occupied().map(|(x, y, _)| (x, y)).collect();
        Self {
            cell_size: cell_size.max(1),
            width: map.width,
            height: map.height,
            solids,
        }
    }

    pub fn is_solid(&self, cx: i32, cy: i32) -> bool {
        if cx < 0 || cx >= self.width || cy < 0 || cy >= self.height {
            return false;
        }
        self.solids.contains(&(cx, cy))
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// True when `rect` overlaps any solid cell.
    pub fn overlaps_solid(&self, rect: &Rect) -> bool {
        if rect.is_empty() {
            return false;
        }
        let (x0, x1) = self.cell_span(rect.x, rect.right());
        let (y0, y1) = self.cell_span(rect.y, rect.bottom());
        (y0..=y1).any(|cy| (x0..=x1).any(|cx| self.is_solid(cx, cy)))
    }

    /// Would `rect` hit the map after moving `dx` pixels horizontally?
    pub fn map_collision(&self, rect: &Rect, dx: i32) -> bool {
        self.overlaps_solid(&rect.translated(dx, 0))
    }

    /// Cells covered by the half-open pixel span `[start, end)`.
    fn cell_span(&self, start: i32, end: i32) -> (i32, i32) {
        let first = start.div_euclid(self.cell_size);
        let last = (end - 1).max(start).div_euclid(self.cell_size);
        (first, last)
    }
}
