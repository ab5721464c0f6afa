//! Plain-text tile maps.
//!
//! One character per tile, one line per row:
//!
//! ```text
//! ; comment lines start with ';'
//! ..........
//! ...12.....
//! 0000000000
//! ```
//!
//! `.` and space are empty, `0`-`9` are tiles 0-9 and `a`-`z` are tiles 10-35.
//! Rows may differ in length; short rows are padded with empty tiles.

use std::fs;
use std::path::Path;

use crate::object::{Object, TextureKey};
use crate::rect::Rect;

pub const MAX_TILE_INDEX: u8 = 35;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Option<u8>>,
}

/// The sheet tiles are cut from.
#[derive(Debug, Clone)]
pub struct TileSet {
    pub texture: Option<TextureKey>,
    /// Tiles per row in the sheet.
    pub columns: i32,
    pub tile_size: i32,
}

impl TileSet {
    /// Crop of tile `index` inside the sheet (row-major).
    pub fn tile_src(&self, index: u8) -> Rect {
        let columns = self.columns.max(1);
        let index = index as i32;
        Rect::new(
            (index % columns) * self.tile_size,
            (index / columns) * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }
}

impl TileMap {
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut rows: Vec<Vec<Option<u8>>> = Vec::new();
        for (line_no, raw_line) in source.lines().enumerate() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            if line.starts_with(';') {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                row.push(parse_tile(ch).ok_or_else(|| {
                    format!(
                        "Map parse failed: unexpected character '{}' at line {}, column {}",
                        ch,
                        line_no + 1,
                        col + 1
                    )
                })?);
            }
            rows.push(row);
        }

        // Only zero-length trailing lines are dropped; a row of '.' is still a row.
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err("Map parse failed: map has no rows".to_string());
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        for mut row in rows {
            row.resize(width, None);
            tiles.extend(row);
        }

        Ok(Self {
            width: width as i32,
            height: height as i32,
            tiles,
        })
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        self.tiles[(y * self.width + x) as usize]
    }

    /// Cells holding a tile, as `(x, y, tile)`.
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.tiles.iter().enumerate().filter_map(move |(i, tile)| {
            let i = i as i32;
            tile.map(|t| (i % self.width, i / self.width, t))
        })
    }

    /// Build one background object per non-empty tile, placed on a grid of
    /// `tileset.tile_size` pixels.
    pub fn background_objects(&self, tileset: &TileSet) -> Vec<Object> {
        let size = tileset.tile_size;
        self.occupied()
            .map(|(x, y, tile)| {
                Object::new(
                    tileset.tile_src(tile),
                    Rect::new(x * size, y * size, size, size),
                    tileset.texture.clone(),
                )
            })
            .collect()
    }
}

fn parse_tile(ch: char) -> Option<Option<u8>> {
    match ch {
        '.' | ' ' => Some(None),
        '0'..='9' => Some(Some(ch as u8 - b'0')),
        'a'..='z' => Some(Some(ch as u8 - b'a' + 10)),
        _ => None,
    }
}

pub fn load_map_from_path(path: &Path) -> Result<TileMap, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read map {}: {e}", path.display()))?;
    TileMap::parse(&raw).map_err(|e| format!("{} ({})", e, path.display()))
}
