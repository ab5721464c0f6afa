//! CPU-side sprite mesh.
//!
//! Every draw is a rectangle pair: a crop inside a texture (`src`, texels) and
//! a placement on screen (`dest`, pixels). The batch turns each pair into one
//! quad and groups consecutive quads that share a texture into a single
//! `DrawCall`, so a tile map cut from one sheet costs one indexed draw.

use tr_core::{Rect, TextureKey};

use crate::vertex::SpriteVertex;

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: TextureKey,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Queue `src` of a `texture_size` texture to be drawn at `dest`.
    /// Returns false (and queues nothing) for empty rects or textures.
    pub fn push(
        &mut self,
        texture_key: &TextureKey,
        texture_size: (u32, u32),
        src: Rect,
        dest: Rect,
        color: [f32; 4],
    ) -> bool {
        if src.is_empty() || dest.is_empty() || texture_size.0 == 0 || texture_size.1 == 0 {
            return false;
        }

        let tex_w = texture_size.0 as f32;
        let tex_h = texture_size.1 as f32;
        let u0 = src.x as f32 / tex_w;
        let v0 = src.y as f32 / tex_h;
        let u1 = src.right() as f32 / tex_w;
        let v1 = src.bottom() as f32 / tex_h;

        let left = dest.x as f32;
        let top = dest.y as f32;
        let right = dest.right() as f32;
        let bottom = dest.bottom() as f32;

        let base_index = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            SpriteVertex::new([left, top], [u0, v0], color),
            SpriteVertex::new([right, top], [u1, v0], color),
            SpriteVertex::new([right, bottom], [u1, v1], color),
            SpriteVertex::new([left, bottom], [u0, v1], color),
        ]);

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
        self.push_draw_call(texture_key, draw_start, 6);
        true
    }

    /// Number of texture bind switches the draw list needs.
    pub fn texture_binds(&self) -> usize {
        let mut binds = 0usize;
        let mut current: Option<&str> = None;
        for draw in &self.draw_calls {
            let key: &str = &draw.texture_key;
            if current != Some(key) {
                current = Some(key);
                binds += 1;
            }
        }
        binds
    }

    fn push_draw_call(&mut self, texture_key: &TextureKey, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if *last.texture_key == **texture_key && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_key: texture_key.clone(),
            index_start,
            index_count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(name: &str) -> TextureKey {
        Arc::from(name)
    }

    #[test]
    fn push_maps_rect_pair_to_quad() {
        let mut batch = SpriteBatch::new();
        let sheet = key("sheet.png");
        assert!(batch.push(
            &sheet,
            (128, 64),
            Rect::new(32, 32, 32, 32),
            Rect::new(100, 200, 64, 64),
            WHITE,
        ));

        assert_eq!(batch.quad_count(), 1);
        let v = &batch.vertices;
        assert_eq!(v[0].position, [100.0, 200.0]);
        assert_eq!(v[2].position, [164.0, 264.0]);
        assert_eq!(v[0].tex_coords, [0.25, 0.5]);
        assert_eq!(v[2].tex_coords, [0.5, 1.0]);
        assert_eq!(batch.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn same_texture_quads_merge_into_one_draw() {
        let mut batch = SpriteBatch::new();
        let tiles = key("tiles.png");
        for i in 0..5 {
            batch.push(
                &tiles,
                (64, 64),
                Rect::new(0, 0, 32, 32),
                Rect::new(i * 32, 0, 32, 32),
                WHITE,
            );
        }
        assert_eq!(batch.draw_calls.len(), 1);
        assert_eq!(batch.draw_calls[0].index_count, 30);
        assert_eq!(batch.texture_binds(), 1);
    }

    #[test]
    fn texture_change_starts_new_draw() {
        let mut batch = SpriteBatch::new();
        let tiles = key("tiles.png");
        let player = key("player.png");
        let rect = Rect::new(0, 0, 16, 16);
        batch.push(&tiles, (16, 16), rect, rect, WHITE);
        batch.push(&player, (16, 16), rect, rect, WHITE);
        batch.push(&tiles, (16, 16), rect, rect, WHITE);
        assert_eq!(batch.draw_calls.len(), 3);
        assert_eq!(batch.draw_calls[1].index_start, 6);
        assert_eq!(batch.texture_binds(), 3);
    }

    #[test]
    fn empty_inputs_are_skipped() {
        let mut batch = SpriteBatch::new();
        let tex = key("a.png");
        let rect = Rect::new(0, 0, 8, 8);
        assert!(!batch.push(&tex, (0, 8), rect, rect, WHITE));
        assert!(!batch.push(&tex, (8, 8), Rect::new(0, 0, 0, 8), rect, WHITE));
        assert!(!batch.push(&tex, (8, 8), rect, Rect::new(0, 0, 8, -1), WHITE));
        assert!(batch.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut batch = SpriteBatch::new();
        let tex = key("a.png");
        let rect = Rect::new(0, 0, 8, 8);
        batch.push(&tex, (8, 8), rect, rect, WHITE);
        batch.clear();
        assert!(batch.is_empty());
        assert!(batch.draw_calls.is_empty());
        assert_eq!(batch.quad_count(), 0);
    }
}
