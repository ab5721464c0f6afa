//! Fixed-grid bitmap font.
//!
//! The font sheet is an ASCII grid: glyph `first_char` sits in the top-left
//! cell and following characters run left to right, `columns` per row.

use tr_core::{Rect, TextureKey};

use crate::batch::SpriteBatch;

#[derive(Debug, Clone)]
pub struct BitmapFont {
    pub texture: Option<TextureKey>,
    pub glyph_w: i32,
    pub glyph_h: i32,
    pub columns: i32,
    pub first_char: char,
    pub glyph_count: i32,
    /// Integer scale applied to every glyph on screen.
    pub scale: i32,
}

impl BitmapFont {
    pub fn new(
        texture: Option<TextureKey>,
        glyph_w: i32,
        glyph_h: i32,
        columns: i32,
        glyph_count: i32,
    ) -> Self {
        Self {
            texture,
            glyph_w,
            glyph_h,
            columns: columns.max(1),
            first_char: ' ',
            glyph_count,
            scale: 1,
        }
    }

    pub fn glyph_src(&self, c: char) -> Option<Rect> {
        let index = (c as u32).checked_sub(self.first_char as u32)? as i32;
        if index >= self.glyph_count {
            return None;
        }
        let col = index % self.columns;
        let row = index / self.columns;
        Some(Rect::new(
            col * self.glyph_w,
            row * self.glyph_h,
            self.glyph_w,
            self.glyph_h,
        ))
    }

    /// Lay `msg` out starting at (`x`, `y`) and return `(src, dest)` pairs.
    /// Characters with no glyph still advance the pen.
    pub fn layout(&self, msg: &str, x: i32, y: i32) -> Vec<(Rect, Rect)> {
        let advance_x = self.glyph_w * self.scale;
        let advance_y = self.glyph_h * self.scale;
        let mut pen_x = x;
        let mut pen_y = y;
        let mut quads = Vec::with_capacity(msg.len());

        for c in msg.chars() {
            if c == '\n' {
                pen_x = x;
                pen_y += advance_y;
                continue;
            }
            if c != ' ' {
                if let Some(src) = self.glyph_src(c) {
                    quads.push((src, Rect::new(pen_x, pen_y, advance_x, advance_y)));
                }
            }
            pen_x += advance_x;
        }
        quads
    }

    /// Queue `msg` into `batch`, tinted with the given colour. Does nothing
    /// when the font texture failed to load.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_msg(
        &self,
        batch: &mut SpriteBatch,
        texture_size: (u32, u32),
        msg: &str,
        x: i32,
        y: i32,
        r: u8,
        g: u8,
        b: u8,
    ) {
        let Some(texture) = &self.texture else {
            return;
        };
        let color = [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        ];
        for (src, dest) in self.layout(msg, x, y) {
            batch.push(texture, texture_size, src, dest, color);
        }
    }
}
