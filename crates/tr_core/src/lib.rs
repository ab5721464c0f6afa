//! Engine-agnostic game state: rectangles, drawable objects, sprite-strip
//! animation, the text tile map, grid collision, input and the fixed-step
//! tick source. Nothing here touches the GPU.

pub mod animation;
pub mod collision;
pub mod control;
pub mod input;
pub mod object;
pub mod rect;
pub mod tilemap;
pub mod time;

pub use animation::{Animator, Cycle, CycleId, Entity};
pub use object::{load_texture_or_log, Object, TextureKey, TextureLoader};
pub use rect::Rect;
