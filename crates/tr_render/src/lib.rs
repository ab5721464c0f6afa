pub mod batch;
pub mod cache;
pub mod camera;
pub mod error;
pub mod gpu_context;
pub mod mesh;
pub mod sprite_pipeline;
pub mod text;
pub mod texture;
pub mod vertex;

pub use batch::{DrawCall, SpriteBatch};
pub use cache::{KeyedStore, TextureCache};
pub use camera::{Camera2D, CameraUniform};
pub use error::RenderError;
pub use gpu_context::GpuContext;
pub use mesh::SpriteMesh;
pub use sprite_pipeline::SpritePipeline;
pub use text::BitmapFont;
pub use texture::Texture;
pub use vertex::SpriteVertex;
