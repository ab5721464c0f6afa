//! Owned GPU textures keyed by asset path.
//!
//! The cache is the single owner of every texture and bind group; game objects
//! only hold `TextureKey`s. Dropping the cache releases all GPU memory.

use std::collections::HashMap;
use std::sync::Arc;

use tr_core::{TextureKey, TextureLoader};

use crate::gpu_context::GpuContext;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::Texture;

/// Path-keyed table that loads each entry at most once. Repeated requests for
/// a loaded path hand back the same shared key. Failed loads are not stored,
/// so a later request retries.
pub struct KeyedStore<T> {
    entries: HashMap<TextureKey, T>,
}

impl<T> Default for KeyedStore<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> KeyedStore<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Key for `path`, calling `load` only when the path is not stored yet.
    pub fn get_or_try_load(
        &mut self,
        path: &str,
        load: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<TextureKey, String> {
        if let Some((key, _)) = self.entries.get_key_value(path) {
            return Ok(key.clone());
        }
        let value = load(path)?;
        let key: TextureKey = Arc::from(path);
        self.entries.insert(key.clone(), value);
        Ok(key)
    }
}

struct GpuSpriteTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

#[derive(Default)]
pub struct TextureCache {
    textures: KeyedStore<GpuSpriteTexture>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_group(&self, key: &str) -> Option<&wgpu::BindGroup> {
        self.textures.get(key).map(|t| &t.bind_group)
    }

    pub fn size(&self, key: &str) -> Option<(u32, u32)> {
        self.textures.get(key).map(|t| t.texture.size)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn memory_estimate_mb(&self) -> f32 {
        let bytes: usize = self.textures.values().map(|t| t.texture.byte_size()).sum();
        bytes as f32 / (1024.0 * 1024.0)
    }

    /// A `TextureLoader` that uploads into this cache.
    pub fn loader<'a>(
        &'a mut self,
        gpu: &'a GpuContext,
        pipeline: &'a SpritePipeline,
    ) -> CacheLoader<'a> {
        CacheLoader {
            cache: self,
            gpu,
            pipeline,
        }
    }
}

pub struct CacheLoader<'a> {
    cache: &'a mut TextureCache,
    gpu: &'a GpuContext,
    pipeline: &'a SpritePipeline,
}

impl TextureLoader for CacheLoader<'_> {
    fn load_texture(&mut self, path: &str) -> Result<TextureKey, String> {
        let gpu = self.gpu;
        let pipeline = self.pipeline;
        self.cache.textures.get_or_try_load(path, |path| {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("Failed to read texture '{}': {e}", path))?;
            let texture = Texture::from_bytes(&gpu.device, &gpu.queue, &bytes, path)
                .map_err(|e| e.to_string())?;
            log::info!(
                "Loaded texture '{}' ({}x{})",
                path,
                texture.size.0,
                texture.size.1
            );
            let bind_group = pipeline.create_texture_bind_group(&gpu.device, &texture);
            Ok(GpuSpriteTexture {
                texture,
                bind_group,
            })
        })
    }
}
