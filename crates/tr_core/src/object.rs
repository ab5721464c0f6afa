//! Drawable leaf: a source crop, a screen placement and an optional texture.

use std::sync::Arc;

use crate::rect::Rect;

/// Stable handle for a texture owned by the renderer's cache. The key is the
/// asset path the texture was loaded from.
pub type TextureKey = Arc<str>;

/// Loads an image file into a renderer-owned texture.
pub trait TextureLoader {
    fn load_texture(&mut self, path: &str) -> Result<TextureKey, String>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    src: Rect,
    dest: Rect,
    texture: Option<TextureKey>,
}

impl Object {
    pub fn new(src: Rect, dest: Rect, texture: Option<TextureKey>) -> Self {
        Self { src, dest, texture }
    }

    pub fn set_src(&mut self, src: Rect) {
        self.src = src;
    }

    pub fn set_dest(&mut self, dest: Rect) {
        self.dest = dest;
    }

    pub fn src(&self) -> Rect {
        self.src
    }

    pub fn dest(&self) -> Rect {
        self.dest
    }

    pub fn texture(&self) -> Option<&TextureKey> {
        self.texture.as_ref()
    }

    /// Load `path` through `loader` and use it as this object's texture.
    ///
    /// A failed load is logged and leaves the object without a texture; the
    /// renderer skips untextured objects.
    pub fn set_image(&mut self, path: &str, loader: &mut dyn TextureLoader) {
        self.texture = load_texture_or_log(loader, path);
    }
}

/// Load `path`, logging and swallowing any failure.
pub fn load_texture_or_log(loader: &mut dyn TextureLoader, path: &str) -> Option<TextureKey> {
    match loader.load_texture(path) {
        Ok(key) => Some(key),
        Err(err) => {
            log::error!("Image load failed for '{}': {}", path, err);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Loader that accepts only the paths it was built with.
    pub(crate) struct FakeLoader {
        known: HashSet<String>,
        pub calls: usize,
    }

    impl FakeLoader {
        pub(crate) fn with(paths: &[&str]) -> Self {
            Self {
                known: paths.iter().map(|p| p.to_string()).collect(),
                calls: 0,
            }
        }
    }

    impl TextureLoader for FakeLoader {
        fn load_texture(&mut self, path: &str) -> Result<TextureKey, String> {
            self.calls += 1;
            if self.known.contains(path) {
                Ok(Arc::from(path))
            } else {
                Err(format!("no such file '{}'", path))
            }
        }
    }

    #[test]
    fn setters_round_trip_through_getters() {
        let mut obj = Object::default();
        obj.set_src(Rect::new(32, 64, 32, 32));
        obj.set_dest(Rect::new(100, 200, 64, 64));
        assert_eq!(obj.src(), Rect::new(32, 64, 32, 32));
        assert_eq!(obj.dest(), Rect::new(100, 200, 64, 64));
        assert!(obj.texture().is_none());
    }

    #[test]
    fn set_image_stores_loaded_texture() {
        let mut loader = FakeLoader::with(&["assets/textures/player.png"]);
        let mut obj = Object::default();
        obj.set_image("assets/textures/player.png", &mut loader);
        assert_eq!(
            obj.texture().map(|k| k.as_ref()),
            Some("assets/textures/player.png")
        );
        assert_eq!(loader.calls, 1);
    }

    #[test]
    fn set_image_failure_is_swallowed_and_clears_texture() {
        let mut loader = FakeLoader::with(&["good.png"]);
        let mut obj = Object::default();
        obj.set_image("good.png", &mut loader);
        obj.set_image("missing.png", &mut loader);
        assert!(obj.texture().is_none());
    }

    #[test]
    fn load_texture_or_log_maps_failure_to_none() {
        let mut loader = FakeLoader::with(&["assets/textures/font.png"]);
        assert_eq!(
            load_texture_or_log(&mut loader, "assets/textures/font.png").as_deref(),
            Some("assets/textures/font.png")
        );
        assert_eq!(load_texture_or_log(&mut loader, "nope.png"), None);
        assert_eq!(loader.calls, 2);
    }
}
