//! `assets/game.json`: window, player, tileset, map and font settings.
//!
//! Every field has a default, so a partial file only overrides what it names
//! and a missing file runs the built-in level.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tr_core::Rect;

pub const GAME_CONFIG_PATH: &str = "assets/game.json";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub tileset: TilesetConfig,
    pub map: String,
    pub font: FontConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct CycleConfig {
    /// 1-based row in the sprite sheet.
    pub row: i32,
    pub frames: i32,
    /// Ticks per frame.
    pub speed: i32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub sprite_sheet: String,
    pub frame_width: i32,
    pub frame_height: i32,
    /// Initial on-screen rectangle.
    pub start: Rect,
    /// Pixels per tick.
    pub speed: i32,
    pub idle: CycleConfig,
    pub run_left: CycleConfig,
    pub run_right: CycleConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TilesetConfig {
    pub texture: String,
    pub columns: i32,
    pub tile_size: i32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub texture: String,
    pub glyph_width: i32,
    pub glyph_height: i32,
    pub columns: i32,
    pub glyph_count: i32,
    pub scale: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            player: PlayerConfig::default(),
            tileset: TilesetConfig::default(),
            map: "assets/maps/level1.txt".to_string(),
            font: FontConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tilerun".to_string(),
            width: 800,
            height: 576,
            vsync: true,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sprite_sheet: "assets/textures/player.png".to_string(),
            frame_width: 32,
            frame_height: 32,
            start: Rect::new(96, 480, 32, 32),
            speed: 5,
            idle: CycleConfig {
                row: 1,
                frames: 4,
                speed: 10,
            },
            run_left: CycleConfig {
                row: 2,
                frames: 4,
                speed: 5,
            },
            run_right: CycleConfig {
                row: 3,
                frames: 4,
                speed: 5,
            },
        }
    }
}

impl Default for TilesetConfig {
    fn default() -> Self {
        Self {
            texture: "assets/textures/tiles.png".to_string(),
            columns: 4,
            tile_size: 32,
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            texture: "assets/textures/font.png".to_string(),
            glyph_width: 8,
            glyph_height: 8,
            columns: 16,
            glyph_count: 96,
            scale: 2,
        }
    }
}

/// Load the config at `path`. A missing file yields the defaults; a file that
/// exists but does not parse is an error.
pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    if !path.exists() {
        log::warn!(
            "Game config '{}' not found, using built-in defaults",
            path.display()
        );
        return Ok(GameConfig::default());
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read game config {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse game config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.tileset.tile_size <= 0 {
        return Err(format!(
            "Game config validation failed: tileset.tile_size must be positive, got {}",
            config.tileset.tile_size
        ));
    }
    if config.tileset.columns <= 0 || config.font.columns <= 0 {
        return Err("Game config validation failed: columns must be positive".to_string());
    }
    let player = &config.player;
    if player.frame_width <= 0 || player.frame_height <= 0 {
        return Err(
            "Game config validation failed: player frame size must be positive".to_string(),
        );
    }
    for (name, cycle) in [
        ("idle", player.idle),
        ("run_left", player.run_left),
        ("run_right", player.run_right),
    ] {
        if cycle.row < 1 || cycle.frames < 1 || cycle.speed < 0 {
            return Err(format!(
                "Game config validation failed: cycle '{}' needs row >= 1, frames >= 1 and speed >= 0",
                name
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "tr_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = temp_file_path("missing");
        let config = load_config_from_path(&path).expect("missing config falls back");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.player.speed, 5);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let path = temp_file_path("partial");
        let json = r#"
        {
          "window": { "title": "Level 2" },
          "player": {
            "speed": 3,
            "start": { "x": 10, "y": 20, "w": 32, "h": 32 },
            "run_left": { "row": 4, "frames": 6, "speed": 2 }
          }
        }
        "#;
        fs::write(&path, json).expect("failed to write temp config");

        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.window.title, "Level 2");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.player.speed, 3);
        assert_eq!(config.player.start, Rect::new(10, 20, 32, 32));
        assert_eq!(config.player.run_left.frames, 6);
        assert_eq!(config.player.idle, PlayerConfig::default().idle);
        assert_eq!(config.tileset, TilesetConfig::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_file_path("malformed");
        fs::write(&path, "{ \"window\": ").expect("failed to write temp config");
        let err = load_config_from_path(&path).expect_err("malformed config should fail");
        assert!(err.contains("Failed to parse game config JSON"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_cycle_is_rejected() {
        let path = temp_file_path("bad_cycle");
        let json = r#"{ "player": { "idle": { "row": 0, "frames": 4, "speed": 10 } } }"#;
        fs::write(&path, json).expect("failed to write temp config");
        let err = load_config_from_path(&path).expect_err("row 0 should fail");
        assert!(err.contains("cycle 'idle'"));
        let _ = fs::remove_file(path);
    }
}
