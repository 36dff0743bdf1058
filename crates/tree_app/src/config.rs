//! Scene configuration (window, counts, generators, camera, audio). Loaded from config.ron at startup.

use std::path::{Path, PathBuf};

use input::InteractionConfig;
use procgen::{GroundConfig, HeartConfig, SnowConfig, TreeConfig};
use renderer::{CameraConfig, RenderConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::caption::CaptionConfig;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub height: u32,
    /// Start in borderless fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    /// Letterbox the canvas instead of stretching it over the window.
    #[serde(default = "default_true")]
    pub maintain_aspect: bool,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_title() -> String {
    "Merry Christmas Tree".to_string()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            fullscreen: false,
            maintain_aspect: default_true(),
            title: default_title(),
        }
    }
}

/// How many particles each generator produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleCounts {
    /// Body particles; the crust adds 40% on top.
    pub tree: usize,
    pub heart: usize,
    pub ground: usize,
    pub snow: usize,
}

impl Default for ParticleCounts {
    fn default() -> Self {
        Self {
            tree: 10_000,
            heart: 2_000,
            ground: 12_000,
            snow: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub music_path: PathBuf,
    /// Starting volume in `[0, 1]`.
    pub volume: f32,
    /// Directory holding the volume widget icons.
    pub icon_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_path: PathBuf::from("music.mp3"),
            volume: 0.5,
            icon_dir: PathBuf::from("icons"),
        }
    }
}

/// Every tunable of the scene. Missing fields fall back to their defaults, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    /// Size of the virtual canvas everything is drawn on.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub target_fps: u32,
    /// Fixed seed for reproducible scenes; absent picks a random one.
    pub seed: Option<u64>,
    pub counts: ParticleCounts,
    pub tree: TreeConfig,
    pub heart: HeartConfig,
    pub ground: GroundConfig,
    pub snow: SnowConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub interaction: InteractionConfig,
    pub caption: CaptionConfig,
    pub audio: AudioConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            canvas_width: 1920,
            canvas_height: 1080,
            target_fps: engine_core::DEFAULT_TARGET_FPS,
            seed: None,
            counts: ParticleCounts::default(),
            tree: TreeConfig::default(),
            heart: HeartConfig::default(),
            ground: GroundConfig::default(),
            snow: SnowConfig::default(),
            camera: CameraConfig::default(),
            render: RenderConfig::default(),
            interaction: InteractionConfig::default(),
            caption: CaptionConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a config file, reporting what went wrong.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or `config.ron` in the current directory. A missing file silently
    /// yields defaults; an unreadable or invalid one is logged first.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(CONFIG_FILE)
}

/// Resolve a resource path: as given (relative to the working directory), else next to the
/// executable. Returns the first candidate when neither exists.
pub fn resolve_resource(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)));
    match beside_exe {
        Some(candidate) if candidate.exists() => candidate,
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Rgb;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: AppConfig = ron::from_str(
            "(seed: Some(42), counts: (tree: 100), render: (background: (0, 0, 0)), window: (fullscreen: true))",
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.counts.tree, 100);
        assert_eq!(config.counts.snow, 600);
        assert_eq!(config.render.background, Rgb::BLACK);
        assert!(config.window.fullscreen);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn empty_file_is_default() {
        let config: AppConfig = ron::from_str("()").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn round_trips_through_ron() {
        let config = AppConfig {
            seed: Some(7),
            ..AppConfig::default()
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back: AppConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("xmas-tree-bad-{}.ron", std::process::id()));
        std::fs::write(&path, "(counts: (tree: \"lots\"))").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(AppConfig::load(Some(&path)), AppConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_default() {
        let path = Path::new("definitely/not/here/config.ron");
        assert!(matches!(AppConfig::load_from(path), Err(ConfigError::Io { .. })));
        assert_eq!(AppConfig::load(Some(path)), AppConfig::default());
    }
}
