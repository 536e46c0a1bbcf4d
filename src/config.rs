use std::path::Path;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "BLOCKOUT_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tunables for the interaction engine. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Scale change per screen pixel of vertical pointer motion while molding.
    pub mold_sensitivity: f32,
    /// Free-fly distance per frame.
    pub move_speed: f32,
    pub fly_to_duration_ms: u64,
    /// Distance kept between the camera and a double-clicked surface.
    pub fly_to_standoff: f32,
    /// Radians per pixel of orbit drag.
    pub orbit_speed: f32,
    /// Fraction of target distance per pixel of pan drag.
    pub pan_speed: f32,
    /// Distance factor per wheel notch.
    pub zoom_step: f32,
    pub double_click_ms: u64,
    pub double_click_slop_px: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mold_sensitivity: 0.01,
            move_speed: 0.05,
            fly_to_duration_ms: 600,
            fly_to_standoff: 3.0,
            orbit_speed: 0.005,
            pan_speed: 0.0015,
            zoom_step: 0.95,
            double_click_ms: 400,
            double_click_slop_px: 4.0,
        }
    }
}

impl EditorConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Reads the file named by `BLOCKOUT_CONFIG`, falling back to defaults.
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load_from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded editor config from {}", path);
                config
            }
            Err(err) => {
                log::warn!("Ignoring editor config {}: {}", path, err);
                Self::default()
            }
        }
    }
}
