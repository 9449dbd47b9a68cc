use std::fs;
use std::path::Path;

use engine::{CharacterConfig, DEFAULT_REFERENCE_MAP_WIDTH};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub(crate) struct CameraTuning {
    pub(crate) follow_speed: f32,
    pub(crate) dead_zone_base: f32,
    pub(crate) reference_map_width: f32,
    pub(crate) min_zoom: f32,
    pub(crate) max_zoom: f32,
    pub(crate) camera_distance: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            follow_speed: 0.05,
            dead_zone_base: 3.0,
            reference_map_width: DEFAULT_REFERENCE_MAP_WIDTH,
            min_zoom: 0.3,
            max_zoom: 2.5,
            camera_distance: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub(crate) struct RulesTuning {
    pub(crate) death_plane_y: f32,
    pub(crate) spawn_exit_distance: f32,
    pub(crate) fade_seconds: f32,
}

impl Default for RulesTuning {
    fn default() -> Self {
        Self {
            death_plane_y: -20.0,
            spawn_exit_distance: 1.0,
            fade_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GameTuning {
    pub(crate) character: CharacterConfig,
    pub(crate) camera: CameraTuning,
    pub(crate) rules: RulesTuning,
}

/// Loads tuning from disk, falling back to defaults on any failure. A
/// missing file is expected on fresh checkouts and only logged at info.
pub(crate) fn load_tuning(path: &Path) -> GameTuning {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            info!(path = %path.display(), error = %error, "tuning_file_missing");
            return GameTuning::default();
        }
    };

    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    match serde_path_to_error::deserialize::<_, GameTuning>(&mut deserializer) {
        Ok(tuning) => GameTuning {
            character: tuning.character.sanitized(),
            ..tuning
        },
        Err(error) => {
            warn!(
                path = %path.display(),
                field = %error.path(),
                error = %error,
                "tuning_parse_failed"
            );
            GameTuning::default()
        }
    }
}
