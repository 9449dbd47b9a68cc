use std::env;

use engine::{resolve_app_paths, LoopConfig, StartupError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::config;
use super::gameplay::GameplayScene;
use super::input_script::ScriptedInput;
use super::title::TitleScene;

const LEVEL_ENV_VAR: &str = "PLATCORE_LEVEL";
const MAX_TICKS_ENV_VAR: &str = "PLATCORE_MAX_TICKS";
const SCRIPT_ENV_VAR: &str = "PLATCORE_INPUT_SCRIPT";

/// Headless runs always stop eventually; one minute of simulated time
/// unless overridden.
const DEFAULT_MAX_TICKS: u64 = 3600;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) title_scene: TitleScene,
    pub(crate) game_scene: GameplayScene,
    pub(crate) input: ScriptedInput,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== Platcore Startup ===");

    let paths = resolve_app_paths()?;
    info!(
        root = %paths.root.display(),
        levels_dir = %paths.levels_dir.display(),
        config_dir = %paths.config_dir.display(),
        "paths_resolved"
    );

    let tuning = config::load_tuning(&paths.config_dir.join("tuning.json"));
    let level_id = resolve_start_level();
    let game_scene = GameplayScene::new(paths.levels_dir, tuning, level_id);
    let input = resolve_input_source();

    let config = LoopConfig {
        max_ticks: Some(resolve_max_ticks()),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        title_scene: TitleScene::new(),
        game_scene,
        input,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn resolve_start_level() -> i32 {
    match env::var(LEVEL_ENV_VAR) {
        Ok(raw) => match raw.parse::<i32>() {
            Ok(level_id) if level_id >= 0 => level_id,
            _ => {
                warn!(var = LEVEL_ENV_VAR, value = %raw, "invalid_start_level");
                0
            }
        },
        Err(_) => 0,
    }
}

fn resolve_max_ticks() -> u64 {
    match env::var(MAX_TICKS_ENV_VAR) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(ticks) if ticks > 0 => ticks,
            _ => {
                warn!(var = MAX_TICKS_ENV_VAR, value = %raw, "invalid_max_ticks");
                DEFAULT_MAX_TICKS
            }
        },
        Err(_) => DEFAULT_MAX_TICKS,
    }
}

fn resolve_input_source() -> ScriptedInput {
    let Ok(path) = env::var(SCRIPT_ENV_VAR) else {
        return ScriptedInput::idle();
    };
    match ScriptedInput::from_path(path.as_ref()) {
        Ok(input) => {
            info!(path = %path, "input_script_loaded");
            input
        }
        Err(error) => {
            warn!(path = %path, error = %error, "input_script_load_failed");
            ScriptedInput::idle()
        }
    }
}
