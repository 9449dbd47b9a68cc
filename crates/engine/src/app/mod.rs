mod camera;
mod character;
mod input;
mod loop_runner;
mod math;
mod metrics;
mod scene;
mod tile_grid;

pub use camera::{CameraController, DEFAULT_REFERENCE_MAP_WIDTH};
pub use character::{CharacterConfig, CharacterController, CollisionDirection};
pub use input::InputAction;
pub use loop_runner::{
    run_app, run_app_with_metrics, InputSource, LoopConfig, LoopSummary, ShutdownReason,
};
pub use math::{Rect, Vec2};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use scene::{InputSnapshot, Scene, SceneCommand, SceneKey};
pub use tile_grid::{TileCode, TileGrid, TileGridError, TILE_HEIGHT, TILE_WIDTH};
