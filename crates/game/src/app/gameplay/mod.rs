use std::fs;
use std::path::PathBuf;

use engine::{
    CameraController, CharacterController, InputSnapshot, Scene, SceneCommand, TileGrid, Vec2,
    TILE_HEIGHT, TILE_WIDTH,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::config::{CameraTuning, GameTuning};

mod entities;
mod fade;

use entities::{collect_overlap_events, OverlapEvent, TriggerEntity};
use fade::{Fade, FadeStatus};

const HUB_LEVEL_ID: i32 = 0;
const MAX_DEAD_ZONE_SCALE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Player has not yet moved away from the spawn point.
    Preparation,
    Gameplay,
    /// Fading out after a goal or a death; reload fires when the fade
    /// finishes.
    Ending,
}

/// Optional per-level entity placements, stored next to the level CSV.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EntityPlacement {
    Pickup { x: f32, y: f32 },
    Enemy { ax: f32, ay: f32, bx: f32, by: f32 },
}

pub(crate) struct GameplayScene {
    levels_dir: PathBuf,
    tuning: GameTuning,
    level_id: i32,
    /// Level to load on the next reload. `None` reloads the current one.
    pending_level: Option<i32>,
    grid: Option<TileGrid>,
    character: Option<CharacterController>,
    camera: CameraController,
    entities: Vec<TriggerEntity>,
    fade: Fade,
    stage: Stage,
    pickups_collected: u32,
}

impl GameplayScene {
    pub(crate) fn new(levels_dir: PathBuf, tuning: GameTuning, level_id: i32) -> Self {
        Self {
            levels_dir,
            tuning,
            level_id,
            pending_level: None,
            grid: None,
            character: None,
            camera: CameraController::new(),
            entities: Vec::new(),
            fade: Fade::new(),
            stage: Stage::Preparation,
            pickups_collected: 0,
        }
    }

    fn load_grid(&self) -> TileGrid {
        let path = self.levels_dir.join(level_file_name(self.level_id));
        match TileGrid::from_csv_path(&path) {
            Ok(grid) => grid,
            Err(error) => {
                warn!(
                    level_id = self.level_id,
                    path = %path.display(),
                    error = %error,
                    "level_load_failed"
                );
                TileGrid::test_level()
            }
        }
    }

    fn load_placements(&self) -> Vec<TriggerEntity> {
        let path = self
            .levels_dir
            .join(placements_file_name(self.level_id));
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };

        let mut deserializer = serde_json::Deserializer::from_str(&raw);
        let placements: Vec<EntityPlacement> =
            match serde_path_to_error::deserialize(&mut deserializer) {
                Ok(placements) => placements,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        field = %error.path(),
                        error = %error,
                        "placements_parse_failed"
                    );
                    return Vec::new();
                }
            };

        placements
            .into_iter()
            .map(|placement| match placement {
                EntityPlacement::Pickup { x, y } => TriggerEntity::pickup(Vec2::new(x, y)),
                EntityPlacement::Enemy { ax, ay, bx, by } => {
                    TriggerEntity::enemy(Vec2::new(ax, ay), Vec2::new(bx, by))
                }
            })
            .collect()
    }

    fn begin_ending(&mut self, reason: &'static str) {
        self.stage = Stage::Ending;
        self.fade.start(FadeStatus::FadeOut, self.tuning.rules.fade_seconds);
        info!(level_id = self.level_id, reason, "ending_started");
    }

    fn dispatch_event(&mut self, event: OverlapEvent) {
        match event {
            OverlapEvent::PickupCollected => {
                self.pickups_collected += 1;
                info!(
                    level_id = self.level_id,
                    total = self.pickups_collected,
                    "pickup_collected"
                );
            }
            OverlapEvent::EnemyTouched => {
                if self.stage != Stage::Ending {
                    if let Some(character) = self.character.as_mut() {
                        character.set_dead(true);
                    }
                    self.begin_ending("enemy_touched");
                }
            }
            OverlapEvent::GoalReached { target_level } => {
                if self.stage == Stage::Gameplay {
                    self.pending_level = Some(target_level);
                    info!(level_id = self.level_id, target_level, "goal_reached");
                    self.begin_ending("goal_reached");
                }
            }
        }
    }
}

impl Scene for GameplayScene {
    fn load(&mut self) {
        if let Some(next) = self.pending_level.take() {
            self.level_id = next;
        }

        let grid = self.load_grid();
        let spawn = match grid.spawn_index() {
            Some((x, y)) => grid.world_position_of(x, y),
            None => {
                warn!(level_id = self.level_id, "spawn_marker_missing");
                grid.world_bounds().center()
            }
        };

        self.entities = build_goals(&grid, self.level_id);
        self.entities.extend(self.load_placements());
        self.camera = build_camera(&grid, &self.tuning.camera);
        self.character = Some(CharacterController::new(self.tuning.character, spawn));
        self.fade = Fade::new();
        self.fade.start(FadeStatus::FadeIn, self.tuning.rules.fade_seconds);
        self.stage = Stage::Preparation;
        self.pickups_collected = 0;

        info!(
            level_id = self.level_id,
            width = grid.width(),
            height = grid.height(),
            solids = grid.solid_count(),
            entities = self.entities.len(),
            "level_loaded"
        );
        self.grid = Some(grid);
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        self.fade.tick(fixed_dt_seconds);

        if self.stage == Stage::Ending {
            let target = self
                .character
                .as_ref()
                .filter(|character| !character.is_dead())
                .map(|character| character.position());
            self.camera.update(target);
            if self.fade.is_finished() {
                return SceneCommand::ReloadCurrent;
            }
            return SceneCommand::None;
        }

        if input.reset_pressed() {
            self.pending_level = None;
            info!(level_id = self.level_id, "manual_reset");
            return SceneCommand::ReloadCurrent;
        }

        let grid = self.grid.as_ref();
        let Some(character) = self.character.as_mut() else {
            return SceneCommand::None;
        };

        character.tick(fixed_dt_seconds, input, grid);

        if self.stage == Stage::Preparation
            && character.has_left_spawn_area(self.tuning.rules.spawn_exit_distance)
        {
            self.stage = Stage::Gameplay;
            info!(level_id = self.level_id, "gameplay_started");
        }

        let fell_out = character.position().y < self.tuning.rules.death_plane_y;
        if fell_out && !character.is_dead() {
            character.set_dead(true);
            self.begin_ending("fell_out_of_level");
        }

        let body = self
            .character
            .as_ref()
            .map(CharacterController::bounding_box);
        if let Some(body) = body {
            let goals_armed = self.stage == Stage::Gameplay;
            let events =
                collect_overlap_events(&mut self.entities, &body, fixed_dt_seconds, goals_armed);
            for event in events {
                self.dispatch_event(event);
            }
        }

        let target = self
            .character
            .as_ref()
            .filter(|character| !character.is_dead())
            .map(|character| character.position());
        self.camera.update(target);

        SceneCommand::None
    }

    fn unload(&mut self) {
        info!(
            level_id = self.level_id,
            pickups = self.pickups_collected,
            "level_unloaded"
        );
        self.grid = None;
        self.character = None;
        self.entities.clear();
        self.fade.stop();
    }

    fn debug_title(&self) -> Option<String> {
        let position = self
            .character
            .as_ref()
            .map(CharacterController::position)
            .unwrap_or_default();
        Some(format!(
            "Platcore | Level {} | x {:.1} y {:.1} | pickups {}",
            self.level_id, position.x, position.y, self.pickups_collected
        ))
    }
}

fn level_file_name(level_id: i32) -> String {
    if level_id == HUB_LEVEL_ID {
        "select.csv".to_string()
    } else {
        format!("level{level_id}.csv")
    }
}

fn placements_file_name(level_id: i32) -> String {
    if level_id == HUB_LEVEL_ID {
        "select.entities.json".to_string()
    } else {
        format!("level{level_id}.entities.json")
    }
}

fn default_goal_target(level_id: i32) -> i32 {
    if level_id == HUB_LEVEL_ID {
        1
    } else {
        level_id + 1
    }
}

/// Builds goal entities from the grid's goal markers. In the hub the
/// goals map to levels 1, 2, ... in scan order. Inside a level the
/// rightmost goal advances to the next level and the leftmost returns
/// to the hub; a single goal counts as rightmost. Levels without any
/// marker get a synthesized goal near the top-right corner.
fn build_goals(grid: &TileGrid, level_id: i32) -> Vec<TriggerEntity> {
    let markers = grid.goal_indices();
    if markers.is_empty() {
        let bounds = grid.world_bounds();
        let position = Vec2::new(
            bounds.right - TILE_WIDTH * 1.5,
            bounds.top - TILE_HEIGHT * 1.5,
        );
        warn!(level_id, "goal_marker_missing");
        return vec![TriggerEntity::goal(position, default_goal_target(level_id))];
    }

    if level_id == HUB_LEVEL_ID {
        return markers
            .iter()
            .enumerate()
            .map(|(slot, &(x, y))| {
                TriggerEntity::goal(grid.world_position_of(x, y), slot as i32 + 1)
            })
            .collect();
    }

    let max_column = markers.iter().map(|&(x, _)| x).max().unwrap_or(0);
    markers
        .iter()
        .map(|&(x, y)| {
            let target = if x == max_column {
                level_id + 1
            } else {
                HUB_LEVEL_ID
            };
            TriggerEntity::goal(grid.world_position_of(x, y), target)
        })
        .collect()
}

fn build_camera(grid: &TileGrid, tuning: &CameraTuning) -> CameraController {
    let bounds = grid.world_bounds();
    let mut camera = CameraController::new();
    camera.set_camera_distance(tuning.camera_distance);
    camera.set_zoom_range(tuning.min_zoom, tuning.max_zoom);
    camera.set_auto_zoom_by_map_width(bounds.width(), tuning.reference_map_width);
    camera.set_follow_speed(tuning.follow_speed);

    let scale = (bounds.width() / tuning.reference_map_width).min(MAX_DEAD_ZONE_SCALE);
    camera.set_dead_zone(
        tuning.dead_zone_base * scale,
        tuning.dead_zone_base * scale,
    );
    camera.set_movable_area(bounds);
    camera.set_initial_position(bounds.center());
    camera
}
