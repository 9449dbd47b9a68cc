use serde::Deserialize;

use super::input::InputAction;
use super::math::{Rect, Vec2};
use super::scene::InputSnapshot;
use super::tile_grid::TileGrid;

/// Gap left between a resolved character and the surface it hit, so a
/// flush character never reads as overlapping on the next query.
const CONTACT_SKIN: f32 = 0.001;
const RESOLVE_ITERATIONS: u32 = 8;
const GROUND_PROBE_DEPTH: f32 = 0.05;
const WALL_PROBE_DEPTH: f32 = 0.05;
const PROBE_EDGE_INSET: f32 = 0.05;

/// Movement tuning. Velocities are per-tick displacements at the fixed
/// simulation rate; timer fields are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub wall_jump_force: f32,
    pub wall_jump_horizontal_force: f32,
    pub wall_slide_speed: f32,
    pub jump_buffer_time: f32,
    pub wall_jump_buffer_time: f32,
    pub coyote_time: f32,
    pub wall_jump_direction_lock_time: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            speed: 0.2,
            jump_force: 0.6,
            gravity: 0.025,
            max_fall_speed: 0.8,
            wall_jump_force: 0.55,
            wall_jump_horizontal_force: 0.35,
            wall_slide_speed: 0.12,
            jump_buffer_time: 0.1,
            wall_jump_buffer_time: 0.1,
            coyote_time: 0.1,
            wall_jump_direction_lock_time: 0.15,
            width: 1.8,
            height: 1.8,
        }
    }
}

impl CharacterConfig {
    /// Clamps nonsense values from external tuning files. Negative forces
    /// and timers become zero; a non-positive body size falls back to the
    /// default so the collision box never degenerates.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            speed: self.speed.max(0.0),
            jump_force: self.jump_force.max(0.0),
            gravity: self.gravity.max(0.0),
            max_fall_speed: self.max_fall_speed.max(0.0),
            wall_jump_force: self.wall_jump_force.max(0.0),
            wall_jump_horizontal_force: self.wall_jump_horizontal_force.max(0.0),
            wall_slide_speed: self.wall_slide_speed.max(0.0),
            jump_buffer_time: self.jump_buffer_time.max(0.0),
            wall_jump_buffer_time: self.wall_jump_buffer_time.max(0.0),
            coyote_time: self.coyote_time.max(0.0),
            wall_jump_direction_lock_time: self.wall_jump_direction_lock_time.max(0.0),
            width: if self.width > 0.0 {
                self.width
            } else {
                defaults.width
            },
            height: if self.height > 0.0 {
                self.height
            } else {
                defaults.height
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionDirection {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

/// Kinematic platformer body. Movement resolves one axis at a time
/// against a tile grid; with no grid attached the body moves freely.
#[derive(Debug, Clone)]
pub struct CharacterController {
    config: CharacterConfig,
    position: Vec2,
    spawn_position: Vec2,
    velocity: Vec2,
    grounded: bool,
    wall_contact_left: bool,
    wall_contact_right: bool,
    was_wall_contact_left: bool,
    was_wall_contact_right: bool,
    jump_buffer_timer: f32,
    wall_jump_buffer_timer: f32,
    coyote_timer: f32,
    wall_jump_lock_timer: f32,
    last_collision_direction: CollisionDirection,
    gravity_enabled: bool,
    dead: bool,
}

impl CharacterController {
    pub fn new(config: CharacterConfig, spawn_position: Vec2) -> Self {
        Self {
            config: config.sanitized(),
            position: spawn_position,
            spawn_position,
            velocity: Vec2::default(),
            grounded: false,
            wall_contact_left: false,
            wall_contact_right: false,
            was_wall_contact_left: false,
            was_wall_contact_right: false,
            jump_buffer_timer: 0.0,
            wall_jump_buffer_timer: 0.0,
            coyote_timer: 0.0,
            wall_jump_lock_timer: 0.0,
            last_collision_direction: CollisionDirection::None,
            gravity_enabled: true,
            dead: false,
        }
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn_position
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::from_center_size(self.position, self.config.width, self.config.height)
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    pub fn on_wall(&self) -> bool {
        self.wall_contact_left || self.wall_contact_right
    }

    pub fn wall_contact_left(&self) -> bool {
        self.wall_contact_left
    }

    pub fn wall_contact_right(&self) -> bool {
        self.wall_contact_right
    }

    pub fn last_collision_direction(&self) -> CollisionDirection {
        self.last_collision_direction
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn set_dead(&mut self, dead: bool) {
        self.dead = dead;
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
    }

    pub fn distance_from_spawn(&self) -> f32 {
        self.position.distance_to(self.spawn_position)
    }

    pub fn has_left_spawn_area(&self, threshold: f32) -> bool {
        self.distance_from_spawn() > threshold
    }

    /// Resets the body to its spawn point with all transient state cleared.
    pub fn respawn(&mut self) {
        self.position = self.spawn_position;
        self.velocity = Vec2::default();
        self.grounded = false;
        self.wall_contact_left = false;
        self.wall_contact_right = false;
        self.was_wall_contact_left = false;
        self.was_wall_contact_right = false;
        self.jump_buffer_timer = 0.0;
        self.wall_jump_buffer_timer = 0.0;
        self.coyote_timer = 0.0;
        self.wall_jump_lock_timer = 0.0;
        self.last_collision_direction = CollisionDirection::None;
        self.dead = false;
    }

    /// Advances the body by one fixed simulation step. `dt_seconds` only
    /// drives timer decay; displacement constants apply once per tick.
    pub fn tick(&mut self, dt_seconds: f32, input: &InputSnapshot, grid: Option<&TileGrid>) {
        if self.dead {
            return;
        }

        decay_timer(&mut self.jump_buffer_timer, dt_seconds);
        decay_timer(&mut self.wall_jump_buffer_timer, dt_seconds);
        decay_timer(&mut self.coyote_timer, dt_seconds);
        decay_timer(&mut self.wall_jump_lock_timer, dt_seconds);

        if input.jump_pressed() {
            self.jump_buffer_timer = self.config.jump_buffer_time;
            self.wall_jump_buffer_timer = self.config.wall_jump_buffer_time;
        }

        self.resolve_jumps();

        if self.wall_jump_lock_timer <= 0.0 {
            let axis = match (
                input.is_down(InputAction::MoveLeft),
                input.is_down(InputAction::MoveRight),
            ) {
                (true, false) => -1.0,
                (false, true) => 1.0,
                _ => 0.0,
            };
            self.velocity.x = axis * self.config.speed;
        }

        if self.gravity_enabled {
            self.velocity.y -= self.config.gravity;
            if self.velocity.y < -self.config.max_fall_speed {
                self.velocity.y = -self.config.max_fall_speed;
            }
        }

        // Wall slide caps descent while pressed against a wall mid-air.
        if !self.grounded && self.on_wall() && self.velocity.y < -self.config.wall_slide_speed {
            self.velocity.y = -self.config.wall_slide_speed;
        }

        self.last_collision_direction = CollisionDirection::None;
        self.move_axis_x(grid);
        self.move_axis_y(grid);

        self.was_wall_contact_left = self.wall_contact_left;
        self.was_wall_contact_right = self.wall_contact_right;
        self.probe_contacts(grid);

        if self.grounded {
            self.coyote_timer = self.config.coyote_time;
        }
    }

    /// Wall jumps take priority over ground jumps when both are possible.
    /// Each jump kind consumes its own buffer window; firing either one
    /// zeroes both so a single press never produces two jumps.
    fn resolve_jumps(&mut self) {
        let wall_left = self.wall_contact_left || self.was_wall_contact_left;
        let wall_right = self.wall_contact_right || self.was_wall_contact_right;
        if self.wall_jump_buffer_timer > 0.0 && !self.grounded && (wall_left || wall_right) {
            self.velocity.y = self.config.wall_jump_force;
            self.velocity.x = if wall_left {
                self.config.wall_jump_horizontal_force
            } else {
                -self.config.wall_jump_horizontal_force
            };
            self.wall_jump_lock_timer = self.config.wall_jump_direction_lock_time;
            self.jump_buffer_timer = 0.0;
            self.wall_jump_buffer_timer = 0.0;
            return;
        }

        if self.jump_buffer_timer > 0.0 && (self.grounded || self.coyote_timer > 0.0) {
            self.velocity.y = self.config.jump_force;
            self.grounded = false;
            self.coyote_timer = 0.0;
            self.jump_buffer_timer = 0.0;
            self.wall_jump_buffer_timer = 0.0;
        }
    }

    fn move_axis_x(&mut self, grid: Option<&TileGrid>) {
        if self.velocity.x == 0.0 {
            return;
        }
        let (width, height, y) = (self.config.width, self.config.height, self.position.y);
        let at = move |x: f32| Rect::from_center_size(Vec2::new(x, y), width, height);
        let blocked = |from: f32, to: f32| overlaps_solid(grid, &at(from).union(&at(to)));

        let start = self.position.x;
        let delta = self.velocity.x;
        if !blocked(start, start + delta) {
            self.position.x = start + delta;
            return;
        }

        self.position.x = resolve_flush(start, delta, blocked);
        self.last_collision_direction = if delta > 0.0 {
            CollisionDirection::Right
        } else {
            CollisionDirection::Left
        };
        self.velocity.x = 0.0;
    }

    fn move_axis_y(&mut self, grid: Option<&TileGrid>) {
        if self.velocity.y == 0.0 {
            return;
        }
        let (width, height, x) = (self.config.width, self.config.height, self.position.x);
        let at = move |y: f32| Rect::from_center_size(Vec2::new(x, y), width, height);
        let blocked = |from: f32, to: f32| overlaps_solid(grid, &at(from).union(&at(to)));

        let start = self.position.y;
        let delta = self.velocity.y;
        if !blocked(start, start + delta) {
            self.position.y = start + delta;
            return;
        }

        self.position.y = resolve_flush(start, delta, blocked);
        if delta < 0.0 {
            self.grounded = true;
            self.last_collision_direction = CollisionDirection::Down;
        } else {
            self.last_collision_direction = CollisionDirection::Up;
        }
        self.velocity.y = 0.0;
    }

    /// Authoritative contact state, taken from thin probes around the
    /// resolved body rather than from what the movement pass happened to
    /// hit. Probes are inset along their long edge so a floor never reads
    /// as a wall and vice versa.
    fn probe_contacts(&mut self, grid: Option<&TileGrid>) {
        let body = self.bounding_box();

        let ground = Rect {
            left: body.left + PROBE_EDGE_INSET,
            right: body.right - PROBE_EDGE_INSET,
            bottom: body.bottom - GROUND_PROBE_DEPTH,
            top: body.bottom,
        };
        self.grounded = overlaps_solid(grid, &ground);

        let left = Rect {
            left: body.left - WALL_PROBE_DEPTH,
            right: body.left,
            bottom: body.bottom + PROBE_EDGE_INSET,
            top: body.top - PROBE_EDGE_INSET,
        };
        self.wall_contact_left = overlaps_solid(grid, &left);

        let right = Rect {
            left: body.right,
            right: body.right + WALL_PROBE_DEPTH,
            bottom: body.bottom + PROBE_EDGE_INSET,
            top: body.top - PROBE_EDGE_INSET,
        };
        self.wall_contact_right = overlaps_solid(grid, &right);
    }
}

fn overlaps_solid(grid: Option<&TileGrid>, query: &Rect) -> bool {
    grid.is_some_and(|grid| grid.overlaps(query, 1.0))
}

fn decay_timer(timer: &mut f32, dt_seconds: f32) {
    if *timer > 0.0 {
        *timer -= dt_seconds;
    }
}

/// Bisects toward the blocking surface: each iteration either commits a
/// half-step that stays clear or halves again, ending a contact skin shy
/// of the surface. `blocked(from, to)` must report any solid inside the
/// swept span, which keeps fast movers from skipping thin walls.
fn resolve_flush(start: f32, delta: f32, blocked: impl Fn(f32, f32) -> bool) -> f32 {
    let mut position = start;
    let mut step = delta * 0.5;
    for _ in 0..RESOLVE_ITERATIONS {
        let candidate = position + step;
        if !blocked(position, candidate) {
            position = candidate;
        }
        step *= 0.5;
    }
    position - CONTACT_SKIN * delta.signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn grid(source: &str) -> TileGrid {
        TileGrid::from_csv_str(source).expect("grid parses")
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::empty()
    }

    fn holding(action: InputAction) -> InputSnapshot {
        InputSnapshot::empty().with_action_down(action, true)
    }

    fn jump_tap() -> InputSnapshot {
        InputSnapshot::empty().with_jump_pressed(true)
    }

    fn assert_never_overlapping(character: &CharacterController, grid: &TileGrid) {
        assert!(
            !grid.overlaps(&character.bounding_box(), 1.0),
            "character at {:?} penetrates solid tiles",
            character.position()
        );
    }

    #[test]
    fn without_grid_the_body_falls_freely() {
        let mut character = CharacterController::new(CharacterConfig::default(), Vec2::new(0.0, 0.0));

        for _ in 0..10 {
            character.tick(DT, &idle(), None);
        }

        assert!(!character.grounded());
        assert!(character.position().y < -1.0);
        assert!(character.velocity().y < 0.0);
    }

    #[test]
    fn fall_speed_clamps_at_terminal_velocity() {
        let config = CharacterConfig::default();
        let mut character = CharacterController::new(config, Vec2::new(0.0, 0.0));

        for _ in 0..60 {
            character.tick(DT, &idle(), None);
        }

        assert!((character.velocity().y + config.max_fall_speed).abs() < 0.0001);
    }

    #[test]
    fn settles_onto_floor_and_reports_grounded() {
        let floor = grid("-1,-1,-1\n-1,-1,-1\n0,0,0");
        let mut character =
            CharacterController::new(CharacterConfig::default(), Vec2::new(3.0, 3.0));

        for _ in 0..5 {
            character.tick(DT, &idle(), Some(&floor));
            assert_never_overlapping(&character, &floor);
        }

        assert!(character.grounded());
        let bottom = character.bounding_box().bottom;
        assert!(bottom >= 2.0, "body sank into the floor: bottom {bottom}");
        assert!(bottom < 2.02, "body hovering above the floor: bottom {bottom}");
        assert_eq!(character.velocity().y, 0.0);
    }

    #[test]
    fn wall_stops_horizontal_movement_flush() {
        let walls = grid("0,-1,0");
        let mut config = CharacterConfig::default();
        config.gravity = 0.0;
        let mut character = CharacterController::new(config, Vec2::new(3.0, 1.0));

        for _ in 0..10 {
            character.tick(DT, &holding(InputAction::MoveRight), Some(&walls));
            assert_never_overlapping(&character, &walls);
        }

        // Right wall face is at x = 4; half body width is 0.9.
        assert!((character.position().x - (4.0 - 0.9)).abs() < 0.02);
        assert_eq!(character.velocity().x, 0.0);
        assert_eq!(
            character.last_collision_direction(),
            CollisionDirection::Right
        );
        assert!(character.wall_contact_right());
    }

    #[test]
    fn tile_sized_step_does_not_tunnel_through_wall() {
        let walls = grid("0,-1,0");
        let mut config = CharacterConfig::default();
        config.gravity = 0.0;
        config.speed = 2.0;
        let mut character = CharacterController::new(config, Vec2::new(3.0, 1.0));

        character.tick(DT, &holding(InputAction::MoveRight), Some(&walls));

        assert_never_overlapping(&character, &walls);
        assert!(character.position().x < 4.0 - 0.89);
        assert_eq!(character.velocity().x, 0.0);
    }

    #[test]
    fn buffered_jump_fires_on_landing() {
        let floor = grid("-1,-1,-1\n-1,-1,-1\n0,0,0");
        // Floor top is y = 2; start 0.3 above flush so landing takes 5 ticks.
        let mut character =
            CharacterController::new(CharacterConfig::default(), Vec2::new(3.0, 3.2));

        character.tick(DT, &jump_tap(), Some(&floor));
        for _ in 0..4 {
            character.tick(DT, &idle(), Some(&floor));
        }
        assert!(character.grounded());

        character.tick(DT, &idle(), Some(&floor));
        assert!(
            character.velocity().y > 0.5,
            "buffered jump did not fire: velocity {:?}",
            character.velocity()
        );
        assert!(!character.grounded());
    }

    #[test]
    fn stale_jump_buffer_expires_before_landing() {
        let floor = grid("-1,-1,-1\n-1,-1,-1\n0,0,0");
        // Start 0.9 above flush; landing takes longer than the buffer window.
        let mut character =
            CharacterController::new(CharacterConfig::default(), Vec2::new(3.0, 3.8));

        character.tick(DT, &jump_tap(), Some(&floor));
        for _ in 0..12 {
            character.tick(DT, &idle(), Some(&floor));
        }

        assert!(character.grounded());
        assert!(character.velocity().y <= 0.0);
    }

    #[test]
    fn coyote_jump_works_just_after_leaving_a_ledge() {
        let ledge = grid("0,0,-1,-1");
        let mut config = CharacterConfig::default();
        config.speed = 1.0;
        let mut character = CharacterController::new(config, Vec2::new(3.0, 2.901));

        character.tick(DT, &idle(), Some(&ledge));
        assert!(character.grounded());

        character.tick(DT, &holding(InputAction::MoveRight), Some(&ledge));
        character.tick(DT, &holding(InputAction::MoveRight), Some(&ledge));
        assert!(!character.grounded());

        character.tick(DT, &jump_tap(), Some(&ledge));
        assert!(
            character.velocity().y > 0.5,
            "coyote jump did not fire: velocity {:?}",
            character.velocity()
        );
    }

    #[test]
    fn wall_jump_pushes_away_from_wall_and_locks_steering() {
        let wall = grid("0,-1,-1\n0,-1,-1\n0,-1,-1");
        let config = CharacterConfig::default();
        let mut character = CharacterController::new(config, Vec2::new(2.92, 3.0));

        character.tick(DT, &idle(), Some(&wall));
        assert!(character.wall_contact_left());
        assert!(!character.grounded());

        character.tick(DT, &jump_tap(), Some(&wall));
        assert!((character.velocity().x - config.wall_jump_horizontal_force).abs() < 0.0001);
        assert!(character.velocity().y > 0.5);

        // Steering away is ignored while the direction lock is active.
        character.tick(DT, &holding(InputAction::MoveLeft), Some(&wall));
        assert!(character.velocity().x > 0.3);

        // Once the lock expires the held direction takes over again.
        for _ in 0..12 {
            character.tick(DT, &holding(InputAction::MoveLeft), Some(&wall));
        }
        assert!(character.velocity().x < 0.0);
    }

    #[test]
    fn wall_slide_caps_descent_speed() {
        let wall = grid("0,-1,-1\n0,-1,-1\n0,-1,-1\n0,-1,-1\n0,-1,-1");
        let config = CharacterConfig::default();
        let mut character = CharacterController::new(config, Vec2::new(2.92, 8.0));

        for _ in 0..12 {
            character.tick(DT, &holding(InputAction::MoveLeft), Some(&wall));
            assert_never_overlapping(&character, &wall);
        }

        assert!(character.wall_contact_left());
        assert!(!character.grounded());
        assert!(
            character.velocity().y >= -config.wall_slide_speed - 0.0001,
            "descent exceeded slide cap: {:?}",
            character.velocity()
        );
        assert!(character.velocity().y < 0.0);
    }

    #[test]
    fn ceiling_stops_upward_movement() {
        let shaft = grid("0,0,0\n-1,-1,-1\n-1,-1,-1\n0,0,0");
        let mut character =
            CharacterController::new(CharacterConfig::default(), Vec2::new(3.0, 2.901));

        character.tick(DT, &idle(), Some(&shaft));
        assert!(character.grounded());
        character.tick(DT, &jump_tap(), Some(&shaft));

        let mut hit_ceiling = false;
        for _ in 0..10 {
            character.tick(DT, &idle(), Some(&shaft));
            assert!(character.bounding_box().top <= 6.0001);
            if character.last_collision_direction() == CollisionDirection::Up {
                hit_ceiling = true;
                assert_eq!(character.velocity().y, 0.0);
            }
        }
        assert!(hit_ceiling);

        for _ in 0..40 {
            character.tick(DT, &idle(), Some(&shaft));
        }
        assert!(character.grounded());
    }

    #[test]
    fn dead_body_ignores_ticks() {
        let mut character =
            CharacterController::new(CharacterConfig::default(), Vec2::new(1.0, 1.0));
        character.set_dead(true);

        character.tick(DT, &holding(InputAction::MoveRight), None);

        assert_eq!(character.position(), Vec2::new(1.0, 1.0));
        assert_eq!(character.velocity(), Vec2::default());
    }

    #[test]
    fn respawn_restores_spawn_state() {
        let mut character =
            CharacterController::new(CharacterConfig::default(), Vec2::new(1.0, 5.0));

        for _ in 0..10 {
            character.tick(DT, &holding(InputAction::MoveRight), None);
        }
        character.set_dead(true);
        character.respawn();

        assert_eq!(character.position(), Vec2::new(1.0, 5.0));
        assert_eq!(character.velocity(), Vec2::default());
        assert!(!character.is_dead());
        assert!(!character.grounded());
    }

    #[test]
    fn spawn_area_exit_uses_euclidean_distance() {
        let mut character =
            CharacterController::new(CharacterConfig::default(), Vec2::new(0.0, 0.0));
        assert!(!character.has_left_spawn_area(1.0));

        for _ in 0..10 {
            character.tick(DT, &holding(InputAction::MoveRight), None);
        }
        assert!(character.has_left_spawn_area(1.0));
        assert!(character.distance_from_spawn() > 1.0);
    }

    #[test]
    fn gravity_toggle_freezes_vertical_motion() {
        let mut character =
            CharacterController::new(CharacterConfig::default(), Vec2::new(0.0, 0.0));
        character.set_gravity_enabled(false);

        for _ in 0..10 {
            character.tick(DT, &idle(), None);
        }

        assert_eq!(character.position().y, 0.0);
        assert_eq!(character.velocity().y, 0.0);
    }

    #[test]
    fn wall_jump_buffer_is_tuned_independently_of_ground_buffer() {
        let wall = grid("0,-1,-1\n0,-1,-1\n0,-1,-1");
        let mut config = CharacterConfig::default();
        config.jump_buffer_time = 0.0;
        config.wall_jump_buffer_time = 0.1;
        let mut character = CharacterController::new(config, Vec2::new(2.92, 3.0));

        character.tick(DT, &idle(), Some(&wall));
        assert!(character.wall_contact_left());
        assert!(!character.grounded());

        character.tick(DT, &jump_tap(), Some(&wall));
        assert!(
            character.velocity().y > 0.5,
            "wall jump should fire from its own buffer window: velocity {:?}",
            character.velocity()
        );
    }

    #[test]
    fn zero_wall_jump_buffer_window_disables_only_wall_jumps() {
        let wall = grid("0,-1,-1\n0,-1,-1\n0,-1,-1");
        let mut config = CharacterConfig::default();
        config.wall_jump_buffer_time = 0.0;

        let mut character = CharacterController::new(config, Vec2::new(2.92, 3.0));
        character.tick(DT, &idle(), Some(&wall));
        assert!(character.wall_contact_left());
        character.tick(DT, &jump_tap(), Some(&wall));
        assert!(character.velocity().y < 0.0, "wall jump fired without a buffer window");

        let floor = grid("-1,-1,-1\n-1,-1,-1\n0,0,0");
        let mut character = CharacterController::new(config, Vec2::new(3.0, 2.901));
        character.tick(DT, &idle(), Some(&floor));
        assert!(character.grounded());
        character.tick(DT, &jump_tap(), Some(&floor));
        assert!(character.velocity().y > 0.5, "ground jump should be unaffected");
    }

    #[test]
    fn spawn_ring_level_grounds_the_character_on_the_tile_beneath() {
        let level = grid(
            "-1,-1,-1,-1,-1\n-1,0,0,0,-1\n-1,0,1,0,-1\n-1,0,0,0,-1\n-1,-1,-1,-1,-1",
        );
        let (spawn_x, spawn_y) = level.spawn_index().expect("spawn marker");
        assert_eq!((spawn_x, spawn_y), (2, 2));
        assert_eq!(
            level.tile_at(spawn_x as i32, spawn_y as i32 + 1),
            crate::app::tile_grid::TileCode::Solid
        );

        let mut config = CharacterConfig::default();
        config.width = 1.0;
        config.height = 1.0;
        let spawn = level.world_position_of(spawn_x, spawn_y);
        let mut character = CharacterController::new(config, spawn);

        // The marker tile center sits half a tile above the solid below,
        // so nothing is within probe depth after one tick.
        character.tick(DT, &idle(), Some(&level));
        assert!(!character.grounded());

        for _ in 0..10 {
            character.tick(DT, &idle(), Some(&level));
            assert_never_overlapping(&character, &level);
        }
        assert!(character.grounded());
        let bottom = character.bounding_box().bottom;
        assert!(bottom >= 4.0, "body sank into the tile beneath: bottom {bottom}");
        assert!(bottom < 4.02, "body hovering above the tile beneath: bottom {bottom}");
    }

    #[test]
    fn sanitized_config_rejects_degenerate_values() {
        let mut config = CharacterConfig::default();
        config.speed = -1.0;
        config.width = 0.0;
        config.jump_buffer_time = -0.5;
        config.wall_jump_buffer_time = -0.5;

        let sanitized = config.sanitized();
        assert_eq!(sanitized.speed, 0.0);
        assert_eq!(sanitized.width, CharacterConfig::default().width);
        assert_eq!(sanitized.jump_buffer_time, 0.0);
        assert_eq!(sanitized.wall_jump_buffer_time, 0.0);
    }
}
