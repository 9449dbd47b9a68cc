use super::math::{Rect, Vec2};

const BASE_FOV_RADIANS: f32 = std::f32::consts::FRAC_PI_4;
const ZOOM_SCALING_EXPONENT: f32 = 0.6;
const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;
const MIN_FOLLOW_SPEED: f32 = 0.001;
const MAX_FOLLOW_SPEED: f32 = 1.0;
const ZOOM_CHANGE_THRESHOLD: f32 = 1e-3;

pub const DEFAULT_REFERENCE_MAP_WIDTH: f32 = 80.0;

/// Lazy-follow framing camera. The view center trails a target through a
/// dead zone, is clamped so the viewport stays inside the movable area,
/// and eases toward its desired position by a per-tick lerp factor.
///
/// Setters silently ignore invalid values so external tuning can never
/// put the camera into a degenerate state.
#[derive(Debug, Clone)]
pub struct CameraController {
    smoothed_position: Vec2,
    movable_area: Option<Rect>,
    follow_speed: f32,
    camera_distance: f32,
    dead_zone_width: f32,
    dead_zone_height: f32,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    aspect_ratio: f32,
    map_bounds_priority: bool,
    cached_viewport: Option<Vec2>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            smoothed_position: Vec2::default(),
            movable_area: None,
            follow_speed: 0.1,
            camera_distance: 50.0,
            dead_zone_width: 4.0,
            dead_zone_height: 4.0,
            zoom: 1.0,
            min_zoom: 0.3,
            max_zoom: 3.0,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            map_bounds_priority: true,
            cached_viewport: None,
        }
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_center(&self) -> Vec2 {
        self.smoothed_position
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn camera_distance(&self) -> f32 {
        self.camera_distance
    }

    pub fn follow_speed(&self) -> f32 {
        self.follow_speed
    }

    pub fn dead_zone(&self) -> (f32, f32) {
        (self.dead_zone_width, self.dead_zone_height)
    }

    pub fn set_initial_position(&mut self, position: Vec2) {
        self.smoothed_position = position;
    }

    pub fn set_movable_area(&mut self, area: Rect) {
        if area.right > area.left && area.top > area.bottom {
            self.movable_area = Some(area);
        }
    }

    pub fn clear_movable_area(&mut self) {
        self.movable_area = None;
    }

    pub fn set_map_bounds_priority(&mut self, enabled: bool) {
        self.map_bounds_priority = enabled;
    }

    pub fn set_follow_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.follow_speed = speed.clamp(MIN_FOLLOW_SPEED, MAX_FOLLOW_SPEED);
        }
    }

    pub fn set_dead_zone(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() {
            self.dead_zone_width = width.max(0.0);
            self.dead_zone_height = height.max(0.0);
        }
    }

    pub fn set_camera_distance(&mut self, distance: f32) {
        if distance.is_finite() && distance > 0.0 {
            self.camera_distance = distance;
            self.cached_viewport = None;
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if !zoom.is_finite() {
            return;
        }
        let clamped = zoom.clamp(self.min_zoom, self.max_zoom);
        if (clamped - self.zoom).abs() > ZOOM_CHANGE_THRESHOLD {
            self.zoom = clamped;
            self.cached_viewport = None;
        }
    }

    pub fn set_zoom_range(&mut self, min_zoom: f32, max_zoom: f32) {
        if min_zoom.is_finite() && max_zoom.is_finite() && min_zoom > 0.0 && max_zoom > min_zoom {
            self.min_zoom = min_zoom;
            self.max_zoom = max_zoom;
        }
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
            self.cached_viewport = None;
        }
    }

    /// Picks a zoom that frames maps of varying width consistently: maps
    /// at the reference width get zoom 1, wider maps zoom out and narrower
    /// maps zoom in, eased by a sublinear exponent.
    pub fn set_auto_zoom_by_map_width(&mut self, map_width: f32, reference_width: f32) {
        if map_width > 0.0 && reference_width > 0.0 {
            self.set_zoom((reference_width / map_width).powf(ZOOM_SCALING_EXPONENT));
        }
    }

    /// World-space extent of the view. Zoom narrows the field of view, so
    /// effective fov is the base fov divided by zoom. Recomputed only when
    /// distance, zoom, or aspect changes.
    pub fn viewport_size(&mut self) -> Vec2 {
        if let Some(cached) = self.cached_viewport {
            return cached;
        }
        let fov = BASE_FOV_RADIANS / self.zoom;
        let height = 2.0 * self.camera_distance * (fov * 0.5).tan();
        let size = Vec2 {
            x: height * self.aspect_ratio,
            y: height,
        };
        self.cached_viewport = Some(size);
        size
    }

    pub fn view_rect(&mut self) -> Rect {
        let viewport = self.viewport_size();
        Rect::from_center_size(self.smoothed_position, viewport.x, viewport.y)
    }

    /// Advances the camera one tick toward the target. A `None` target
    /// leaves the view where it is.
    pub fn update(&mut self, target: Option<Vec2>) {
        let Some(target) = target else {
            return;
        };

        let mut desired = self.smoothed_position;
        let half_width = self.dead_zone_width * 0.5;
        let half_height = self.dead_zone_height * 0.5;

        let dx = target.x - desired.x;
        if dx > half_width {
            desired.x = target.x - half_width;
        } else if dx < -half_width {
            desired.x = target.x + half_width;
        }

        let dy = target.y - desired.y;
        if dy > half_height {
            desired.y = target.y - half_height;
        } else if dy < -half_height {
            desired.y = target.y + half_height;
        }

        if self.map_bounds_priority {
            desired = self.clamp_to_movable_area(desired);
        }

        self.smoothed_position = self.smoothed_position.lerp(desired, self.follow_speed);
    }

    /// Keeps the viewport inside the movable area. An axis on which the
    /// area is smaller than the viewport collapses to the area center
    /// instead of oscillating between the two edge clamps.
    fn clamp_to_movable_area(&mut self, desired: Vec2) -> Vec2 {
        let Some(area) = self.movable_area else {
            return desired;
        };
        let viewport = self.viewport_size();
        let half_view_width = viewport.x * 0.5;
        let half_view_height = viewport.y * 0.5;

        let x = if area.width() <= viewport.x {
            area.center().x
        } else {
            desired
                .x
                .clamp(area.left + half_view_width, area.right - half_view_width)
        };
        let y = if area.height() <= viewport.y {
            area.center().y
        } else {
            desired
                .y
                .clamp(area.bottom + half_view_height, area.top - half_view_height)
        };
        Vec2 { x, y }
    }
}
