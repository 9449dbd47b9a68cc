/// 2D vector in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, target: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }

    pub fn distance_to(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned box in a y-up world. `bottom < top` always holds for a
/// well-formed rect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Rect {
    pub fn from_center_size(center: Vec2, width: f32, height: f32) -> Self {
        let half_width = width * 0.5;
        let half_height = height * 0.5;
        Self {
            left: center.x - half_width,
            right: center.x + half_width,
            bottom: center.y - half_height,
            top: center.y + half_height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: (self.left + self.right) * 0.5,
            y: (self.bottom + self.top) * 0.5,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn scaled_about_center(&self, scale: f32) -> Rect {
        Rect::from_center_size(self.center(), self.width() * scale, self.height() * scale)
    }

    /// Strict overlap: boxes that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.bottom < other.top
            && self.top > other.bottom
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            bottom: self.bottom.min(other.bottom),
            top: self.top.max(other.top),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_moves_proportionally() {
        let from = Vec2::new(0.0, 0.0);
        let to = Vec2::new(10.0, -4.0);

        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
        assert_eq!(from.lerp(to, 0.5), Vec2::new(5.0, -2.0));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        assert!((a.distance_to(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn from_center_size_round_trips() {
        let rect = Rect::from_center_size(Vec2::new(3.0, -1.0), 4.0, 2.0);

        assert_eq!(rect.center(), Vec2::new(3.0, -1.0));
        assert_eq!(rect.width(), 4.0);
        assert_eq!(rect.height(), 2.0);
    }

    #[test]
    fn edge_touching_rects_do_not_overlap() {
        let a = Rect::from_center_size(Vec2::new(0.0, 0.0), 2.0, 2.0);
        let b = Rect::from_center_size(Vec2::new(2.0, 0.0), 2.0, 2.0);
        let c = Rect::from_center_size(Vec2::new(1.9, 0.0), 2.0, 2.0);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn union_covers_both_rects() {
        let a = Rect::from_center_size(Vec2::new(0.0, 0.0), 2.0, 2.0);
        let b = Rect::from_center_size(Vec2::new(5.0, 1.0), 2.0, 2.0);
        let merged = a.union(&b);

        assert_eq!(merged.left, -1.0);
        assert_eq!(merged.right, 6.0);
        assert_eq!(merged.bottom, -1.0);
        assert_eq!(merged.top, 2.0);
    }

    #[test]
    fn scaled_about_center_keeps_center() {
        let rect = Rect::from_center_size(Vec2::new(2.0, 2.0), 2.0, 2.0);
        let shrunk = rect.scaled_about_center(0.5);

        assert_eq!(shrunk.center(), Vec2::new(2.0, 2.0));
        assert_eq!(shrunk.width(), 1.0);
        assert_eq!(shrunk.height(), 1.0);
    }
}
