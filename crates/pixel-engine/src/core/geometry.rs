use glam::Vec2;

/// Axis-aligned rectangle in scene-local pixel coordinates.
///
/// Used for hit boxes and movement regions. `x`/`y` is the top-left corner,
/// Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Square box of side `2 * radius` centered on `center`.
    pub fn from_center_radius(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open overlap test: rectangles that only share an edge do not
    /// intersect, and an empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open point containment (left/top edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }
}

/// Movement region with independently disabled edges.
///
/// A `None` edge is not clamped at all. Used by physics actors that must stay
/// inside less than the full world, e.g. a ball kept below the HUD strip but
/// free to leave through the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LimitRect {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
}

impl LimitRect {
    /// Every edge disabled.
    pub const NONE: LimitRect = LimitRect {
        left: None,
        top: None,
        right: None,
        bottom: None,
    };

    /// All four edges enabled.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
        }
    }

    /// Build from edge values where any negative value (conventionally `-1`)
    /// disables that edge.
    pub fn from_sentinel(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        let edge = |v: f32| (v >= 0.0 && v.is_finite()).then_some(v);
        Self {
            left: edge(left),
            top: edge(top),
            right: edge(right),
            bottom: edge(bottom),
        }
    }

    // -- Builder pattern --

    pub fn with_left(mut self, left: Option<f32>) -> Self {
        self.left = left;
        self
    }

    pub fn with_top(mut self, top: Option<f32>) -> Self {
        self.top = top;
        self
    }

    pub fn with_right(mut self, right: Option<f32>) -> Self {
        self.right = right;
        self
    }

    pub fn with_bottom(mut self, bottom: Option<f32>) -> Self {
        self.bottom = bottom;
        self
    }

    /// Whether no edge is enabled.
    pub fn is_unbounded(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.right.is_none() && self.bottom.is_none()
    }
}
