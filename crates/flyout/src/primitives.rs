use glam::Vec2;

/// A 2D point in viewport (client) coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a point at the origin (0, 0)
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Offset this point by a vector
    pub fn offset(self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }
}

impl From<[f32; 2]> for Point {
    fn from(arr: [f32; 2]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
        }
    }
}

impl From<Point> for Vec2 {
    fn from(point: Point) -> Self {
        Vec2::new(point.x, point.y)
    }
}

impl From<Vec2> for Point {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Width and height of a surface or viewport
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// Apply an optional max-size clamp, one axis at a time
    pub fn clamped(self, max: MaxSize) -> Self {
        Self {
            width: max.width.map_or(self.width, |w| self.width.min(w.max(0.0))),
            height: max
                .height
                .map_or(self.height, |h| self.height.min(h.max(0.0))),
        }
    }
}

/// Axis-aligned rectangle defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Rect {
    pub const fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: [f32; 2], size: [f32; 2]) -> Self {
        Self {
            min,
            max: [min[0] + size[0], min[1] + size[1]],
        }
    }

    /// Build a rect from a DOMRect-style `left, top, width, height` quadruple
    pub fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::from_min_size([left, top], [width, height])
    }

    /// A zero-size rect at a point
    pub fn from_point(point: Point) -> Self {
        Self {
            min: [point.x, point.y],
            max: [point.x, point.y],
        }
    }

    pub fn left(&self) -> f32 {
        self.min[0]
    }

    pub fn top(&self) -> f32 {
        self.min[1]
    }

    pub fn right(&self) -> f32 {
        self.max[0]
    }

    pub fn bottom(&self) -> f32 {
        self.max[1]
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min[0] + self.width() / 2.0,
            self.min[1] + self.height() / 2.0,
        )
    }

    /// Check if a point is inside this rectangle (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min[0]
            && point.x <= self.max[0]
            && point.y >= self.min[1]
            && point.y <= self.max[1]
    }

    /// Smallest rect containing both rects
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// Convert min corner to Point
    pub fn min_point(&self) -> Point {
        Point::new(self.min[0], self.min[1])
    }
}

/// Optional max-width / max-height applied to a surface
///
/// Anchor avoidance only ever sets one of the two.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaxSize {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl MaxSize {
    pub const NONE: Self = Self {
        width: None,
        height: None,
    };

    pub const fn width(width: f32) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub const fn height(height: f32) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    pub fn is_none(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}
