//! Scene descriptors: background bands and point markers.
//!
//! Both descriptor kinds resolve through [`Shape::geometry`] to the same
//! four-vertex [`QuadGeometry`], so the drawer never inspects variant
//! fields. Scene data is immutable once built.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::RenderError;
use crate::geometry::QuadGeometry;

/// An axis-aligned rectangle with one color per corner.
///
/// Corners are stored in strip order: top-left, top-right, bottom-left,
/// bottom-right. Colors interpolate across the quad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub corners: [Vec2; 4],
    pub colors: [Rgba; 4],
}

impl Background {
    /// A `w` x `h` band at `(x, y)` shading from `top` along its upper edge
    /// to `bottom` along its lower edge.
    pub fn band(x: f32, y: f32, w: f32, h: f32, top: Rgba, bottom: Rgba) -> Self {
        Self {
            corners: [
                Vec2::new(x, y),
                Vec2::new(x + w, y),
                Vec2::new(x, y + h),
                Vec2::new(x + w, y + h),
            ],
            colors: [top, top, bottom, bottom],
        }
    }

    /// A band filled with a single color.
    pub fn solid(x: f32, y: f32, w: f32, h: f32, color: Rgba) -> Self {
        Self::band(x, y, w, h, color, color)
    }

    fn validate(&self) -> Result<(), String> {
        if !self.corners.iter().all(|c| c.is_finite()) {
            return Err("corner coordinates must be finite".into());
        }
        if !self.colors.iter().all(|c| c.is_finite()) {
            return Err("corner colors must be finite".into());
        }
        let [tl, tr, bl, br] = self.corners;
        let aligned = tl.y == tr.y && bl.y == br.y && tl.x == bl.x && tr.x == br.x;
        if !aligned {
            return Err(
                "corners must be an axis-aligned rectangle ordered top-left, top-right, bottom-left, bottom-right"
                    .into(),
            );
        }
        if tr.x <= tl.x || bl.y <= tl.y {
            return Err(format!(
                "rectangle must have positive extent, got {}x{}",
                tr.x - tl.x,
                bl.y - tl.y
            ));
        }
        Ok(())
    }
}

/// A square marker of edge length `size` centered at `center`, filled
/// with a single color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMarker {
    pub center: Vec2,
    pub size: f32,
    pub color: Rgba,
}

impl PointMarker {
    pub fn new(x: f32, y: f32, size: f32, color: Rgba) -> Self {
        Self {
            center: Vec2::new(x, y),
            size,
            color,
        }
    }

    /// The four corners in strip order.
    pub fn corners(&self) -> [Vec2; 4] {
        let h = self.size / 2.0;
        let c = self.center;
        [
            Vec2::new(c.x - h, c.y - h),
            Vec2::new(c.x + h, c.y - h),
            Vec2::new(c.x - h, c.y + h),
            Vec2::new(c.x + h, c.y + h),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        if !self.center.is_finite() || !self.size.is_finite() {
            return Err("center and size must be finite".into());
        }
        if self.size <= 0.0 {
            return Err(format!("size must be positive, got {}", self.size));
        }
        if !self.color.is_finite() {
            return Err("color must be finite".into());
        }
        if !self.corners().iter().all(|c| c.is_finite()) {
            return Err("corner coordinates overflow f32".into());
        }
        Ok(())
    }
}

/// Any drawable quad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Background(Background),
    Point(PointMarker),
}

impl Shape {
    /// Resolves the shape to its four-vertex position and color streams.
    ///
    /// Returns `MalformedShape` (with index 0; callers that know the
    /// shape's position in its list re-tag it) if the descriptor does not
    /// form a valid quad.
    pub fn geometry(&self) -> Result<QuadGeometry, RenderError> {
        let malformed = |reason| RenderError::MalformedShape { index: 0, reason };
        match self {
            Shape::Background(bg) => {
                bg.validate().map_err(malformed)?;
                Ok(QuadGeometry::from_vertices(
                    bg.corners,
                    bg.colors.map(Rgba::to_array),
                ))
            }
            Shape::Point(point) => {
                point.validate().map_err(malformed)?;
                Ok(QuadGeometry::from_vertices(
                    point.corners(),
                    [point.color.to_array(); 4],
                ))
            }
        }
    }
}

impl From<Background> for Shape {
    fn from(bg: Background) -> Self {
        Shape::Background(bg)
    }
}

impl From<PointMarker> for Shape {
    fn from(point: PointMarker) -> Self {
        Shape::Point(point)
    }
}

/// The static scene: backgrounds painted first, then points, each group
/// in list order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneData {
    pub backgrounds: Vec<Background>,
    pub points: Vec<PointMarker>,
}

impl SceneData {
    pub fn new(backgrounds: Vec<Background>, points: Vec<PointMarker>) -> Self {
        Self {
            backgrounds,
            points,
        }
    }

    /// The reference scene for an 800x600 surface: three horizontal bands
    /// and five markers.
    pub fn reference() -> Self {
        let backgrounds = vec![
            Background::band(0.0, 0.0, 800.0, 200.0, Rgba::YELLOW, Rgba::RED),
            Background::solid(0.0, 200.0, 800.0, 200.0, Rgba::CYAN),
            Background::solid(0.0, 400.0, 800.0, 200.0, Rgba::BLUE),
        ];
        let points = vec![
            PointMarker::new(150.0, 100.0, 20.0, Rgba::WHITE),
            PointMarker::new(300.0, 150.0, 15.0, Rgba::GREEN),
            PointMarker::new(450.0, 120.0, 25.0, Rgba::BLUE),
            PointMarker::new(200.0, 300.0, 18.0, Rgba::YELLOW),
            PointMarker::new(500.0, 350.0, 22.0, Rgba::MAGENTA),
        ];
        Self::new(backgrounds, points)
    }

    /// Total number of shapes.
    pub fn len(&self) -> usize {
        self.backgrounds.len() + self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shapes in paint order: all backgrounds, then all points.
    pub fn shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        self.backgrounds
            .iter()
            .copied()
            .map(Shape::from)
            .chain(self.points.iter().copied().map(Shape::from))
    }
}
