//! Region shapes traced over an image.

mod color;

pub use color::{SerializableColor, parse_css_color};

use crate::hit_test::{FillRule, point_in_polygon};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Identifier of a shape within one canvas.
///
/// Only unique among the shapes currently stored in a canvas; see
/// [`IdPolicy`](crate::settings::IdPolicy).
pub type ShapeId = u32;

/// Minimum number of vertices for a closed region.
pub const MIN_SHAPE_POINTS: usize = 3;

/// A finalized, closed polygon region with an optional note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    /// Vertices in drawing order. The last one connects back to the first.
    pub(crate) coords: Vec<Point>,
    /// Free-text note attached by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) annotation: Option<String>,
}

impl Shape {
    pub(crate) fn new(id: ShapeId, coords: Vec<Point>) -> Self {
        Self {
            id,
            coords,
            annotation: None,
        }
    }

    /// Identifier within the owning canvas.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Polygon vertices.
    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Returns true if the shape has no vertices.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Attached note, if any.
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Axis-aligned bounding box of the vertices.
    pub fn bounds(&self) -> Rect {
        if self.coords.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.coords {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Closed path through the vertices, for kurbo-based renderers.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        let Some(first) = self.coords.first() else {
            return path;
        };

        path.move_to(*first);
        for point in self.coords.iter().skip(1) {
            path.line_to(*point);
        }
        path.close_path();

        path
    }

    /// Check whether `point` lies inside the closed polygon.
    pub fn contains(&self, point: Point, rule: FillRule) -> bool {
        match rule {
            FillRule::EvenOdd => point_in_polygon(point, &self.coords),
            FillRule::NonZero => {
                use kurbo::Shape as _;
                self.coords.len() >= MIN_SHAPE_POINTS && self.to_path().winding(point) != 0
            }
        }
    }
}
