use kurbo::{BezPath, Point};

use crate::foundation::core::{ActivityRecord, Metric};
use crate::foundation::math::OffsetCurve;

/// Canvas measurements every graph is laid out against.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasMetrics {
    pub width: f64,
    pub height: f64,
    /// Shared center of both axes (the canvas is square above the caption band).
    pub center: f64,
    /// Layout unit: one tenth of the width.
    pub factor: f64,
    pub axis_margin: f64,
    pub axis_length: f64,
}

impl CanvasMetrics {
    const AXIS_MARGIN_FACTORS: f64 = 2.35;

    pub fn new(width: f64, height: f64) -> Self {
        let center = width / 2.0;
        let factor = width / 10.0;
        let axis_margin = Self::AXIS_MARGIN_FACTORS * factor;
        Self {
            width,
            height,
            center,
            factor,
            axis_margin,
            axis_length: center - axis_margin,
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self::new(500.0, 560.0)
    }
}

/// Positions of the four quadrilateral vertices.
///
/// Commits and code reviews grow in the negative direction (left and up), issues and pull
/// requests in the positive direction (right and down).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometryDescriptor {
    pub canvas: CanvasMetrics,
    pub code_review_y: f64,
    pub issues_x: f64,
    pub pull_requests_y: f64,
    pub commits_x: f64,
}

impl GeometryDescriptor {
    pub fn compute(record: &ActivityRecord, canvas: CanvasMetrics, curve: OffsetCurve) -> Self {
        let mid = canvas.center;
        let off = |m: Metric| curve.offset(f64::from(record.metric(m)), canvas.axis_length);
        Self {
            canvas,
            code_review_y: mid - off(Metric::CodeReviews),
            issues_x: mid + off(Metric::Issues),
            pull_requests_y: mid + off(Metric::PullRequests),
            commits_x: mid - off(Metric::Commits),
        }
    }

    /// Vertex of `metric` on its axis.
    pub fn vertex(&self, metric: Metric) -> Point {
        let mid = self.canvas.center;
        match metric {
            Metric::CodeReviews => Point::new(mid, self.code_review_y),
            Metric::Issues => Point::new(self.issues_x, mid),
            Metric::PullRequests => Point::new(mid, self.pull_requests_y),
            Metric::Commits => Point::new(self.commits_x, mid),
        }
    }

    /// Closed quadrilateral, clockwise from the code-review vertex.
    pub fn quad_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.vertex(Metric::CodeReviews));
        path.line_to(self.vertex(Metric::Issues));
        path.line_to(self.vertex(Metric::PullRequests));
        path.line_to(self.vertex(Metric::Commits));
        path.close_path();
        path
    }
}

/// A record paired with its computed geometry; the render stage's input.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GraphDescriptor {
    pub record: ActivityRecord,
    pub geometry: GeometryDescriptor,
}

pub fn layout_graph(
    record: ActivityRecord,
    canvas: CanvasMetrics,
    curve: OffsetCurve,
) -> GraphDescriptor {
    let geometry = GeometryDescriptor::compute(&record, canvas, curve);
    GraphDescriptor { record, geometry }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
