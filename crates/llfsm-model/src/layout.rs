//! Editor layout data.
//!
//! Positions and curves are pass-through values: nothing in the conversion layer
//! validates or derives them.

use serde::{Deserialize, Serialize};

/// A point (or a size) on the editor canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where a state is drawn and how large it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateLayout {
    /// Top-left corner of the state.
    pub position: Point2D,
    /// Width (`x`) and height (`y`) of the state.
    pub dimensions: Point2D,
}

impl StateLayout {
    pub fn new(position: Point2D, dimensions: Point2D) -> Self {
        Self {
            position,
            dimensions,
        }
    }
}

/// A cubic bezier curve between two states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BezierPath {
    pub source: Point2D,
    pub target: Point2D,
    pub control0: Point2D,
    pub control1: Point2D,
}

impl BezierPath {
    pub fn new(source: Point2D, target: Point2D, control0: Point2D, control1: Point2D) -> Self {
        Self {
            source,
            target,
            control0,
            control1,
        }
    }
}

/// How a transition arrow is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionLayout {
    pub path: BezierPath,
}

impl TransitionLayout {
    pub fn new(path: BezierPath) -> Self {
        Self { path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_json_shape() {
        let layout = TransitionLayout::new(BezierPath::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(3.0, 3.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 2.0),
        ));
        let value = serde_json::to_value(layout).unwrap();
        assert_eq!(value["path"]["control0"]["x"], 1.0);
        assert_eq!(value["path"]["target"]["y"], 3.0);
    }

    #[test]
    fn state_layout_from_json() {
        let json = r#"{"position": {"x": 10, "y": 20}, "dimensions": {"x": 200, "y": 100}}"#;
        let layout: StateLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.position, Point2D::new(10.0, 20.0));
        assert_eq!(layout.dimensions, Point2D::new(200.0, 100.0));
    }
}
