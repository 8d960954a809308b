//! A single span of ground

use super::types::CameraOffset;

/// Slope-intercept form `y = m·x + b` of a non-vertical segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEquation {
    pub slope: f64,
    pub intercept: f64,
}

impl LineEquation {
    /// Perpendicular distance from a point to the infinite line
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let m = self.slope;
        (m * x - y + self.intercept).abs() / (m * m + 1.0).sqrt()
    }

    /// X coordinate of the foot of the perpendicular dropped from a point
    pub fn foot_x(&self, x: f64, y: f64) -> f64 {
        let m = self.slope;
        (m * (y - self.intercept) + x) / (m * m + 1.0)
    }
}

/// An immutable piece of terrain between two world-space endpoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    line: Option<LineEquation>,
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        // Vertical segments have no slope-intercept form
        let line = if x1 == x2 {
            None
        } else {
            let slope = (y2 - y1) / (x2 - x1);
            Some(LineEquation {
                slope,
                intercept: y1 - slope * x1,
            })
        };
        Self {
            x1,
            y1,
            x2,
            y2,
            line,
        }
    }

    /// The line through this segment, or `None` when it is vertical
    pub fn line(&self) -> Option<LineEquation> {
        self.line
    }

    pub fn slope(&self) -> Option<f64> {
        self.line.map(|l| l.slope)
    }

    pub fn intercept(&self) -> Option<f64> {
        self.line.map(|l| l.intercept)
    }

    pub fn is_vertical(&self) -> bool {
        self.line.is_none()
    }

    pub fn min_x(&self) -> f64 {
        self.x1.min(self.x2)
    }

    pub fn max_x(&self) -> f64 {
        self.x1.max(self.x2)
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Distance from a point to the segment's line, `None` for vertical segments
    pub fn distance_to(&self, x: f64, y: f64) -> Option<f64> {
        self.line.map(|l| l.distance_to(x, y))
    }

    /// Height of the segment at `x`, if `x` lies within its span
    pub fn height_at(&self, x: f64) -> Option<f64> {
        let line = self.line?;
        self.contains_x(x).then(|| line.slope * x + line.intercept)
    }

    /// Screen endpoints of the segment if its bounding box touches the given
    /// rectangle after applying the camera offset
    pub fn query_bounds(
        &self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        offset: CameraOffset,
    ) -> Option<[i32; 4]> {
        // NaN bounds count as empty
        if !(x2 > x1 && y2 > y1) {
            return None;
        }
        let (sx1, sy1) = (self.x1 + offset.x, self.y1 + offset.y);
        let (sx2, sy2) = (self.x2 + offset.x, self.y2 + offset.y);
        if sx1.max(sx2) < x1 || sx1.min(sx2) > x2 || sy1.max(sy2) < y1 || sy1.min(sy2) > y2 {
            return None;
        }
        Some([
            sx1.round() as i32,
            sy1.round() as i32,
            sx2.round() as i32,
            sy2.round() as i32,
        ])
    }
}
