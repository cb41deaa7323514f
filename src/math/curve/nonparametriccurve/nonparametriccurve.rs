/// A point in the curve's (time, value) plane.
///
/// `x` runs along the independent axis, `y` along the value axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    x: f64,
    y: f64
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn slope(lhs_pt: &Point2D, rhs_pt: &Point2D) -> f64 {
        (rhs_pt.y - lhs_pt.y) / (rhs_pt.x - lhs_pt.x)
    }
}

/// A curve defined by a finite set of control points.
pub trait NonparametricCurve {
    fn points(&self) -> Vec<Point2D>;

    fn min_x(&self) -> f64;

    fn max_x(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slope_is_symmetric_in_point_order() {
        let handle = Point2D::new(0.4, 0.1);
        let key = Point2D::new(0.5, 0.3);
        assert_eq!(Point2D::slope(&handle, &key), Point2D::slope(&key, &handle));
        assert!((Point2D::slope(&handle, &key) - 2.0).abs() < 1e-12);
    }
}
