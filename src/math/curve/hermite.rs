// ─────────────────────────────────────────────────────────────────────────────
// Cubic Hermite segment
// ─────────────────────────────────────────────────────────────────────────────
//
// Normalised basis on the local fraction u = (t - t0) / (t1 - t0):
//
//   h00 = (1 + 2u)(1 - u)^2     h10 = u(1 - u)^2
//   h01 = u^2(3 - 2u)           h11 = u^2(u - 1)
//
//   p(u) = h00·v0 + h10·m0·s + h01·v1 + h11·m1·s,   s = t1 - t0
//
// Slopes m0/m1 are dy/dt, hence the scaling by the segment width.

/// Basis weights at one local parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HermiteBasis {
    pub h00: f64,
    pub h10: f64,
    pub h01: f64,
    pub h11: f64
}

impl HermiteBasis {
    pub fn at(u: f64) -> HermiteBasis {
        let u2 = u * u;
        let iu = 1.0 - u;
        let iu2 = iu * iu;
        let tu = 2.0 * u;
        HermiteBasis {
            h00: (1.0 + tu) * iu2,
            h10: u * iu2,
            h01: u2 * (3.0 - tu),
            h11: u2 * (u - 1.0)
        }
    }

    /// d/du of each basis function.
    pub fn derivative_at(u: f64) -> HermiteBasis {
        let u2 = u * u;
        HermiteBasis {
            h00: 6.0 * u2 - 6.0 * u,
            h10: 3.0 * u2 - 4.0 * u + 1.0,
            h01: 6.0 * u - 6.0 * u2,
            h11: 3.0 * u2 - 2.0 * u
        }
    }

    pub fn combine(&self, v0: f64, m0: f64, v1: f64, m1: f64, scale: f64) -> f64 {
        self.h00 * v0 + self.h10 * m0 * scale + self.h01 * v1 + self.h11 * m1 * scale
    }
}

/// One piece of the keyframe curve, between two neighbouring keyframes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HermiteSegment {
    t0: f64,
    t1: f64,
    v0: f64,
    v1: f64,
    m0: f64,
    m1: f64
}

impl HermiteSegment {
    /// `m0` is the left keyframe's out-tangent, `m1` the right keyframe's
    /// in-tangent.
    pub fn new(t0: f64, v0: f64, m0: f64, t1: f64, v1: f64, m1: f64) -> HermiteSegment {
        HermiteSegment { t0, t1, v0, v1, m0, m1 }
    }

    pub fn width(&self) -> f64 {
        self.t1 - self.t0
    }

    pub fn local_parameter(&self, t: f64) -> f64 {
        (t - self.t0) / self.width()
    }

    pub fn value(&self, t: f64) -> f64 {
        let u = self.local_parameter(t);
        HermiteBasis::at(u).combine(self.v0, self.m0, self.v1, self.m1, self.width())
    }

    /// dy/dt.
    pub fn derivative(&self, t: f64) -> f64 {
        let scale = self.width();
        let u = self.local_parameter(t);
        HermiteBasis::derivative_at(u).combine(self.v0, self.m0, self.v1, self.m1, scale) / scale
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_basis_partition_at_endpoints() {
        let start = HermiteBasis::at(0.0);
        assert_eq!(start, HermiteBasis { h00: 1.0, h10: 0.0, h01: 0.0, h11: 0.0 });
        let end = HermiteBasis::at(1.0);
        assert_eq!(end.h01, 1.0);
        assert_eq!(end.h00, 0.0);
        assert_eq!(end.h10, 0.0);
        assert_eq!(end.h11, 0.0);
    }

    #[test]
    fn test_zero_tangent_midpoint_is_half() {
        let segment = HermiteSegment::new(0.0, 0.0, 0.0, 1.0, 1.0, 0.0);
        assert_eq!(segment.value(0.5), 0.5);
    }

    #[test]
    fn test_linear_tangents_reproduce_line() {
        // slope 2 between (0.25, 0.0) and (0.75, 1.0)
        let segment = HermiteSegment::new(0.25, 0.0, 2.0, 0.75, 1.0, 2.0);
        for i in 0..=10 {
            let t = 0.25 + 0.05 * i as f64;
            assert_abs_diff_eq!(segment.value(t), 2.0 * (t - 0.25), epsilon = 1e-12);
            assert_abs_diff_eq!(segment.derivative(t), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_derivative_matches_tangents_at_ends() {
        let segment = HermiteSegment::new(0.0, 0.2, -1.5, 0.5, 0.8, 3.0);
        assert_abs_diff_eq!(segment.derivative(0.0), -1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(segment.derivative(0.5), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_agrees_with_finite_difference() {
        let segment = HermiteSegment::new(0.1, 0.3, 0.7, 0.9, 0.6, -2.0);
        let h = 1e-6;
        for &t in &[0.2, 0.45, 0.8] {
            let numeric = (segment.value(t + h) - segment.value(t - h)) / (2.0 * h);
            assert_abs_diff_eq!(segment.derivative(t), numeric, epsilon = 1e-6);
        }
    }
}
