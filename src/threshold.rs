//! Residual thresholds.
//!
//! Problems working on bearing vectors report residuals of the form
//! `1 - dot(measured, reprojected)` for unit vectors. An angular tolerance `q`
//! maps to the cutoff `1 - cos(q)` on that scale, so the comparison in the
//! scoring loop never needs an inverse trigonometric function.

/// Scalar cutoff compared against every entry of a residual vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    /// Use `cutoff` as-is, in whatever units the problem's residuals have.
    pub fn absolute(cutoff: f64) -> Self {
        Self(cutoff)
    }

    /// Cutoff for `1 - cos` residuals from an angular tolerance in radians.
    pub fn from_angle(angle: f64) -> Self {
        Self(1.0 - angle.cos())
    }

    /// Cutoff from a pixel tolerance and the focal length in pixels.
    ///
    /// The tolerance is turned into the angle `atan(pixels / focal_length)`
    /// subtended at the camera centre.
    pub fn from_pixels(pixels: f64, focal_length: f64) -> Self {
        Self::from_angle((pixels / focal_length).atan())
    }

    /// The raw cutoff value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Angle whose `1 - cos` equals this cutoff.
    ///
    /// Only meaningful for thresholds on the angular scale.
    pub fn angle(&self) -> f64 {
        (1.0 - self.0).clamp(-1.0, 1.0).acos()
    }

    /// Whether `residual` counts as an inlier. NaN and infinities never do.
    #[inline]
    pub fn is_inlier(&self, residual: f64) -> bool {
        residual.is_finite() && residual < self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::absolute(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Threshold;
    use approx::assert_relative_eq;

    #[test]
    fn angular_cutoff_is_one_minus_cos() {
        for q in [1e-4, 0.01, 0.1, 0.5, 1.0] {
            let t = Threshold::from_angle(q);
            assert_relative_eq!(t.value(), 1.0 - f64::cos(q), epsilon = 1e-15);
            assert_relative_eq!(t.angle(), q, epsilon = 1e-7);
        }
    }

    #[test]
    fn pixel_cutoff_uses_subtended_angle() {
        let t = Threshold::from_pixels(2.0, 800.0);
        let q = (2.0f64 / 800.0).atan();
        assert_relative_eq!(t.value(), 1.0 - q.cos(), epsilon = 1e-15);
    }

    #[test]
    fn nan_residual_is_outlier() {
        let t = Threshold::absolute(0.5);
        assert!(t.is_inlier(0.1));
        assert!(t.is_inlier(-0.1));
        assert!(!t.is_inlier(0.5));
        assert!(!t.is_inlier(f64::NAN));
        assert!(!t.is_inlier(f64::INFINITY));
        assert!(!t.is_inlier(f64::NEG_INFINITY));
    }
}
