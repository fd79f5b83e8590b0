//! Point and color types

use nalgebra::Point3;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A vertex color with every channel in `[0.0, 1.0]`
pub type Color3 = [f64; 3];

/// Normalize an 8-bit color channel into `[0.0, 1.0]`
#[inline]
pub fn normalize_channel(value: u8) -> f64 {
    value as f64 / 255.0
}

/// Normalize an 8-bit RGB triple
pub fn normalize_rgb(rgb: [u8; 3]) -> Color3 {
    rgb.map(normalize_channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_channel_bounds() {
        assert_eq!(normalize_channel(0), 0.0);
        assert_eq!(normalize_channel(255), 1.0);
        assert_relative_eq!(normalize_channel(128), 0.5019607843137255, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_rgb() {
        assert_eq!(normalize_rgb([255, 0, 0]), [1.0, 0.0, 0.0]);
        assert_eq!(normalize_rgb([0, 255, 0]), [0.0, 1.0, 0.0]);
    }
}
