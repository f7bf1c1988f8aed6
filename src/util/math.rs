//! Small numeric helpers shared by the matcher and the renderer.

use std::f32::consts::PI;

/// Converts a displacement vector to `(magnitude, angle)`.
///
/// The angle is measured with `atan2(v, u)` and wrapped to `[0, 2*pi)`.
pub(crate) fn cart_to_polar(u: f32, v: f32) -> (f32, f32) {
    let magnitude = (u * u + v * v).sqrt();
    let mut angle = v.atan2(u);
    if angle < 0.0 {
        angle += 2.0 * PI;
    }
    if angle >= 2.0 * PI {
        angle -= 2.0 * PI;
    }
    (magnitude, angle)
}

/// Bilinear source coordinate for an output sample, using pixel-center
/// alignment. Returns `(i0, i1, weight_of_i1)`.
pub(crate) fn linear_source(dst: usize, src_len: usize, dst_len: usize) -> (usize, usize, f32) {
    let scale = src_len as f32 / dst_len as f32;
    let pos = ((dst as f32 + 0.5) * scale - 0.5).max(0.0);
    let i0 = pos.floor() as usize;
    let last = src_len - 1;
    if i0 >= last {
        return (last, last, 0.0);
    }
    (i0, i0 + 1, pos - i0 as f32)
}

#[cfg(test)]
mod tests {
    use super::{cart_to_polar, linear_source};
    use std::f32::consts::PI;

    #[test]
    fn cart_to_polar_wraps_negative_angles() {
        let (mag, angle) = cart_to_polar(0.0, -1.0);
        assert!((mag - 1.0).abs() < 1e-6);
        assert!((angle - 1.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn cart_to_polar_zero_vector() {
        let (mag, angle) = cart_to_polar(0.0, 0.0);
        assert_eq!(mag, 0.0);
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn linear_source_doubles_resolution() {
        assert_eq!(linear_source(0, 2, 4), (0, 1, 0.0));
        let (i0, i1, w) = linear_source(1, 2, 4);
        assert_eq!((i0, i1), (0, 1));
        assert!((w - 0.25).abs() < 1e-6);
        let (i0, i1, w) = linear_source(2, 2, 4);
        assert_eq!((i0, i1), (0, 1));
        assert!((w - 0.75).abs() < 1e-6);
        assert_eq!(linear_source(3, 2, 4), (1, 1, 0.0));
    }

    #[test]
    fn linear_source_identity() {
        for i in 0..5 {
            let (i0, _, w) = linear_source(i, 5, 5);
            assert_eq!(i0, i);
            assert!(w.abs() < 1e-6);
        }
    }
}
