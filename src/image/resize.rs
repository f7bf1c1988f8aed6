//! Bilinear resampling of interleaved f32 grids.
//!
//! Used to bring coarse flow fields and their visualizations back to the
//! input resolution. Sample positions use pixel-center alignment and clamp at
//! the borders.

use crate::util::math::linear_source;

/// Resizes an interleaved `src_w x src_h x channels` buffer.
///
/// Values are interpolated only; they are never rescaled by the size ratio.
pub(crate) fn resize_bilinear(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<f32> {
    debug_assert_eq!(src.len(), src_w * src_h * channels);
    if src_w == dst_w && src_h == dst_h {
        return src.to_vec();
    }

    let cols: Vec<(usize, usize, f32)> = (0..dst_w)
        .map(|x| linear_source(x, src_w, dst_w))
        .collect();

    let mut dst = vec![0.0f32; dst_w * dst_h * channels];
    for y in 0..dst_h {
        let (y0, y1, wy) = linear_source(y, src_h, dst_h);
        let row0 = &src[y0 * src_w * channels..(y0 + 1) * src_w * channels];
        let row1 = &src[y1 * src_w * channels..(y1 + 1) * src_w * channels];
        let out = &mut dst[y * dst_w * channels..(y + 1) * dst_w * channels];
        for (x, &(x0, x1, wx)) in cols.iter().enumerate() {
            for c in 0..channels {
                let a = row0[x0 * channels + c];
                let b = row0[x1 * channels + c];
                let d = row1[x0 * channels + c];
                let e = row1[x1 * channels + c];
                let top = a + (b - a) * wx;
                let bottom = d + (e - d) * wx;
                out[x * channels + c] = top + (bottom - top) * wy;
            }
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::resize_bilinear;

    #[test]
    fn upsampling_constant_stays_constant() {
        let src = vec![-3.0f32; 3 * 2];
        let dst = resize_bilinear(&src, 3, 2, 1, 7, 5);
        assert_eq!(dst.len(), 35);
        assert!(dst.iter().all(|&v| (v + 3.0).abs() < 1e-6));
    }

    #[test]
    fn upsampling_row_interpolates_between_samples() {
        let src = [0.0f32, 4.0];
        let dst = resize_bilinear(&src, 2, 1, 1, 4, 1);
        assert_eq!(dst, vec![0.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn channels_are_interpolated_independently() {
        let src = [0.0f32, 100.0, 4.0, 200.0];
        let dst = resize_bilinear(&src, 2, 1, 2, 4, 1);
        assert_eq!(dst, vec![0.0, 100.0, 1.0, 125.0, 3.0, 175.0, 4.0, 200.0]);
    }
}
