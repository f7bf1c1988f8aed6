//! Fixed-shape square patches used as the unit of comparison.

use crate::image::ImageView;
use crate::util::{FlowError, FlowResult};

/// Square `side x side` window of intensities stored as f32, row-major.
///
/// `side` is always `2 * half + 1`, so the patch has a well-defined center.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    half: usize,
    side: usize,
    data: Vec<f32>,
}

impl Patch {
    /// Creates a zero-filled patch with half-size `half`.
    pub fn zeros(half: usize) -> Self {
        let side = 2 * half + 1;
        Self {
            half,
            side,
            data: vec![0.0; side * side],
        }
    }

    /// Extracts the patch of `image` centered at `(cx, cy)`.
    pub fn extract(image: ImageView<'_, u8>, cx: usize, cy: usize, half: usize) -> FlowResult<Self> {
        let mut patch = Self::zeros(half);
        patch.fill_from(image, cx, cy)?;
        Ok(patch)
    }

    /// Overwrites this patch with the window of `image` centered at `(cx, cy)`.
    ///
    /// Fails with `RoiOutOfBounds` if any part of the window is outside the
    /// image; the buffer is reused so the hot loop does not allocate.
    pub fn fill_from(&mut self, image: ImageView<'_, u8>, cx: usize, cy: usize) -> FlowResult<()> {
        let (x0, y0) = match (cx.checked_sub(self.half), cy.checked_sub(self.half)) {
            (Some(x0), Some(y0)) => (x0, y0),
            _ => {
                return Err(FlowError::RoiOutOfBounds {
                    x: cx,
                    y: cy,
                    width: self.side,
                    height: self.side,
                    img_width: image.width(),
                    img_height: image.height(),
                })
            }
        };
        let window = image.roi(x0, y0, self.side, self.side)?;
        for (ty, dst) in self.data.chunks_exact_mut(self.side).enumerate() {
            let src = window.row(ty).ok_or(FlowError::InvalidDimensions {
                width: self.side,
                height: self.side,
            })?;
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = f32::from(s);
            }
        }
        Ok(())
    }

    /// Half-size `W2` of the patch.
    pub fn half(&self) -> usize {
        self.half
    }

    /// Side length `2 * W2 + 1`.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Row-major intensities.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Euclidean distance to `other` using the scalar kernel.
    pub fn distance(&self, other: &Patch) -> f32 {
        use crate::kernel::{DistanceKernel, L2Scalar};
        L2Scalar::distance(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::Patch;
    use crate::util::FlowError;
    use crate::ImageView;

    #[test]
    fn extract_reads_centered_window() {
        let data: Vec<u8> = (0u8..25).collect();
        let view = ImageView::from_slice(&data, 5, 5).unwrap();
        let patch = Patch::extract(view, 2, 1, 1).unwrap();
        assert_eq!(patch.side(), 3);
        assert_eq!(
            patch.data(),
            &[1.0, 2.0, 3.0, 6.0, 7.0, 8.0, 11.0, 12.0, 13.0]
        );
    }

    #[test]
    fn extract_near_edge_is_rejected() {
        let data = [0u8; 25];
        let view = ImageView::from_slice(&data, 5, 5).unwrap();
        assert!(matches!(
            Patch::extract(view, 0, 2, 1),
            Err(FlowError::RoiOutOfBounds { .. })
        ));
        assert!(matches!(
            Patch::extract(view, 4, 2, 1),
            Err(FlowError::RoiOutOfBounds { .. })
        ));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = [0u8, 0, 0, 0, 3, 0, 0, 0, 0];
        let b = [0u8, 0, 0, 0, 0, 0, 0, 4, 0];
        let pa = Patch::extract(ImageView::from_slice(&a, 3, 3).unwrap(), 1, 1, 1).unwrap();
        let pb = Patch::extract(ImageView::from_slice(&b, 3, 3).unwrap(), 1, 1, 1).unwrap();
        assert!((pa.distance(&pb) - 5.0).abs() < 1e-6);
        assert_eq!(pa.distance(&pa), 0.0);
    }
}
