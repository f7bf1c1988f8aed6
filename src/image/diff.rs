//! Per-pixel absolute difference between two frames.

use crate::image::{ImageView, OwnedImage};
use crate::util::{FlowError, FlowResult};

/// Computes `|a - b|` for every pixel of two equally sized images.
pub fn abs_diff(a: ImageView<'_, u8>, b: ImageView<'_, u8>) -> FlowResult<OwnedImage> {
    a.ensure_same_size(&b)?;
    let width = a.width();
    let height = a.height();
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let (row_a, row_b) = match (a.row(y), b.row(y)) {
            (Some(ra), Some(rb)) => (ra, rb),
            _ => return Err(FlowError::InvalidDimensions { width, height }),
        };
        data.extend(row_a.iter().zip(row_b).map(|(&pa, &pb)| pa.abs_diff(pb)));
    }
    OwnedImage::new(data, width, height)
}
