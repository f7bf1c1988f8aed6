//! Image pyramid construction for grayscale `u8` images.
//!
//! Downsampling uses a 2x2 box filter with integer rounding:
//! `dst = ((a + b + c + d) + 2) / 4`. Odd trailing rows and columns are
//! dropped, so each level is `floor(w / 2) x floor(h / 2)`.

use crate::image::{ImageView, OwnedImage};
use crate::trace::trace_event;
use crate::util::{FlowError, FlowResult};

/// Owned image pyramid built from a base level.
#[derive(Clone, Debug)]
pub struct ImagePyramid {
    levels: Vec<OwnedImage>,
}

impl ImagePyramid {
    /// Builds a pyramid with exactly `levels` entries.
    ///
    /// Level 0 is a copy of `base`. Requesting more levels than the image can
    /// be halved fails with `InvalidDimensions` instead of returning a shorter
    /// pyramid.
    pub fn build_u8(base: ImageView<'_, u8>, levels: usize) -> FlowResult<Self> {
        if levels == 0 {
            return Err(FlowError::InvalidInput("pyramid needs at least one level"));
        }
        let mut out = Vec::with_capacity(levels);
        out.push(OwnedImage::from_view(base)?);

        while out.len() < levels {
            let prev = &out[out.len() - 1];
            let next = downsample_2x(prev.view())?;
            out.push(next);
        }

        trace_event!(
            "pyramid_built",
            levels = out.len(),
            base_width = base.width(),
            base_height = base.height()
        );
        Ok(Self { levels: out })
    }

    /// Returns all pyramid levels (level 0 is the base resolution).
    pub fn levels(&self) -> &[OwnedImage] {
        &self.levels
    }

    /// Returns the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a successfully built pyramid.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns a view for a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        self.levels.get(index).map(|level| level.view())
    }
}

fn downsample_2x(src: ImageView<'_, u8>) -> FlowResult<OwnedImage> {
    let dst_width = src.width() / 2;
    let dst_height = src.height() / 2;
    if dst_width == 0 || dst_height == 0 {
        return Err(FlowError::InvalidDimensions {
            width: dst_width,
            height: dst_height,
        });
    }

    let mut dst = Vec::with_capacity(dst_width * dst_height);
    for y in 0..dst_height {
        let (row0, row1) = match (src.row(y * 2), src.row(y * 2 + 1)) {
            (Some(r0), Some(r1)) => (r0, r1),
            _ => {
                return Err(FlowError::BufferTooSmall {
                    needed: (y * 2 + 1) * src.stride() + src.width(),
                    got: src.as_slice().len(),
                })
            }
        };
        for x in 0..dst_width {
            let sum = u16::from(row0[2 * x])
                + u16::from(row0[2 * x + 1])
                + u16::from(row1[2 * x])
                + u16::from(row1[2 * x + 1]);
            dst.push(((sum + 2) / 4) as u8);
        }
    }

    OwnedImage::new(dst, dst_width, dst_height)
}
