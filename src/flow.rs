//! Dense displacement fields.

use crate::image::resize::resize_bilinear;
use crate::util::{FlowError, FlowResult};

/// How an integer displacement is stored in the f32 field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplacementEncoding {
    /// Store the signed offset as-is (`-2` becomes `-2.0`).
    #[default]
    Signed,
    /// Narrow through `u8` before widening, so negative offsets wrap
    /// (`-1` becomes `255.0`). Reproduces the reference lab output.
    WrappingU8,
}

impl DisplacementEncoding {
    /// Encodes a search offset for storage.
    #[inline]
    pub fn encode(self, offset: i32) -> f32 {
        match self {
            DisplacementEncoding::Signed => offset as f32,
            DisplacementEncoding::WrappingU8 => f32::from(offset as u8),
        }
    }
}

/// Per-pixel horizontal (`u`) and vertical (`v`) displacement, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    width: usize,
    height: usize,
    u: Vec<f32>,
    v: Vec<f32>,
}

impl FlowField {
    /// Creates a zero field.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            u: vec![0.0; width * height],
            v: vec![0.0; width * height],
        }
    }

    /// Wraps existing component buffers.
    pub fn from_parts(width: usize, height: usize, u: Vec<f32>, v: Vec<f32>) -> FlowResult<Self> {
        let needed = width
            .checked_mul(height)
            .ok_or(FlowError::InvalidDimensions { width, height })?;
        if u.len() != needed || v.len() != needed {
            return Err(FlowError::BufferTooSmall {
                needed,
                got: u.len().min(v.len()),
            });
        }
        Ok(Self {
            width,
            height,
            u,
            v,
        })
    }

    /// Field width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Horizontal components, row-major.
    pub fn u(&self) -> &[f32] {
        &self.u
    }

    /// Vertical components, row-major.
    pub fn v(&self) -> &[f32] {
        &self.v
    }

    /// Returns `(u, v)` at pixel `(x, y)`.
    pub fn at(&self, x: usize, y: usize) -> Option<(f32, f32)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.u[idx], self.v[idx]))
    }

    pub(crate) fn components_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.u, &mut self.v)
    }

    /// Bilinearly resamples both components to `width x height`.
    ///
    /// Displacement values are interpolated but not rescaled.
    pub fn resized(&self, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            u: resize_bilinear(&self.u, self.width, self.height, 1, width, height),
            v: resize_bilinear(&self.v, self.width, self.height, 1, width, height),
        }
    }

    /// Multiplies both components by `factor`.
    pub fn scale(&mut self, factor: f32) {
        self.u.iter_mut().for_each(|value| *value *= factor);
        self.v.iter_mut().for_each(|value| *value *= factor);
    }

    /// Adds `other` component-wise into `self`.
    pub fn accumulate(&mut self, other: &FlowField) -> FlowResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(FlowError::DimensionMismatch {
                left_width: self.width,
                left_height: self.height,
                right_width: other.width,
                right_height: other.height,
            });
        }
        for (dst, src) in self.u.iter_mut().zip(&other.u) {
            *dst += src;
        }
        for (dst, src) in self.v.iter_mut().zip(&other.v) {
            *dst += src;
        }
        Ok(())
    }
}
