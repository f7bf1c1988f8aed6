//! Flow visualization.
//!
//! Direction is encoded as hue and magnitude as saturation, with value fixed
//! at full brightness. Hue uses 8-bit half-degree units (`0..180` covers the
//! wheel) and is computed as `trunc(angle * 90 / pi)`. Saturation is the
//! magnitude min-max normalized to `[0, 255]` per call, so renderings of
//! different fields are not comparable in absolute terms.

use crate::flow::FlowField;
use crate::image::resize::resize_bilinear;
use crate::util::math::cart_to_polar;
use crate::util::{FlowError, FlowResult};
use std::f32::consts::PI;

/// Owned interleaved RGB8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl ColorImage {
    /// Wraps an interleaved RGB buffer of exactly `width * height * 3` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> FlowResult<Self> {
        let needed = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(FlowError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(FlowError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved RGB bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the RGB triple at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Bilinear resize to `width x height`, rounding back to bytes.
    pub fn resized(&self, width: usize, height: usize) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let src: Vec<f32> = self.data.iter().map(|&b| f32::from(b)).collect();
        let dst = resize_bilinear(&src, self.width, self.height, 3, width, height);
        Self {
            data: dst
                .into_iter()
                .map(|value| value.round().clamp(0.0, 255.0) as u8)
                .collect(),
            width,
            height,
        }
    }
}

/// Converts an 8-bit HSV triple (hue in half degrees) to RGB.
pub fn hsv_to_rgb(h: u8, s: u8, v: u8) -> [u8; 3] {
    let value = f32::from(v) / 255.0;
    let sat = f32::from(s) / 255.0;
    if s == 0 {
        let gray = (value * 255.0).round() as u8;
        return [gray, gray, gray];
    }

    let mut hue = f32::from(h) * (6.0 / 180.0);
    if hue >= 6.0 {
        hue -= 6.0;
    }
    let sector = hue.floor();
    let frac = hue - sector;

    let p = value * (1.0 - sat);
    let q = value * (1.0 - sat * frac);
    let t = value * (1.0 - sat * (1.0 - frac));
    let (r, g, b) = match sector as u8 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    let to_byte = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_byte(r), to_byte(g), to_byte(b)]
}

/// Renders a displacement field as an RGB image of the same size.
pub fn render_flow(field: &FlowField) -> ColorImage {
    let polar: Vec<(f32, f32)> = field
        .u()
        .iter()
        .zip(field.v())
        .map(|(&u, &v)| cart_to_polar(u, v))
        .collect();

    let (min_mag, max_mag) = polar
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &(m, _)| {
            (lo.min(m), hi.max(m))
        });
    let range = f64::from(max_mag - min_mag);

    let mut data = Vec::with_capacity(polar.len() * 3);
    for &(magnitude, angle) in &polar {
        // Divide before scaling so the largest magnitude lands on exactly 255.
        let saturation = if range > f64::from(f32::EPSILON) {
            (f64::from(magnitude - min_mag) / range * 255.0) as u8
        } else {
            0
        };
        let hue = (angle * 90.0 / PI) as u8;
        data.extend_from_slice(&hsv_to_rgb(hue, saturation, 255));
    }

    ColorImage {
        data,
        width: field.width(),
        height: field.height(),
    }
}
