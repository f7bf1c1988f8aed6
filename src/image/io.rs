//! Convenience helpers for loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::OwnedImage;
use crate::render::ColorImage;
use crate::util::{FlowError, FlowResult};
use std::path::Path;

fn io_error(err: image::ImageError) -> FlowError {
    FlowError::ImageIo {
        reason: err.to_string(),
    }
}

/// Creates an owned grayscale image from a dynamic image (luma conversion).
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> FlowResult<OwnedImage> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> FlowResult<OwnedImage> {
    let img = image::open(path).map_err(io_error)?;
    owned_from_dynamic_image(&img)
}

/// Converts a rendered flow image into an `image::RgbImage`.
pub fn to_rgb_image(img: &ColorImage) -> FlowResult<image::RgbImage> {
    image::RgbImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .ok_or(FlowError::BufferTooSmall {
            needed: img.width() * img.height() * 3,
            got: img.data().len(),
        })
}

/// Saves a rendered flow image; the format follows the file extension.
pub fn save_color_image<P: AsRef<Path>>(img: &ColorImage, path: P) -> FlowResult<()> {
    to_rgb_image(img)?.save(path).map_err(io_error)
}

/// Saves a grayscale image; the format follows the file extension.
pub fn save_gray_image<P: AsRef<Path>>(img: &OwnedImage, path: P) -> FlowResult<()> {
    let gray = image::GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .ok_or(FlowError::BufferTooSmall {
            needed: img.width() * img.height(),
            got: img.data().len(),
        })?;
    gray.save(path).map_err(io_error)
}
