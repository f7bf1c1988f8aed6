//! Blockflow estimates dense optical flow by brute-force block matching.
//!
//! The crate provides an exhaustive single-scale matcher, a multiscale driver
//! over 2x image pyramids and an HSV flow renderer. Row parallelism is
//! available via the `rayon` feature, a vectorized distance kernel via
//! `simd`, and image file helpers via `image-io`.

pub mod flow;
pub mod image;
pub mod kernel;
pub mod patch;
pub mod render;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use crate::image::pyramid::ImagePyramid;
pub use crate::image::{abs_diff, ImageView, OwnedImage};
pub use flow::{DisplacementEncoding, FlowField};
pub use kernel::{DistanceKernel, L2Scalar};
pub use patch::Patch;
pub use render::{hsv_to_rgb, render_flow, ColorImage};
pub use search::{
    estimate_multiscale, BlockMatchConfig, BlockMatcher, FlowScaling, LevelFlow, MultiscaleConfig,
    MultiscaleFlow,
};
pub use util::{FlowError, FlowResult};
