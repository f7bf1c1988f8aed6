//! Exhaustive block matching and its multiscale driver.
//!
//! `BlockMatcher` resolves one displacement per interior pixel at a single
//! scale. `estimate_multiscale` runs it over an image pyramid and sums the
//! per-level fields at full resolution.

pub(crate) mod block;
pub(crate) mod multiscale;

pub use multiscale::{estimate_multiscale, LevelFlow, MultiscaleFlow};

use crate::flow::{DisplacementEncoding, FlowField};
use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};
use crate::util::FlowResult;

/// Parameters for a single-scale block matching pass.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockMatchConfig {
    /// Patch half-size `W2`; patches are `(2 * W2 + 1)` pixels on a side.
    pub half_window: usize,
    /// Horizontal search radius `dX`.
    pub search_x: usize,
    /// Vertical search radius `dY`.
    pub search_y: usize,
    /// Storage of the selected offsets.
    pub encoding: DisplacementEncoding,
    /// Split rows across the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for BlockMatchConfig {
    fn default() -> Self {
        Self {
            half_window: 3,
            search_x: 3,
            search_y: 3,
            encoding: DisplacementEncoding::Signed,
            parallel: false,
        }
    }
}

/// How coarse-level displacements are combined at full resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlowScaling {
    /// Add upsampled displacements unchanged, in coarse-level pixel units.
    #[default]
    Raw,
    /// Multiply level `k` displacements by `2^k` before adding them.
    ByLevel,
}

/// Parameters for multiscale estimation.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiscaleConfig {
    /// Per-level matcher settings.
    pub block: BlockMatchConfig,
    /// Number of pyramid levels, including full resolution.
    pub max_scale: usize,
    /// Accumulation rule across levels.
    pub flow_scaling: FlowScaling,
}

impl Default for MultiscaleConfig {
    fn default() -> Self {
        Self {
            block: BlockMatchConfig::default(),
            max_scale: 3,
            flow_scaling: FlowScaling::Raw,
        }
    }
}

/// Single-scale brute-force block matcher.
#[derive(Clone, Debug, Default)]
pub struct BlockMatcher {
    cfg: BlockMatchConfig,
}

impl BlockMatcher {
    /// Creates a matcher with the given configuration.
    pub fn new(cfg: BlockMatchConfig) -> Self {
        Self { cfg }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BlockMatchConfig {
        &self.cfg
    }

    /// Estimates the displacement of every interior pixel of `reference`
    /// within `target`.
    ///
    /// For each pixel the search window is scanned with `y` outer and `x`
    /// inner, both ascending, and the first strictly smallest L2 distance
    /// wins. Pixels closer than `half_window` to a border, and pixels with no
    /// in-bounds candidate, keep `(0, 0)`.
    pub fn estimate(
        &self,
        reference: ImageView<'_, u8>,
        target: ImageView<'_, u8>,
    ) -> FlowResult<FlowField> {
        reference.ensure_same_size(&target)?;
        let cfg = &self.cfg;
        let _span = trace_span!(
            "block_match",
            width = reference.width(),
            height = reference.height(),
            half_window = cfg.half_window,
            search_x = cfg.search_x,
            search_y = cfg.search_y,
            parallel = cfg.parallel
        )
        .entered();

        #[cfg(feature = "rayon")]
        let field = if cfg.parallel {
            crate::kernel::rayon::block_match_par(reference, target, cfg)?
        } else {
            block::block_match_seq(reference, target, cfg)?
        };
        // Without rayon the `parallel` flag falls back to the sequential scan.
        #[cfg(not(feature = "rayon"))]
        let field = block::block_match_seq(reference, target, cfg)?;

        trace_event!(
            "block_match_done",
            width = field.width(),
            height = field.height()
        );
        Ok(field)
    }
}
