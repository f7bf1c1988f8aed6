//! Coarse-to-fine driver over image pyramids.
//!
//! Each level is matched independently; the per-level fields are resized to
//! the input resolution and summed. Levels are processed from the coarsest
//! (`max_scale - 1`) to the finest (0) and every output list keeps that order.

use crate::flow::FlowField;
use crate::image::pyramid::ImagePyramid;
use crate::image::ImageView;
use crate::render::{render_flow, ColorImage};
use crate::search::{BlockMatcher, FlowScaling, MultiscaleConfig};
use crate::trace::{trace_event, trace_span};
use crate::util::{FlowError, FlowResult};

/// Flow estimated at one pyramid level, at that level's resolution.
#[derive(Clone, Debug)]
pub struct LevelFlow {
    /// Pyramid level (0 is full resolution).
    pub level: usize,
    /// Non-accumulated displacement field for this level.
    pub field: FlowField,
}

/// Result of a multiscale estimation.
#[derive(Clone, Debug)]
pub struct MultiscaleFlow {
    /// Sum of all levels at full resolution.
    pub accumulated: FlowField,
    /// Per-level fields, coarsest first.
    pub levels: Vec<LevelFlow>,
    /// Per-level renderings resized to the input size, coarsest first.
    pub visualizations: Vec<ColorImage>,
}

/// Runs block matching over `cfg.max_scale` pyramid levels.
pub fn estimate_multiscale(
    reference: ImageView<'_, u8>,
    target: ImageView<'_, u8>,
    cfg: &MultiscaleConfig,
) -> FlowResult<MultiscaleFlow> {
    reference.ensure_same_size(&target)?;
    if cfg.max_scale == 0 {
        return Err(FlowError::InvalidInput("max_scale must be at least 1"));
    }

    let full_w = reference.width();
    let full_h = reference.height();
    let _span = trace_span!(
        "multiscale",
        width = full_w,
        height = full_h,
        max_scale = cfg.max_scale
    )
    .entered();

    let pyramid_ref = ImagePyramid::build_u8(reference, cfg.max_scale)?;
    let pyramid_tgt = ImagePyramid::build_u8(target, cfg.max_scale)?;
    let matcher = BlockMatcher::new(cfg.block.clone());

    let mut accumulated = FlowField::zeros(full_w, full_h);
    let mut levels = Vec::with_capacity(cfg.max_scale);
    let mut visualizations = Vec::with_capacity(cfg.max_scale);

    for level in (0..cfg.max_scale).rev() {
        let _level_span = trace_span!("multiscale_level", level = level).entered();
        let missing = FlowError::InvalidInput("pyramid level missing");
        let level_ref = pyramid_ref.level(level).ok_or_else(|| missing.clone())?;
        let level_tgt = pyramid_tgt.level(level).ok_or(missing)?;

        let field = matcher.estimate(level_ref, level_tgt)?;

        if level > 0 {
            let mut upsampled = field.resized(full_w, full_h);
            if cfg.flow_scaling == FlowScaling::ByLevel {
                upsampled.scale((1u32 << level) as f32);
            }
            accumulated.accumulate(&upsampled)?;
        } else {
            accumulated.accumulate(&field)?;
        }

        visualizations.push(render_flow(&field).resized(full_w, full_h));
        trace_event!(
            "level_done",
            level = level,
            width = field.width(),
            height = field.height()
        );
        levels.push(LevelFlow { level, field });
    }

    Ok(MultiscaleFlow {
        accumulated,
        levels,
        visualizations,
    })
}
