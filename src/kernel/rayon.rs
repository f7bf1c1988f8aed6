//! Rayon-parallel block matching (feature-gated).
//!
//! Rows of the displacement field are handed to worker threads as disjoint
//! mutable slices, so no locking is needed and the result is bit-identical to
//! the sequential scan.

use crate::flow::FlowField;
use crate::image::ImageView;
use crate::patch::Patch;
use crate::search::block::{match_row, L2};
use crate::search::BlockMatchConfig;
use crate::util::FlowResult;
use rayon::prelude::*;

/// Row-parallel exhaustive block matching.
///
/// Each worker keeps its own pair of scratch patches.
pub fn block_match_par(
    reference: ImageView<'_, u8>,
    target: ImageView<'_, u8>,
    cfg: &BlockMatchConfig,
) -> FlowResult<FlowField> {
    let width = reference.width();
    let mut field = FlowField::zeros(width, reference.height());
    let half = cfg.half_window;

    let (u, v) = field.components_mut();
    u.par_chunks_mut(width)
        .zip(v.par_chunks_mut(width))
        .enumerate()
        .try_for_each_init(
            || (Patch::zeros(half), Patch::zeros(half)),
            |(ref_patch, cand_patch), (j, (u_row, v_row))| {
                match_row::<L2>(
                    reference, target, cfg, j, u_row, v_row, ref_patch, cand_patch,
                )
            },
        )?;
    Ok(field)
}
