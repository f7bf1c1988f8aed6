//! Per-row exhaustive search shared by the sequential and parallel paths.

use crate::flow::FlowField;
use crate::image::ImageView;
use crate::kernel::DistanceKernel;
use crate::patch::Patch;
use crate::search::BlockMatchConfig;
use crate::util::FlowResult;

// Use SIMD when available
#[cfg(not(feature = "simd"))]
pub(crate) use crate::kernel::L2Scalar as L2;
#[cfg(feature = "simd")]
pub(crate) use crate::kernel::L2Simd as L2;

/// Returns true if a patch of half-size `half` centered at `center` fits in
/// `[0, len)`.
#[inline]
fn fits(center: isize, half: isize, len: usize) -> bool {
    center - half >= 0 && center + half < len as isize
}

/// Resolves row `j` of the displacement field.
///
/// `u_row` and `v_row` are the output cells of that row only; `reference`
/// and `target` are read-only, so rows can be processed in any order.
#[allow(clippy::too_many_arguments)]
pub(crate) fn match_row<K: DistanceKernel>(
    reference: ImageView<'_, u8>,
    target: ImageView<'_, u8>,
    cfg: &BlockMatchConfig,
    j: usize,
    u_row: &mut [f32],
    v_row: &mut [f32],
    ref_patch: &mut Patch,
    cand_patch: &mut Patch,
) -> FlowResult<()> {
    let width = reference.width();
    let height = reference.height();
    let w2 = cfg.half_window;
    if j < w2 || j + w2 >= height {
        return Ok(());
    }

    let half = w2 as isize;
    let dx = cfg.search_x as isize;
    let dy = cfg.search_y as isize;

    for i in w2..width.saturating_sub(w2) {
        ref_patch.fill_from(reference, i, j)?;
        let mut best = f32::INFINITY;
        for y in -dy..=dy {
            let cy = j as isize + y;
            if !fits(cy, half, height) {
                continue;
            }
            for x in -dx..=dx {
                let cx = i as isize + x;
                if !fits(cx, half, width) {
                    continue;
                }
                cand_patch.fill_from(target, cx as usize, cy as usize)?;
                let distance = K::distance(ref_patch, cand_patch);
                if distance < best {
                    best = distance;
                    u_row[i] = cfg.encoding.encode(x as i32);
                    v_row[i] = cfg.encoding.encode(y as i32);
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn block_match_seq(
    reference: ImageView<'_, u8>,
    target: ImageView<'_, u8>,
    cfg: &BlockMatchConfig,
) -> FlowResult<FlowField> {
    let width = reference.width();
    let mut field = FlowField::zeros(width, reference.height());
    let mut ref_patch = Patch::zeros(cfg.half_window);
    let mut cand_patch = Patch::zeros(cfg.half_window);

    let (u, v) = field.components_mut();
    for (j, (u_row, v_row)) in u.chunks_mut(width).zip(v.chunks_mut(width)).enumerate() {
        match_row::<L2>(
            reference,
            target,
            cfg,
            j,
            u_row,
            v_row,
            &mut ref_patch,
            &mut cand_patch,
        )?;
    }
    Ok(field)
}
