//! SIMD-accelerated patch distance using the `wide` crate.
//!
//! Eight samples are differenced and squared per step; the tail that does not
//! fill a lane group falls back to scalar arithmetic. Results may differ from
//! `L2Scalar` in the last bits because of summation order.

use crate::kernel::DistanceKernel;
use crate::patch::Patch;
use wide::f32x8;

const LANES: usize = 8;

#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

#[inline]
fn hsum(v: f32x8) -> f32 {
    let arr = v.to_array();
    arr[0] + arr[1] + arr[2] + arr[3] + arr[4] + arr[5] + arr[6] + arr[7]
}

/// Vectorized Euclidean (L2) distance.
pub struct L2Simd;

impl DistanceKernel for L2Simd {
    fn distance(a: &Patch, b: &Patch) -> f32 {
        assert_eq!(a.side(), b.side(), "patch shapes differ");
        let da = a.data();
        let db = b.data();
        let simd_end = da.len() / LANES * LANES;

        let mut acc = f32x8::ZERO;
        let mut i = 0;
        while i < simd_end {
            let diff = load_f32x8(&db[i..i + LANES]) - load_f32x8(&da[i..i + LANES]);
            acc += diff * diff;
            i += LANES;
        }

        let mut sse = hsum(acc);
        for (&pa, &pb) in da[simd_end..].iter().zip(&db[simd_end..]) {
            let diff = pb - pa;
            sse += diff * diff;
        }
        sse.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::L2Simd;
    use crate::kernel::{DistanceKernel, L2Scalar};
    use crate::patch::Patch;
    use crate::ImageView;

    #[test]
    fn simd_matches_scalar() {
        let img: Vec<u8> = (0..121).map(|i| ((i * 53 + 7) % 256) as u8).collect();
        let view = ImageView::from_slice(&img, 11, 11).unwrap();
        for half in 1..=3 {
            let a = Patch::extract(view, 5, 5, half).unwrap();
            let b = Patch::extract(view, 4 + half % 2, 6, half).unwrap();
            let scalar = L2Scalar::distance(&a, &b);
            let simd = L2Simd::distance(&a, &b);
            assert!((scalar - simd).abs() <= 1e-3 * scalar.max(1.0));
        }
    }
}
