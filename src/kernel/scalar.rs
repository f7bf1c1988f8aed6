//! Scalar reference kernel for patch distance.

use crate::kernel::DistanceKernel;
use crate::patch::Patch;

/// Euclidean (L2) distance without area normalization.
pub struct L2Scalar;

impl DistanceKernel for L2Scalar {
    fn distance(a: &Patch, b: &Patch) -> f32 {
        assert_eq!(a.side(), b.side(), "patch shapes differ");
        let mut sse = 0.0f32;
        for (&pa, &pb) in a.data().iter().zip(b.data()) {
            let diff = pb - pa;
            sse += diff * diff;
        }
        sse.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::{DistanceKernel, L2Scalar};
    use crate::patch::Patch;
    use crate::ImageView;

    #[test]
    fn l2_matches_bruteforce() {
        let img: Vec<u8> = (0..49).map(|i| ((i * 37 + 11) % 251) as u8).collect();
        let view = ImageView::from_slice(&img, 7, 7).unwrap();
        let a = Patch::extract(view, 2, 2, 2).unwrap();
        let b = Patch::extract(view, 4, 3, 2).unwrap();

        let mut expected = 0.0f64;
        for ty in 0..5 {
            for tx in 0..5 {
                let va = img[ty * 7 + tx] as f64;
                let vb = img[(ty + 1) * 7 + tx + 2] as f64;
                expected += (va - vb) * (va - vb);
            }
        }
        let got = L2Scalar::distance(&a, &b);
        assert!((got as f64 - expected.sqrt()).abs() < 1e-3);
    }

    #[test]
    #[should_panic(expected = "patch shapes differ")]
    fn mismatched_shapes_panic() {
        let _ = L2Scalar::distance(&Patch::zeros(1), &Patch::zeros(2));
    }
}
