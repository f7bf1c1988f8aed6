#![cfg(feature = "rayon")]

use blockflow::{
    estimate_multiscale, BlockMatchConfig, BlockMatcher, DisplacementEncoding, ImageView,
    MultiscaleConfig,
};

fn make_image(width: usize, height: usize, salt: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 11 + salt) ^ (y * 3) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

#[test]
fn parallel_matches_sequential_single_scale() {
    let (width, height) = (64, 48);
    let a = make_image(width, height, 0);
    let b = make_image(width, height, 5);
    let va = ImageView::from_slice(&a, width, height).unwrap();
    let vb = ImageView::from_slice(&b, width, height).unwrap();

    for encoding in [DisplacementEncoding::Signed, DisplacementEncoding::WrappingU8] {
        let base = BlockMatchConfig {
            encoding,
            ..BlockMatchConfig::default()
        };
        let seq = BlockMatcher::new(BlockMatchConfig {
            parallel: false,
            ..base.clone()
        })
        .estimate(va, vb)
        .unwrap();
        let par = BlockMatcher::new(BlockMatchConfig {
            parallel: true,
            ..base
        })
        .estimate(va, vb)
        .unwrap();
        assert_eq!(seq, par);
    }
}

#[test]
fn parallel_matches_sequential_multiscale() {
    let (width, height) = (72, 56);
    let a = make_image(width, height, 0);
    let b = make_image(width, height, 2);
    let va = ImageView::from_slice(&a, width, height).unwrap();
    let vb = ImageView::from_slice(&b, width, height).unwrap();

    let seq_cfg = MultiscaleConfig::default();
    let par_cfg = MultiscaleConfig {
        block: BlockMatchConfig {
            parallel: true,
            ..BlockMatchConfig::default()
        },
        ..MultiscaleConfig::default()
    };

    let seq = estimate_multiscale(va, vb, &seq_cfg).unwrap();
    let par = estimate_multiscale(va, vb, &par_cfg).unwrap();
    assert_eq!(seq.accumulated, par.accumulated);
    assert_eq!(seq.visualizations, par.visualizations);
}
