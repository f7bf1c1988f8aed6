use blockflow::{
    estimate_multiscale, render_flow, BlockMatchConfig, BlockMatcher, FlowError, FlowScaling,
    ImagePyramid, ImageView, MultiscaleConfig, MultiscaleFlow,
};

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn small_cfg(max_scale: usize) -> MultiscaleConfig {
    MultiscaleConfig {
        block: BlockMatchConfig {
            half_window: 1,
            search_x: 1,
            search_y: 1,
            ..BlockMatchConfig::default()
        },
        max_scale,
        ..MultiscaleConfig::default()
    }
}

#[test]
fn default_config_uses_three_scales() {
    let cfg = MultiscaleConfig::default();
    assert_eq!(cfg.max_scale, 3);
    assert_eq!(cfg.flow_scaling, FlowScaling::Raw);
    assert_eq!(cfg.block, BlockMatchConfig::default());
}

#[test]
fn outputs_have_one_entry_per_level_coarsest_first() {
    let (width, height) = (40, 32);
    let a = make_image(width, height);
    let b = make_image(width, height);
    let va = ImageView::from_slice(&a, width, height).unwrap();
    let vb = ImageView::from_slice(&b, width, height).unwrap();

    let result = estimate_multiscale(va, vb, &small_cfg(3)).unwrap();
    assert_eq!(result.levels.len(), 3);
    assert_eq!(result.visualizations.len(), 3);

    let order: Vec<_> = result.levels.iter().map(|l| l.level).collect();
    assert_eq!(order, vec![2, 1, 0]);

    let sizes: Vec<_> = result
        .levels
        .iter()
        .map(|l| (l.field.width(), l.field.height()))
        .collect();
    assert_eq!(sizes, vec![(10, 8), (20, 16), (40, 32)]);

    for vis in &result.visualizations {
        assert_eq!((vis.width(), vis.height()), (width, height));
    }
    assert_eq!(
        (result.accumulated.width(), result.accumulated.height()),
        (width, height)
    );
}

#[test]
fn levels_match_single_scale_runs_on_the_pyramid() {
    let (width, height) = (36, 28);
    let a = make_image(width, height);
    let b: Vec<u8> = make_image(width + 1, height)
        .chunks(width + 1)
        .flat_map(|row| row[1..].to_vec())
        .collect();
    let va = ImageView::from_slice(&a, width, height).unwrap();
    let vb = ImageView::from_slice(&b, width, height).unwrap();

    let cfg = small_cfg(2);
    let result = estimate_multiscale(va, vb, &cfg).unwrap();

    let pa = ImagePyramid::build_u8(va, 2).unwrap();
    let pb = ImagePyramid::build_u8(vb, 2).unwrap();
    let matcher = BlockMatcher::new(cfg.block.clone());
    for level in &result.levels {
        let expected = matcher
            .estimate(pa.level(level.level).unwrap(), pb.level(level.level).unwrap())
            .unwrap();
        assert_eq!(level.field, expected);
    }

    let finest = &result.levels[1].field;
    assert_eq!(
        result.visualizations[1],
        render_flow(finest),
        "finest visualization is not resized"
    );
}

/// Two-level run on identical constant frames with `W2 = 1`, `d = 1`.
///
/// Every pixel ties, so each level picks its first valid candidate: `(-1, -1)`
/// wherever `x >= 2` and `y >= 2` at that level's resolution.
fn constant_two_level(flow_scaling: FlowScaling) -> MultiscaleFlow {
    let (width, height) = (32, 24);
    let data = vec![77u8; width * height];
    let view = ImageView::from_slice(&data, width, height).unwrap();
    let cfg = MultiscaleConfig {
        flow_scaling,
        ..small_cfg(2)
    };
    estimate_multiscale(view, view, &cfg).unwrap()
}

#[test]
fn accumulation_sums_upsampled_levels_without_rescaling() {
    let result = constant_two_level(FlowScaling::Raw);
    assert_eq!(result.levels[0].field.at(5, 5), Some((-1.0, -1.0)));
    assert_eq!(result.levels[1].field.at(12, 12), Some((-1.0, -1.0)));

    // Interior pixels whose bilinear sources all lie in the coarse (-1, -1)
    // region: one unit from each level.
    for y in 8..16 {
        for x in 8..24 {
            assert_eq!(
                result.accumulated.at(x, y),
                Some((-2.0, -2.0)),
                "pixel ({x}, {y})"
            );
        }
    }
}

#[test]
fn by_level_scaling_multiplies_coarse_levels() {
    let result = constant_two_level(FlowScaling::ByLevel);

    // Coarse level counts twice, finest once.
    for y in 8..16 {
        for x in 8..24 {
            assert_eq!(
                result.accumulated.at(x, y),
                Some((-3.0, -3.0)),
                "pixel ({x}, {y})"
            );
        }
    }
}

#[test]
fn single_level_equals_single_scale_estimate() {
    let (width, height) = (20, 16);
    let a = make_image(width, height);
    let b: Vec<u8> = a.iter().rev().copied().collect();
    let va = ImageView::from_slice(&a, width, height).unwrap();
    let vb = ImageView::from_slice(&b, width, height).unwrap();

    let cfg = small_cfg(1);
    let result = estimate_multiscale(va, vb, &cfg).unwrap();
    let direct = BlockMatcher::new(cfg.block.clone()).estimate(va, vb).unwrap();
    assert_eq!(result.accumulated, direct);
    assert_eq!(result.visualizations, vec![render_flow(&direct)]);
}

#[test]
fn invalid_scale_requests_are_rejected() {
    let a = make_image(8, 8);
    let va = ImageView::from_slice(&a, 8, 8).unwrap();

    let err = estimate_multiscale(va, va, &small_cfg(0)).unwrap_err();
    assert_eq!(err, FlowError::InvalidInput("max_scale must be at least 1"));

    let err = estimate_multiscale(va, va, &small_cfg(5)).unwrap_err();
    assert!(matches!(err, FlowError::InvalidDimensions { .. }));
}
