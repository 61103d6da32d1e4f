// ==========================================
// 扎包生成与工序流转集成测试
// ==========================================
// 测试目标: 数据集 → 扎包 → 工序子扎包 的完整流程及扎包不变量
// ==========================================

mod test_helpers;

use garment_wip::domain::types::{FormatType, ParseStrategy, SubBundleStatus};
use garment_wip::domain::{BundleOptions, WipDataset};
use garment_wip::engine::{BundleGenerator, LayerPlan, ProductionWorkflow};
use std::collections::{BTreeMap, HashSet};
use test_helpers::{as_slices, create_test_color, cutting_sheet_rows, import_rows};

fn create_test_dataset(colors: Vec<garment_wip::domain::ColorEntry>) -> WipDataset {
    WipDataset::new(
        FormatType::CuttingSheet,
        ParseStrategy::Horizontal,
        colors,
        BTreeMap::new(),
    )
}

#[test]
fn test_truncates_partial_layer() {
    let dataset = create_test_dataset(vec![create_test_color("Blue", &[("L", 62)], 15)]);
    let result = BundleGenerator::generate(&dataset, &BundleOptions::default()).unwrap();

    assert_eq!(result.bundles.len(), 2);
    for bundle in &result.bundles {
        assert_eq!(bundle.piece_count, 30);
        assert_eq!(bundle.pieces_per_layer, 4);
        assert!(!bundle.merged_remainder);
    }
    assert_eq!(result.summary.total_pieces, 60);
    assert_eq!(result.metadata.excluded_pieces, 2);
}

#[test]
fn test_bundle_invariants_hold_across_inputs() {
    let option_sets = [
        (30, 15),
        (25, 10),
        (12, 12),
        (40, 1),
        (30, 25),
        (20, 19),
        (10, 9),
    ];

    for (max, min) in option_sets {
        let options = BundleOptions {
            max_bundle_size: max,
            min_bundle_size: min,
            ..BundleOptions::default()
        };

        for total in 1..=150u32 {
            for layers in [0u32, 1, 3, 7, 15, 40, 200] {
                let dataset =
                    create_test_dataset(vec![create_test_color("Red", &[("M", total)], layers)]);
                let result = BundleGenerator::generate(&dataset, &options).unwrap();
                let plan = LayerPlan::compute(total, layers);
                let usable = plan.actual_garment_count;
                let ctx = format!("max={} min={} total={} layers={}", max, min, total, layers);

                let sum: u32 = result.bundles.iter().map(|b| b.piece_count).sum();
                assert_eq!(sum, usable, "{}", ctx);
                assert!(sum <= total, "{}", ctx);
                let exact = layers * plan.pieces_per_layer == total;
                assert_eq!(sum == total, exact, "{}", ctx);
                assert_eq!(result.metadata.excluded_pieces, total - usable, "{}", ctx);

                let merged = result.bundles.iter().filter(|b| b.merged_remainder).count();
                assert!(merged <= 1, "{}", ctx);
                if usable > 0 {
                    assert_eq!(
                        result.bundles.len() as u32 + merged as u32,
                        usable.div_ceil(max),
                        "{}",
                        ctx
                    );
                }

                for bundle in &result.bundles {
                    assert!(bundle.piece_count > 0, "{}", ctx);
                    if bundle.merged_remainder {
                        assert!(bundle.piece_count > max, "{}", ctx);
                        assert!(bundle.piece_count < max + min, "{}", ctx);
                    } else {
                        assert!(bundle.piece_count <= max, "{}", ctx);
                        if usable >= max {
                            assert!(bundle.piece_count >= min, "{}", ctx);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_in_order_split_shapes() {
    let cases: [(u32, u32, u32, &[(u32, bool)]); 4] = [
        (25, 12, 12, &[(12, false), (13, true)]),
        (70, 30, 25, &[(30, false), (40, true)]),
        (61, 30, 15, &[(30, false), (31, true)]),
        (75, 30, 15, &[(30, false), (30, false), (15, false)]),
    ];

    for (total, max, min, expected) in cases {
        let dataset = create_test_dataset(vec![create_test_color("Red", &[("M", total)], 1)]);
        let options = BundleOptions {
            max_bundle_size: max,
            min_bundle_size: min,
            ..BundleOptions::default()
        };
        let result = BundleGenerator::generate(&dataset, &options).unwrap();
        let shape: Vec<(u32, bool)> = result
            .bundles
            .iter()
            .map(|b| (b.piece_count, b.merged_remainder))
            .collect();
        assert_eq!(shape, expected, "total={} max={} min={}", total, max, min);
    }
}

#[test]
fn test_zero_layers_produce_no_bundles() {
    let dataset = create_test_dataset(vec![create_test_color("Red", &[("M", 40)], 0)]);
    let result = BundleGenerator::generate(&dataset, &BundleOptions::default()).unwrap();

    assert!(result.bundles.is_empty());
    assert_eq!(result.metadata.excluded_pieces, 40);
}

#[test]
fn test_merge_stays_within_color_and_size() {
    let dataset = create_test_dataset(vec![
        create_test_color("Red", &[("M", 35), ("L", 5)], 1),
        create_test_color("Blue", &[("M", 5)], 1),
    ]);
    let options = BundleOptions {
        max_bundle_size: 30,
        min_bundle_size: 20,
        ..BundleOptions::default()
    };
    let result = BundleGenerator::generate(&dataset, &options).unwrap();

    let groups: Vec<(&str, &str, u32, bool)> = result
        .bundles
        .iter()
        .map(|b| (b.color.as_str(), b.size.as_str(), b.piece_count, b.merged_remainder))
        .collect();
    assert_eq!(
        groups,
        vec![
            ("Red", "M", 35, true),
            ("Red", "L", 5, false),
            ("Blue", "M", 5, false),
        ]
    );
}

#[test]
fn test_import_then_generate_cutting_sheet() {
    let rows = cutting_sheet_rows();
    let outcome = import_rows(&as_slices(&rows));
    let result = BundleGenerator::generate(&outcome.dataset, &BundleOptions::default()).unwrap();

    // Navy: S 30+10 → 40, M 30+30, L 30+30, XL 30+10 → 40; Maroon: 各 1 包
    assert_eq!(result.bundles.len(), 10);
    assert_eq!(result.summary.total_pieces, 300);
    assert_eq!(result.metadata.excluded_pieces, 0);
    assert_eq!(result.bundles[0].id, "LOT-42-NAVY-S-1");
    assert_eq!(result.bundles[0].article, "TS-100");
    assert_eq!(result.bundles[0].piece_count, 40);
    assert!(result.bundles[0].merged_remainder);

    let ids: HashSet<&str> = result.bundles.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids.len(), result.bundles.len());

    let globals: Vec<u32> = result.bundles.iter().map(|b| b.global_sequence).collect();
    assert_eq!(globals, (1..=10).collect::<Vec<u32>>());

    let navy = result.summary.by_color.iter().find(|t| t.key == "Navy").unwrap();
    assert_eq!(navy.bundles, 6);
    assert_eq!(navy.pieces, 200);
}

#[test]
fn test_custom_naming_format() {
    let rows = cutting_sheet_rows();
    let outcome = import_rows(&as_slices(&rows));
    let options = BundleOptions {
        garment_type: "polo".to_string(),
        bundle_naming_format: "{article}/{color}/{size}/{globalSequence}".to_string(),
        ..BundleOptions::default()
    };
    let result = BundleGenerator::generate(&outcome.dataset, &options).unwrap();

    assert_eq!(result.bundles[0].id, "TS-100/NAVY/S/001");
    assert_eq!(result.bundles[9].id, "TS-100/MAROON/XL/010");
    assert_eq!(result.metadata.garment_type, "polo");
    assert!(!result.metadata.template_fallback);
}

#[test]
fn test_production_workflow_from_generated_bundles() {
    let dataset = create_test_dataset(vec![create_test_color("Blue", &[("L", 62)], 15)]);
    let result = BundleGenerator::generate(&dataset, &BundleOptions::default()).unwrap();
    let steps_per_bundle = result.bundles[0].process_steps.len();

    let mut subs = BundleGenerator::create_production_workflow(&result.bundles);
    assert_eq!(subs.len(), result.bundles.len() * steps_per_bundle);
    assert_eq!(ProductionWorkflow::ready_sub_bundles(&subs).len(), result.bundles.len());

    let first_id = subs[0].id.clone();
    let second_id = subs[1].id.clone();
    assert_eq!(subs[1].depends_on.as_deref(), Some(first_id.as_str()));

    ProductionWorkflow::assign(&mut subs, &first_id, "OP-7").unwrap();
    ProductionWorkflow::start(&mut subs, &first_id).unwrap();
    ProductionWorkflow::complete(&mut subs, &first_id).unwrap();

    let second = subs.iter().find(|s| s.id == second_id).unwrap();
    assert_eq!(second.status, SubBundleStatus::Ready);
    assert!(subs.iter().all(|s| s.piece_count == 30));
}
