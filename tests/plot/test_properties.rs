use proptest::prelude::*;

use plot_compat::{
    EngineVersion, Layout, OperationKind, OptionMap, PlotWarning, Translator, resolve_labels,
};

fn layout_strategy() -> impl Strategy<Value = Layout> {
    proptest::collection::vec((-1.0e6..1.0e6f64, -1.0e6..1.0e6f64), 1..40)
        .prop_map(|points| points.into_iter().enumerate().collect())
}

fn version_strategy() -> impl Strategy<Value = EngineVersion> {
    (3..5u32, 0..15u32, 0..5u32).prop_map(|(a, b, c)| EngineVersion::new(a, b, c))
}

fn wide_layout_strategy() -> impl Strategy<Value = Layout> {
    let coord = -f64::MAX / 2.0..f64::MAX / 2.0;
    proptest::collection::vec((coord.clone(), coord), 1..20)
        .prop_map(|points| points.into_iter().enumerate().collect())
}

proptest! {
    #[test]
    fn prop_rescale_lands_in_unit_square(layout in layout_strategy()) {
        let scaled = layout.rescaled();
        prop_assert_eq!(scaled.len(), layout.len());
        for (_, p) in scaled.iter() {
            prop_assert!((0.0..=1.0).contains(&p.x), "x = {}", p.x);
            prop_assert!((0.0..=1.0).contains(&p.y), "y = {}", p.y);
        }
    }

    #[test]
    fn prop_rescale_wide_extent_stays_in_unit_square(layout in wide_layout_strategy()) {
        for (_, p) in layout.rescaled().iter() {
            prop_assert!((0.0..=1.0).contains(&p.x), "x = {}", p.x);
            prop_assert!((0.0..=1.0).contains(&p.y), "y = {}", p.y);
        }
    }

    #[test]
    fn prop_rescale_preserves_axis_order(layout in layout_strategy()) {
        let scaled = layout.rescaled();
        let pairs: Vec<_> = layout.iter().zip(scaled.iter()).collect();
        for ((_, a), (_, sa)) in &pairs {
            for ((_, b), (_, sb)) in &pairs {
                if a.x < b.x {
                    prop_assert!(sa.x <= sb.x);
                }
                if a.y < b.y {
                    prop_assert!(sa.y <= sb.y);
                }
            }
        }
    }

    #[test]
    fn prop_short_labels_cycle_with_one_warning(
        labels in proptest::collection::vec("[a-z]{1,6}", 1..6),
        extra in 1..10usize,
    ) {
        let count = labels.len() + extra;
        let resolved = resolve_labels(Some(labels.as_slice()), count, false).unwrap();
        prop_assert_eq!(resolved.labels.len(), count);
        for (i, label) in resolved.labels.iter().enumerate() {
            prop_assert_eq!(label, &labels[i % labels.len()]);
        }
        prop_assert_eq!(
            resolved.warnings,
            vec![PlotWarning::LabelsPadded { given: labels.len(), expected: count }]
        );
    }

    #[test]
    fn prop_padding_never_fails_in_strict_mode(
        labels in proptest::collection::vec("[a-z]{1,6}", 1..6),
        extra in 0..10usize,
    ) {
        let count = labels.len() + extra;
        prop_assert!(resolve_labels(Some(labels.as_slice()), count, true).is_ok());
    }

    #[test]
    fn prop_never_both_orientation_spellings(
        version in version_strategy(),
        vert in proptest::option::of(any::<bool>()),
        horizontal in proptest::option::of(any::<bool>()),
        box_plot in any::<bool>(),
    ) {
        let mut options = OptionMap::new();
        if let Some(vert) = vert {
            options.insert("vert", vert);
        }
        if let Some(horizontal) = horizontal {
            options.insert("orientation", if horizontal { "horizontal" } else { "vertical" });
        }
        let op = if box_plot { OperationKind::Box } else { OperationKind::Violin };
        let out = Translator::default().translate(op, options, version, 1).unwrap();
        prop_assert!(!(out.contains_key("vert") && out.contains_key("orientation")));
        let expected = if version >= EngineVersion::V3_10_0 { "orientation" } else { "vert" };
        if vert.is_some() || horizontal.is_some() {
            prop_assert!(out.contains_key(expected));
        }
    }

    #[test]
    fn prop_hatch_expands_to_artifact_count(
        version in version_strategy(),
        artifacts in 1..12usize,
    ) {
        let options = OptionMap::new().with("hatch", "o");
        let out = Translator::default()
            .translate(OperationKind::Violin, options, version, artifacts)
            .unwrap();
        prop_assert!(!out.contains_key("hatch"));
        prop_assert_eq!(out.get("hatches").map(|h| h.entry_count()), Some(artifacts));
    }
}
