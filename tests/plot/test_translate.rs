//! Keyword translation through the public API.

use plot_compat::translate::{Rewrite, Rule, VersionRange};
use plot_compat::{
    EngineVersion, OperationKind, OptionMap, OptionValue, PlotError, RuleTable, Translator,
    translate_tokens,
};

fn v(major: u32, minor: u32, patch: u32) -> EngineVersion {
    EngineVersion::new(major, minor, patch)
}

// ── Built-in rules ───────────────────────────────────────────────────────────

#[test]
fn test_orientation_boundary_is_3_10_0() {
    let t = Translator::default();
    let options = OptionMap::new().with("vert", false);
    let last_old = t
        .translate(OperationKind::Box, options.clone(), v(3, 9, 99), 1)
        .unwrap();
    let first_new = t
        .translate(OperationKind::Box, options, v(3, 10, 0), 1)
        .unwrap();
    assert_eq!(last_old.get("vert"), Some(&OptionValue::Bool(false)));
    assert_eq!(
        first_new.get("orientation"),
        Some(&OptionValue::Text("horizontal".to_string()))
    );
}

#[test]
fn test_translation_keeps_key_order() {
    let options = OptionMap::new()
        .with("widths", 0.5)
        .with("vert", true)
        .with("showmeans", true);
    let out = Translator::default()
        .translate(OperationKind::Violin, options, v(3, 10, 0), 2)
        .unwrap();
    assert_eq!(
        out.keys().collect::<Vec<_>>(),
        vec!["widths", "orientation", "showmeans"]
    );
}

#[test]
fn test_graph_operations_are_identity() {
    let options = OptionMap::new().with("vert", true).with("hatch", "/");
    for op in [
        OperationKind::GraphNodes,
        OperationKind::GraphEdges,
        OperationKind::GraphLabels,
        OperationKind::Inset,
    ] {
        let out = Translator::default()
            .translate(op, options.clone(), v(3, 10, 0), 4)
            .unwrap();
        assert_eq!(out, options, "{op}");
    }
}

#[test]
fn test_invalid_orientation_value() {
    let options = OptionMap::new().with("orientation", "diagonal");
    let err = Translator::default()
        .translate(OperationKind::Violin, options, v(3, 10, 0), 1)
        .unwrap_err();
    assert!(matches!(err, PlotError::InvalidOption { ref key, .. } if key == "orientation"));
}

#[test]
fn test_translate_tokens_from_command_line() {
    let out = translate_tokens("violinplot", &["vert=false", "hatch=x"], "3.10.0", 3).unwrap();
    assert_eq!(out.to_string(), "orientation=horizontal hatches=x,x,x");
}

#[test]
fn test_translate_tokens_rejects_unknown_operation() {
    assert!(translate_tokens("pie", &["vert=true"], "3.10.0", 1).is_err());
    assert!(translate_tokens("box", &["not an assignment"], "3.10.0", 1).is_err());
    assert!(translate_tokens("box", &["vert=true"], "three", 1).is_err());
}

// ── Custom tables ────────────────────────────────────────────────────────────

#[test]
fn test_overlapping_table_refused() {
    let rules = vec![
        Rule::new(
            OperationKind::Violin,
            "side",
            VersionRange::AtLeast(v(3, 8, 0)),
            Rewrite::Keep,
        ),
        Rule::new(
            OperationKind::Violin,
            "side",
            VersionRange::Below(v(3, 9, 0)),
            Rewrite::Drop { key: "side" },
        ),
    ];
    assert_eq!(
        RuleTable::new(rules).unwrap_err(),
        PlotError::OverlappingRules {
            operation: OperationKind::Violin,
            concept: "side"
        }
    );
}

#[test]
fn test_gap_in_table_never_guesses() {
    let rules = vec![Rule::new(
        OperationKind::Box,
        "orientation",
        VersionRange::AtLeast(v(3, 10, 0)),
        Rewrite::Keep,
    )];
    let translator = Translator::new(RuleTable::new(rules).unwrap());
    let err = translator
        .translate(OperationKind::Box, OptionMap::new(), v(3, 9, 0), 1)
        .unwrap_err();
    assert_eq!(
        err,
        PlotError::NoMatchingRule {
            operation: OperationKind::Box,
            concept: "orientation",
            version: v(3, 9, 0)
        }
    );
}

#[test]
fn test_between_ranges_partition() {
    let rules = vec![
        Rule::new(
            OperationKind::Violin,
            "bw",
            VersionRange::Below(v(3, 5, 0)),
            Rewrite::Drop { key: "bw_method" },
        ),
        Rule::new(
            OperationKind::Violin,
            "bw",
            VersionRange::Between {
                from: v(3, 5, 0),
                until: v(3, 8, 0),
            },
            Rewrite::Rename {
                from: "bw_method",
                to: "bw",
                prefer: "bw",
            },
        ),
        Rule::new(
            OperationKind::Violin,
            "bw",
            VersionRange::AtLeast(v(3, 8, 0)),
            Rewrite::Keep,
        ),
    ];
    let translator = Translator::new(RuleTable::new(rules).unwrap());
    let options = OptionMap::new().with("bw_method", 0.3);
    let at = |version| {
        translator
            .translate(OperationKind::Violin, options.clone(), version, 1)
            .unwrap()
    };
    assert!(at(v(3, 4, 0)).is_empty());
    assert_eq!(at(v(3, 6, 0)).get("bw"), Some(&OptionValue::Number(0.3)));
    assert!(at(v(3, 8, 0)).contains_key("bw_method"));
}
