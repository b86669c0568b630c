//! End-to-end tests of the chart calls against the in-memory engine.

use petgraph::graph::UnGraph;

use plot_compat::engine::ArtifactKind;
use plot_compat::{
    Artifact, Axes, Bounds, EngineVersion, GraphArgs, GraphInput, GraphLabels, Inset, Layout,
    LayoutSpec, MemoryEngine, OptionMap, OptionValue, PlotConfig, PlotError, PlotWarning, Point,
    StatArgs,
};

fn axes(version: &str) -> Axes<MemoryEngine> {
    let config = PlotConfig::new().with_engine_version(version.parse().unwrap());
    Axes::new(MemoryEngine::new(version), config).unwrap()
}

fn path_graph(n: u32) -> UnGraph<(), ()> {
    let edges: Vec<(u32, u32)> = (1..n).map(|i| (i - 1, i)).collect();
    UnGraph::from_edges(&edges)
}

fn groups() -> Vec<Vec<f64>> {
    vec![vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]]
}

fn only_call(ax: &Axes<MemoryEngine>) -> &OptionMap {
    let calls = ax.engine().calls();
    assert_eq!(calls.len(), 1, "expected exactly one native call: {calls:?}");
    &calls[0].options
}

// ── graph ────────────────────────────────────────────────────────────────────

#[test]
fn test_graph_node_subset_with_labels() {
    let mut ax = axes("3.10.0");
    let g = path_graph(5);
    let labels: GraphLabels = [(0, "0"), (1, "1")].into_iter().collect();
    let plotted = ax
        .graph(&g, GraphArgs::new().nodes([0, 1]).labels(labels))
        .unwrap();
    let art = plotted.value;
    assert_eq!(art.nodes.offsets().len(), 2);
    assert_eq!(art.edges.offsets().len(), 1);
    assert_eq!(art.labels.len(), 2);
    assert_eq!(art.labels[1].label(), Some("1"));
    assert!(plotted.warnings.is_empty());
}

#[test]
fn test_graph_edge_subset() {
    let mut ax = axes("3.10.0");
    let plotted = ax
        .graph(&path_graph(5), GraphArgs::new().edges([(0, 1)]))
        .unwrap();
    assert_eq!(plotted.value.nodes.offsets().len(), 2);
    assert_eq!(plotted.value.edges.offsets().len(), 1);
    assert!(plotted.value.labels.is_empty());
}

#[test]
fn test_graph_native_call_sequence() {
    let mut ax = axes("3.10.0");
    ax.graph(&path_graph(3), GraphArgs::new().labels(GraphLabels::Ids))
        .unwrap();
    let ops: Vec<&str> = ax.engine().calls().iter().map(|c| c.operation).collect();
    assert_eq!(ops, vec!["scatter", "line_collection", "text", "text", "text"]);
}

#[test]
fn test_graph_id_labels_drawn_at_nodes() {
    let mut ax = axes("3.10.0");
    let plotted = ax
        .graph(
            &path_graph(4),
            GraphArgs::new().labels(GraphLabels::Ids).layout("circular"),
        )
        .unwrap();
    let art = plotted.value;
    for (i, text) in art.labels.iter().enumerate() {
        assert_eq!(text.kind, ArtifactKind::Text);
        assert_eq!(text.text.as_deref(), Some(i.to_string().as_str()));
        assert_eq!(text.offsets()[0], art.layout.get(i).unwrap());
    }
}

#[test]
fn test_graph_labels_outside_subset_ignored() {
    let mut ax = axes("3.10.0");
    let labels: GraphLabels = [(0, "a"), (4, "e")].into_iter().collect();
    let plotted = ax
        .graph(&path_graph(5), GraphArgs::new().nodes([0, 1]).labels(labels))
        .unwrap();
    assert_eq!(plotted.value.labels.len(), 1);
    assert_eq!(plotted.value.labels[0].label(), Some("a"));
}

#[test]
fn test_graph_input_shapes_agree() {
    let g = path_graph(4);
    let adjacency = vec![
        vec![0.0, 1.0, 0.0, 0.0],
        vec![1.0, 0.0, 1.0, 0.0],
        vec![0.0, 1.0, 0.0, 1.0],
        vec![0.0, 0.0, 1.0, 0.0],
    ];
    let edge_list = vec![vec![0.0, 1.0], vec![1.0, 2.0], vec![2.0, 3.0]];

    let mut layouts = Vec::new();
    for input in [
        GraphInput::from(&g),
        GraphInput::Adjacency(&adjacency),
        GraphInput::EdgeList(&edge_list),
    ] {
        let mut ax = axes("3.10.0");
        let plotted = ax.graph(input, GraphArgs::new().layout("spring")).unwrap();
        assert_eq!(plotted.value.edges.offsets().len(), 3);
        layouts.push(plotted.value.layout);
    }
    assert_eq!(layouts[0], layouts[1]);
    assert_eq!(layouts[1], layouts[2]);
}

#[test]
fn test_graph_ragged_adjacency_rejected() {
    let mut ax = axes("3.10.0");
    let ragged = vec![vec![0.0, 1.0], vec![1.0]];
    let err = ax
        .graph(GraphInput::Adjacency(&ragged), GraphArgs::new())
        .unwrap_err();
    assert!(matches!(err, PlotError::UnsupportedGraphInput(_)));
    assert!(err.is_input_shape());
    assert!(ax.engine().calls().is_empty());
}

#[test]
fn test_graph_unknown_node_rejected() {
    let mut ax = axes("3.10.0");
    let err = ax
        .graph(&path_graph(3), GraphArgs::new().nodes([0, 9]))
        .unwrap_err();
    assert_eq!(err, PlotError::UnknownNode(9));
    assert!(ax.engine().calls().is_empty());
}

#[test]
fn test_graph_rescale_into_unit_square() {
    let mut ax = axes("3.10.0");
    let plotted = ax
        .graph(&path_graph(6), GraphArgs::new().layout("spring").rescale(true))
        .unwrap();
    for (_, p) in plotted.value.layout.iter() {
        assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
    }
}

#[test]
fn test_graph_precomputed_layout_passes_through() {
    let mut ax = axes("3.10.0");
    let layout: Layout = [(0, (-5.0, 12.5)), (1, (3.25, -7.0)), (2, (100.0, 0.0))]
        .into_iter()
        .collect();
    let plotted = ax
        .graph(&path_graph(3), GraphArgs::new().layout(layout.clone()))
        .unwrap();
    assert_eq!(plotted.value.layout, layout);
    assert_eq!(
        plotted.value.nodes.offsets(),
        &[
            Point::new(-5.0, 12.5),
            Point::new(3.25, -7.0),
            Point::new(100.0, 0.0)
        ]
    );
}

#[test]
fn test_graph_precomputed_layout_missing_node() {
    let mut ax = axes("3.10.0");
    let layout: Layout = [(0, (0.0, 0.0))].into_iter().collect();
    let err = ax
        .graph(&path_graph(2), GraphArgs::new().layout(layout))
        .unwrap_err();
    assert_eq!(err, PlotError::MissingPosition(1));
}

#[test]
fn test_graph_layout_specs() {
    let specs: Vec<(&str, LayoutSpec)> = vec![
        ("forceatlas2", "forceatlas2".into()),
        ("spring_layout", "spring_layout".into()),
        ("shell", "shell".into()),
        (
            "generator",
            LayoutSpec::generator(|net| {
                net.nodes()
                    .into_iter()
                    .map(|id| (id, (id as f64, net.degree(id) as f64)))
                    .collect()
            }),
        ),
    ];
    for (name, spec) in specs {
        let mut ax = axes("3.10.0");
        let plotted = ax
            .graph(&path_graph(5), GraphArgs::new().nodes([0, 1, 2, 3]).layout(spec))
            .unwrap();
        let art = plotted.value;
        assert_eq!(art.layout.len(), 4, "{name}");
        assert_eq!(art.nodes.offsets().len(), 4, "{name}");
        assert_eq!(art.edges.offsets().len(), 3, "{name}");
        for (id, p) in art.layout.iter() {
            assert!(p.x.is_finite() && p.y.is_finite(), "{name}: node {id} at {p:?}");
        }
    }
}

#[test]
fn test_graph_non_finite_layout_rejected() {
    let mut ax = axes("3.10.0");
    let layout: Layout = [(0, (0.0, 0.0)), (1, (f64::NAN, 1.0))].into_iter().collect();
    let err = ax
        .graph(&path_graph(2), GraphArgs::new().layout(layout))
        .unwrap_err();
    assert_eq!(err, PlotError::NonFinitePosition(1));
    assert!(ax.engine().calls().is_empty());
}

#[test]
fn test_graph_node_options_reach_scatter() {
    let mut ax = axes("3.9.0");
    let args = GraphArgs::new()
        .node_options(OptionMap::new().with("color", "red"))
        .edge_options(OptionMap::new().with("alpha", 0.5));
    ax.graph(&path_graph(3), args).unwrap();
    let calls = ax.engine().calls();
    assert_eq!(
        calls[0].options.get("color"),
        Some(&OptionValue::Text("red".to_string()))
    );
    assert_eq!(calls[1].options.get("alpha"), Some(&OptionValue::Number(0.5)));
}

// ── violin / box ─────────────────────────────────────────────────────────────

#[test]
fn test_violin_single_label_cycled() {
    let mut ax = axes("3.10.0");
    let plotted = ax
        .violinplot(&groups(), StatArgs::new().labels(["hello"]))
        .unwrap();
    assert_eq!(plotted.value.len(), 2);
    assert!(plotted.value.iter().all(|b| b.label() == Some("hello")));
    assert_eq!(
        plotted.warnings,
        vec![PlotWarning::LabelsPadded {
            given: 1,
            expected: 2
        }]
    );
    only_call(&ax);
}

#[test]
fn test_violin_orientation_new_release() {
    let mut ax = axes("3.10.0");
    ax.violinplot(&groups(), StatArgs::new()).unwrap();
    let options = only_call(&ax);
    assert_eq!(
        options.get("orientation"),
        Some(&OptionValue::Text("vertical".to_string()))
    );
    assert!(!options.contains_key("vert"));
}

#[test]
fn test_violin_orientation_old_release() {
    let mut ax = axes("3.9.0");
    ax.violinplot(&groups(), StatArgs::new().vert(true)).unwrap();
    let options = only_call(&ax);
    assert_eq!(options.get("vert"), Some(&OptionValue::Bool(true)));
    assert!(!options.contains_key("orientation"));
}

#[test]
fn test_box_orientation_both_releases() {
    for (version, key) in [("3.10.1", "orientation"), ("3.8.4", "vert")] {
        let mut ax = axes(version);
        ax.boxplot(&groups(), StatArgs::new()).unwrap();
        let options = only_call(&ax);
        assert!(options.contains_key(key), "{version}");
        assert_eq!(options.len(), 1, "{version}: {options}");
    }
}

#[test]
fn test_violinploth_is_horizontal() {
    let mut ax = axes("3.10.0");
    let plotted = ax.violinploth(&groups(), StatArgs::new().vert(true)).unwrap();
    assert_eq!(
        only_call(&ax).get("orientation"),
        Some(&OptionValue::Text("horizontal".to_string()))
    );
    assert_eq!(plotted.value[0].offsets()[0], Point::new(1.0, 1.0));
    assert_eq!(plotted.value[1].offsets()[2], Point::new(4.0, 2.0));
}

#[test]
fn test_boxploth_old_release_uses_flag() {
    let mut ax = axes("3.9.0");
    ax.boxploth(&groups(), StatArgs::new()).unwrap();
    assert_eq!(only_call(&ax).get("vert"), Some(&OptionValue::Bool(false)));
}

#[test]
fn test_hatch_broadcast_to_every_body() {
    let mut ax = axes("3.10.0");
    let plotted = ax.violinplot(&groups(), StatArgs::new().hatch("//")).unwrap();
    let options = only_call(&ax);
    assert!(!options.contains_key("hatch"));
    assert_eq!(
        options.get("hatches"),
        Some(&OptionValue::TextList(vec!["//".to_string(), "//".to_string()]))
    );
    assert!(plotted.value.iter().all(|b| b.hatch.as_deref() == Some("//")));
}

#[test]
fn test_hatch_sequence_length_mismatch() {
    let mut ax = axes("3.10.0");
    let err = ax
        .boxplot(&groups(), StatArgs::new().hatches(["/", "x", "o"]))
        .unwrap_err();
    assert_eq!(
        err,
        PlotError::Cardinality {
            option: "hatches".to_string(),
            expected: 2,
            actual: 3
        }
    );
    assert!(ax.engine().calls().is_empty());
}

#[test]
fn test_box_tick_labels_follow_release() {
    let options = OptionMap::new().with("tick_labels", vec!["a", "b"]);
    let mut old = axes("3.8.0");
    old.boxplot(&groups(), StatArgs::new().options(options.clone()))
        .unwrap();
    assert!(only_call(&old).contains_key("labels"));
    assert!(!only_call(&old).contains_key("tick_labels"));

    let mut new = axes("3.9.0");
    new.boxplot(&groups(), StatArgs::new().options(options)).unwrap();
    assert!(only_call(&new).contains_key("tick_labels"));
}

#[test]
fn test_box_both_tick_label_spellings_new_style_wins() {
    let options = OptionMap::new()
        .with("labels", vec!["old", "old"])
        .with("tick_labels", vec!["new", "new"]);
    let mut ax = axes("3.8.0");
    ax.boxplot(&groups(), StatArgs::new().options(options))
        .unwrap();
    let options = only_call(&ax);
    assert_eq!(options.get("labels"), Some(&OptionValue::from(vec!["new", "new"])));
    assert!(!options.contains_key("tick_labels"));
}

#[test]
fn test_violin_side_dropped_before_3_9() {
    let options = OptionMap::new().with("side", "low");
    let mut old = axes("3.8.2");
    old.violinplot(&groups(), StatArgs::new().options(options.clone()))
        .unwrap();
    assert!(!only_call(&old).contains_key("side"));

    let mut new = axes("3.9.0");
    new.violinplot(&groups(), StatArgs::new().options(options))
        .unwrap();
    assert!(only_call(&new).contains_key("side"));
}

#[test]
fn test_both_orientation_spellings_new_style_wins() {
    let mut ax = axes("3.9.0");
    let options = OptionMap::new().with("orientation", "horizontal");
    ax.violinplot(&groups(), StatArgs::new().vert(true).options(options))
        .unwrap();
    let options = only_call(&ax);
    assert_eq!(options.get("vert"), Some(&OptionValue::Bool(false)));
    assert!(!options.contains_key("orientation"));
}

#[test]
fn test_truncated_labels_warn() {
    let mut ax = axes("3.10.0");
    let plotted = ax
        .boxplot(&groups(), StatArgs::new().labels(["a", "b", "c"]))
        .unwrap();
    assert_eq!(plotted.value[1].label(), Some("b"));
    assert_eq!(plotted.warnings.len(), 1);
}

// ── inset ────────────────────────────────────────────────────────────────────

#[test]
fn test_inset_composite_on_new_release() {
    let mut ax = axes("3.10.0");
    let inset = ax
        .inset_axes(Bounds::new(0.2, 0.2, 0.3, 0.3), OptionMap::new())
        .unwrap();
    let Inset::Composite(indicator) = &inset else {
        panic!("expected a composite indicator, got {inset:?}");
    };
    assert_eq!(indicator.rectangle.kind, ArtifactKind::InsetRectangle);
    assert_eq!(indicator.connectors.len(), 4);
    assert_eq!(ax.engine().calls()[0].operation, "indicate_inset");
    only_call(&ax);
}

#[test]
fn test_inset_pair_on_old_release() {
    let mut ax = axes("3.9.0");
    let inset = ax
        .inset_axes(Bounds::new(1.0, 2.0, 3.0, 4.0), OptionMap::new())
        .unwrap();
    assert!(matches!(inset, Inset::Pair(_, _)));
    assert_eq!(inset.rectangle().offsets()[2], Point::new(4.0, 6.0));
    assert_eq!(ax.engine().calls()[0].operation, "indicate_inset_legacy");
    only_call(&ax);
}

// ── version resolution ───────────────────────────────────────────────────────

#[test]
fn test_pinned_config_ignores_engine_report() {
    let config = PlotConfig::new().with_engine_version(EngineVersion::new(3, 9, 0));
    let mut ax = Axes::new(MemoryEngine::new("3.9.0"), config).unwrap();
    assert_eq!(ax.version(), EngineVersion::V3_9_0);
    ax.violinplot(&groups(), StatArgs::new()).unwrap();
    assert!(only_call(&ax).contains_key("vert"));
}
