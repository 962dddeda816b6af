use std::sync::Arc;

use rastergraph::{
    Color, EvalError, Graph, GraphEditor, GraphError, LibraryError, NodeRegistry, ParamMap,
    PortRef, RenderConfig, Value,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor() -> GraphEditor {
    GraphEditor::new(Arc::new(NodeRegistry::with_builtin_nodes()))
}

fn number(ed: &mut GraphEditor, v: f32) -> uuid::Uuid {
    ed.add_node(
        "data.number",
        ParamMap::from([("value".to_string(), Value::Number(v))]),
    )
    .unwrap()
}

#[test]
fn second_provider_replaces_first() {
    init_logger();
    let mut ed = editor();
    let blend = ed.add_node("compositing.blend", ParamMap::new()).unwrap();
    let first = number(&mut ed, 10.0);
    let second = number(&mut ed, 20.0);
    let target = PortRef::new(blend, "opacity");

    let outcome = ed.connect(PortRef::new(first, "value"), target.clone()).unwrap();
    assert!(outcome.replaced.is_none());
    let outcome = ed.connect(PortRef::new(second, "value"), target.clone()).unwrap();
    assert_eq!(outcome.replaced.map(|e| e.from.node_id), Some(first));

    let feeding: Vec<_> = ed.graph().edges.iter().filter(|e| e.to == target).collect();
    assert_eq!(feeding.len(), 1);
    assert_eq!(feeding[0].from.node_id, second);
}

#[test]
fn parameter_edit_recomputes_downstream() {
    init_logger();
    let mut ed = editor();
    let radius = number(&mut ed, 4.0);
    let circle = ed.add_node("shape.circle", ParamMap::new()).unwrap();
    let display = ed.add_node("output.display", ParamMap::new()).unwrap();
    let side = ed.add_node("shape.rectangle", ParamMap::new()).unwrap();
    ed.connect(PortRef::new(radius, "value"), PortRef::new(circle, "radius"))
        .unwrap();
    ed.connect(PortRef::new(circle, "layer"), PortRef::new(display, "layer"))
        .unwrap();

    let before = ed.evaluate(display).unwrap();
    ed.evaluate(side).unwrap();
    assert_eq!(before["image"].as_layer().unwrap().width(), 8);

    ed.set_param(radius, "value", Value::Number(6.0)).unwrap();
    for id in [radius, circle, display] {
        assert!(!ed.cache().contains(id));
    }
    assert!(ed.cache().contains(side));

    let after = ed.evaluate(display).unwrap();
    assert_eq!(after["image"].as_layer().unwrap().width(), 12);
}

#[test]
fn disconnect_invalidates_target() {
    let mut ed = editor();
    let radius = number(&mut ed, 4.0);
    let circle = ed.add_node("shape.circle", ParamMap::new()).unwrap();
    let edge = ed
        .connect(PortRef::new(radius, "value"), PortRef::new(circle, "radius"))
        .unwrap()
        .edge;
    ed.evaluate(circle).unwrap();

    ed.disconnect(edge.id).unwrap();
    assert!(!ed.cache().contains(circle));
    assert!(ed.cache().contains(radius));
    // Falls back to the default radius parameter.
    let outputs = ed.evaluate(circle).unwrap();
    assert_eq!(outputs["layer"].as_layer().unwrap().width(), 100);
}

#[test]
fn cycle_through_editor() {
    let mut ed = editor();
    let a = ed.add_node("math.add", ParamMap::new()).unwrap();
    let b = ed.add_node("math.add", ParamMap::new()).unwrap();
    ed.connect(PortRef::new(a, "result"), PortRef::new(b, "a")).unwrap();
    ed.connect(PortRef::new(b, "result"), PortRef::new(a, "b")).unwrap();

    let err = ed.evaluate_one(b).unwrap_err();
    let EvalError::CycleDetected { path } = err else {
        panic!("expected a cycle, got {:?}", err);
    };
    assert!(path.contains(&a) && path.contains(&b));
}

#[test]
fn unknown_ports_are_rejected() {
    let mut ed = editor();
    let a = number(&mut ed, 1.0);
    let circle = ed.add_node("shape.circle", ParamMap::new()).unwrap();
    let err = ed
        .connect(PortRef::new(a, "value"), PortRef::new(circle, "diameter"))
        .unwrap_err();
    assert!(matches!(err, GraphError::UnknownPort { direction: "input", .. }));
    assert!(matches!(
        ed.add_node("shape.star", ParamMap::new()),
        Err(GraphError::UnknownNodeType(_))
    ));
}

#[test]
fn saved_graph_loads_and_renders() {
    init_logger();
    let registry = Arc::new(NodeRegistry::with_builtin_nodes());
    let mut ed = GraphEditor::new(registry.clone());
    let red = Color::rgb(255, 0, 0);
    let circle = ed
        .add_node(
            "shape.circle",
            ParamMap::from([
                ("radius".to_string(), Value::Number(3.0)),
                ("color".to_string(), Value::Color(red)),
            ]),
        )
        .unwrap();
    let display = ed.add_node("output.display", ParamMap::new()).unwrap();
    ed.connect(PortRef::new(circle, "layer"), PortRef::new(display, "layer"))
        .unwrap();

    let json = ed.graph().save().unwrap();
    let graph = Graph::load(&json).unwrap();
    assert_eq!(&graph, ed.graph());

    let mut loaded = GraphEditor::from_graph(registry, graph).unwrap();
    let config = RenderConfig {
        background: Some(Color::BLACK),
        ..RenderConfig::default()
    };
    let layer = rastergraph::render(&mut loaded, &config).unwrap();
    assert_eq!((layer.width(), layer.height()), (6, 6));
    assert_eq!(layer.get_pixel(0, 0), Some(Color::BLACK));
    assert_eq!(layer.get_pixel(3, 3), Some(red));
}

#[test]
fn loading_unknown_type_fails_validation() {
    let json = r#"{
        "nodes": [{"id": "6f1c2b3a-0000-4000-8000-000000000001", "type_name": "shape.blob"}],
        "edges": []
    }"#;
    let graph = Graph::load(json).unwrap();
    let result = GraphEditor::from_graph(Arc::new(NodeRegistry::with_builtin_nodes()), graph);
    assert!(matches!(result, Err(GraphError::UnknownNodeType(name)) if name == "shape.blob"));
}

#[test]
fn render_requires_sink() {
    let mut ed = editor();
    ed.add_node("shape.circle", ParamMap::new()).unwrap();
    let err = rastergraph::render(&mut ed, &RenderConfig::default()).unwrap_err();
    assert!(matches!(err, LibraryError::Config(_)));
}
