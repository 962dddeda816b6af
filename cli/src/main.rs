use std::env;
use std::error::Error;
use std::sync::Arc;

use log::info;
use rastergraph::io::export_png;
use rastergraph::{GraphEditor, NodeRegistry, RenderConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err("usage: render_graph <graph.json> [config.json]".into());
    }

    let config = match args.get(2) {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    let mut registry = NodeRegistry::with_builtin_nodes();
    scatter_plugin::register(&mut registry);
    info!("Registered {} node types", registry.len());

    let mut editor = GraphEditor::load(Arc::new(registry), &args[1])?;
    info!(
        "Loaded {} nodes and {} edges from {}",
        editor.graph().nodes.len(),
        editor.graph().edges.len(),
        args[1]
    );

    let layer = rastergraph::render(&mut editor, &config)?;
    export_png(&layer, &config.output_path)?;
    println!(
        "Rendered {}x{} image to {}",
        layer.width(),
        layer.height(),
        config.output_path.display()
    );
    Ok(())
}
