use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portstory_app::{DiagramEngine, EngineSettings};
use portstory_core::{ElementId, ModelElements, ReviewItem, Selection};
use portstory_storage::Storage;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the model JSON file
    #[arg(short, long)]
    model: PathBuf,

    /// Path to the SQLite layout database
    #[arg(short, long, default_value = "portstory.db")]
    db: PathBuf,

    /// Review context the layouts belong to
    #[arg(short, long, value_parser = parse_id, default_value = "00000000-0000-0000-0000-000000000000")]
    scope: ElementId,

    /// Engine settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Review items JSON file (a list of annotations)
    #[arg(long)]
    reviews: Option<PathBuf>,

    /// Component to center the diagram on
    #[arg(long, value_parser = parse_id)]
    center: Option<ElementId>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the diagram
    Show,
    /// Save the current layout under a name
    Save { name: String },
    /// Load a saved layout and print it
    Load { name: String },
    /// List saved layouts
    List,
    /// Delete a saved layout
    Delete { name: String },
}

fn parse_id(value: &str) -> Result<ElementId, String> {
    ElementId::parse(value).map_err(|e| e.to_string())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn print_diagram(engine: &DiagramEngine) {
    let diagram = engine.diagram();
    println!(
        "Diagram v{} ({} nodes, {} ports, {} links)",
        engine.version(),
        diagram.node_count(),
        diagram.port_count(),
        diagram.link_count()
    );
    if let Some(name) = engine.active_configuration() {
        println!("Active configuration: {name}");
    }
    for node in diagram.nodes() {
        let badge = if node.has_comments { " [comments]" } else { "" };
        println!(
            "  {} ({:.1}, {:.1}){}",
            node.name, node.position.x, node.position.y, badge
        );
        for port in &node.ports {
            let port = &diagram[*port];
            println!("    - {} {:?} {:?}", port.name, port.direction, port.alignment);
        }
    }
    for link in diagram.links() {
        println!(
            "  {}: {}.{} -> {}.{}",
            link.name,
            diagram[diagram[link.source].node].name,
            diagram[link.source].name,
            diagram[diagram[link.target].node].name,
            diagram[link.target].name
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let model: ModelElements = read_json(&args.model)?;
    tracing::debug!(
        "Read {} components from {}",
        model.components.len(),
        args.model.display()
    );
    let reviews: HashMap<ElementId, ReviewItem> = match &args.reviews {
        Some(path) => read_json::<Vec<ReviewItem>>(path)?
            .into_iter()
            .map(|item| (item.thing_id, item))
            .collect(),
        None => HashMap::new(),
    };
    let settings = match &args.settings {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };
    let storage = Storage::open(&args.db)?;

    let mut engine =
        DiagramEngine::open(args.scope, &model, &reviews, Box::new(storage), settings)?;
    if let Some(center) = args.center {
        engine.recenter(Selection::Component(center))?;
    }

    match args.command.unwrap_or(Command::Show) {
        Command::Show => print_diagram(&engine),
        Command::Save { name } => {
            let outcome = engine.save_configuration(&name);
            if !outcome.success {
                anyhow::bail!("could not save '{}': {}", name, outcome.errors.join("; "));
            }
            println!("Saved '{}'", name.trim());
        }
        Command::Load { name } => {
            if !engine.load_configuration(&name)? {
                anyhow::bail!("no configuration named '{}'", name);
            }
            print_diagram(&engine);
        }
        Command::List => {
            for name in engine.list_configurations()? {
                println!("{name}");
            }
        }
        Command::Delete { name } => {
            let outcome = engine.delete_configuration(&name);
            if !outcome.success {
                anyhow::bail!(
                    "could not delete '{}': {}",
                    name,
                    outcome.error.unwrap_or_default()
                );
            }
            println!("Deleted '{}'", name.trim());
        }
    }

    Ok(())
}
