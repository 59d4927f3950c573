use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use geolayer_analytics::TracingSink;
use geolayer_input::LayerCommand;
use geolayer_persist::{CatalogConfig, LayerStateSnapshot};
use geolayer_render::{GlobeRenderer, TileMapRenderer};
use geolayer_tools::CatalogInspector;
use geolayer_viewmodel::{Catalog, LayerContext};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geolayer-cli", about = "Drive map layer view-models from the command line")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load a catalog, apply layer commands, print the resulting state
    Run {
        /// Catalog file (.json, .yaml or .yml)
        #[arg(short, long)]
        catalog: PathBuf,
        /// Attach the 3D globe engine
        #[arg(long)]
        globe: bool,
        /// Attach the 2D tile map engine
        #[arg(long)]
        map: bool,
        /// Restore layer state from a snapshot before running commands
        #[arg(long)]
        restore: Option<PathBuf>,
        /// Save layer state to a snapshot afterwards
        #[arg(long)]
        save: Option<PathBuf>,
        /// Commands of the form `action:Layer Name`, e.g. `enable:Coastline` or `zoom:Coastline`
        commands: Vec<String>,
    },
    /// Print every layer in a catalog
    Inspect {
        /// Catalog file (.json, .yaml or .yml)
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("geolayer-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", geolayer_render::crate_info());
            println!("persist: {}", geolayer_persist::crate_info());
            println!("tools: {}", geolayer_tools::crate_info());
        }
        Commands::Run {
            catalog,
            globe,
            map,
            restore,
            save,
            commands,
        } => {
            let commands = commands
                .iter()
                .map(|c| c.parse::<LayerCommand>())
                .collect::<Result<Vec<_>, _>>()?;

            let mut catalog = load_catalog(&catalog, engines(globe, map))?;

            if let Some(path) = restore {
                let snap = LayerStateSnapshot::load(&path)
                    .with_context(|| format!("loading snapshot {}", path.display()))?;
                let n = snap.restore(&mut catalog)?;
                println!("Restored {n} layer(s) from {}", path.display());
            }

            for command in &commands {
                let outcome = catalog.execute(command)?;
                println!("{command} -> {outcome}");
            }

            println!("{}", CatalogInspector::summary(&catalog));
            for engine in catalog.context().renderers() {
                print!("{}", engine.describe());
            }

            if let Some(path) = save {
                LayerStateSnapshot::capture(&catalog)?.save(&path)?;
                println!("Saved layer state to {}", path.display());
            }
        }
        Commands::Inspect { catalog } => {
            let catalog = load_catalog(&catalog, LayerContext::new())?;
            println!("{}", CatalogInspector::summary(&catalog));
            for id in CatalogInspector::list_layers(&catalog) {
                if let Some(details) = CatalogInspector::inspect_layer(&catalog, id) {
                    println!("  {details}");
                }
            }
        }
    }

    Ok(())
}

/// Both engines unless the user picked some.
fn engines(globe: bool, map: bool) -> LayerContext {
    let (globe, map) = if globe || map { (globe, map) } else { (true, true) };
    let mut ctx = LayerContext::new();
    if globe {
        ctx.push_renderer(Box::new(GlobeRenderer::new()));
    }
    if map {
        ctx.push_renderer(Box::new(TileMapRenderer::new()));
    }
    ctx
}

fn load_catalog(path: &Path, context: LayerContext) -> anyhow::Result<Catalog> {
    let config = CatalogConfig::load(path)
        .with_context(|| format!("loading catalog {}", path.display()))?;
    let catalog = config.build_catalog(context, Arc::new(TracingSink))?;
    tracing::info!(
        layers = catalog.len(),
        enabled = catalog.now_viewing().len(),
        "catalog ready"
    );
    Ok(catalog)
}
