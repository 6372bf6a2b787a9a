#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a maze and routes through it.

mod maze_transfer;
mod render;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use maze_nav_system_search::Path;
use maze_nav_world::{query, Level, LevelConfig};

use crate::render::{render_text, Report};

/// Generates a maze, builds its visibility graph and searches it.
#[derive(Parser, Debug)]
#[command(name = "maze-nav", version, long_about = None)]
struct Args {
    /// Number of maze cell columns
    #[arg(long)]
    columns: Option<u32>,

    /// Number of maze cell rows
    #[arg(long)]
    rows: Option<u32>,

    /// Seed for the maze generator
    #[arg(long)]
    seed: Option<u64>,

    /// Full cone angle, in degrees, used to prune near-parallel edges
    #[arg(long)]
    prune_angle: Option<f64>,

    /// Keep every line-of-sight edge
    #[arg(long)]
    no_prune: bool,

    /// JSON file with level settings; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load the maze from a transfer string instead of generating it
    #[arg(long, conflicts_with_all = ["columns", "rows", "seed"])]
    import: Option<String>,

    /// Print the maze transfer string
    #[arg(long)]
    export: bool,

    /// Start waypoint index
    #[arg(long, default_value_t = 0)]
    from: usize,

    /// Goal waypoint index; defaults to the last waypoint
    #[arg(long)]
    to: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Entry point for the maze navigation command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = resolve_config(&args)?;
    let level = match &args.import {
        Some(value) => {
            let maze = maze_transfer::decode(value).context("failed to import maze")?;
            Level::from_maze(maze, &config).context("failed to process imported maze")?
        }
        None => Level::generate(&config).context("failed to generate maze")?,
    };

    let path = route(&level, &args)?;
    let transfer =
        maze_transfer::encode(query::maze(&level)).context("failed to encode maze")?;

    match args.format {
        OutputFormat::Text => {
            println!("{}", render_text(&level, path.as_ref()));
            println!("{}", summary(&level, path.as_ref()));
            if args.export {
                println!("{transfer}");
            }
        }
        OutputFormat::Json => {
            let report = Report::new(&level, transfer, path.as_ref());
            let json =
                serde_json::to_string_pretty(&report).context("failed to serialise report")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<LevelConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => LevelConfig::default(),
    };

    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(angle) = args.prune_angle {
        config.prune.angle_degrees = angle;
    }
    if args.no_prune {
        config.prune.enabled = false;
    }

    Ok(config)
}

fn route(level: &Level, args: &Args) -> Result<Option<Path>> {
    let count = query::waypoints(level).len();
    if count == 0 {
        warn!("maze has no waypoints; skipping search");
        return Ok(None);
    }

    let goal = args.to.unwrap_or(count - 1);
    let path = query::find_path(level, args.from, goal)
        .with_context(|| format!("cannot search from waypoint {} to {goal}", args.from))?;
    if path.is_none() {
        info!("waypoint {goal} is unreachable from {}", args.from);
    }
    Ok(path)
}

fn summary(level: &Level, path: Option<&Path>) -> String {
    let graph = query::graph(level);
    let mut lines = vec![format!(
        "{} wall blocks, {} waypoints, {} edges",
        query::wall_blocks(level).len(),
        graph.nodes().len(),
        graph.edge_count()
    )];

    match path {
        Some(path) => {
            let nodes: Vec<String> = path.nodes().iter().map(usize::to_string).collect();
            lines.push(format!(
                "path {} (length {:.3})",
                nodes.join(" -> "),
                path.length()
            ));
        }
        None => lines.push("no path".to_owned()),
    }

    lines.join("\n")
}
