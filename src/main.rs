//! plot-compat CLI entry point.
//!
//! Drives the adaptation layer against the in-memory engine so keyword
//! translation, label resolution and layouts can be inspected from a shell.

use std::fs;
use std::io::{self, Read};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::prelude::*;

use plot_compat::layout::{LayoutSpec, algorithms, resolve_layout};
use plot_compat::{
    Axes, EngineVersion, MemoryEngine, Network, PlotConfig, StatArgs, VERSION,
    resolve_labels, translate_tokens,
};

/// Version-adaptation layer for a 2-D plotting engine.
#[derive(Parser, Debug)]
#[command(name = "plot-compat", version = VERSION, about = "Inspect engine-version keyword adaptation")]
struct Cli {
    /// Engine release to adapt to (default: $PLOT_COMPAT_ENGINE_VERSION, then 3.10.0)
    #[arg(short = 'e', long = "engine-version", global = true)]
    engine_version: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate key=value options for one operation
    Translate {
        /// violin, box, nodes, edges, labels or inset
        operation: String,
        /// Options as key=value
        options: Vec<String>,
        /// Number of artists the call produces
        #[arg(short = 'n', long = "artifacts", default_value = "1")]
        artifacts: usize,
    },
    /// Size a label list to an artist count
    Labels {
        count: usize,
        labels: Vec<String>,
        /// Refuse to drop labels
        #[arg(long)]
        strict: bool,
    },
    /// Lay out a graph read from a file (or stdin)
    Layout {
        #[arg(value_enum)]
        format: InputFormat,
        /// Input file (reads from stdin if not provided)
        input: Option<String>,
        /// Algorithm name
        #[arg(short = 'l', long = "layout")]
        algorithm: Option<String>,
        /// Map coordinates into the unit square
        #[arg(long)]
        rescale: bool,
    },
    /// Run a violin plot against the in-memory engine and show the native call
    Violin {
        /// One dataset per argument, values separated by commas
        #[arg(required = true)]
        groups: Vec<String>,
        #[arg(short = 'L', long = "label")]
        labels: Vec<String>,
        #[arg(long)]
        horizontal: bool,
        #[arg(long)]
        hatch: Option<String>,
    },
    /// Print version information
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    /// Square matrix, one row per line
    Adjacency,
    /// One `source target` pair per line
    Edges,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = PlotConfig::from_env().map_err(|e| e.to_string())?;
    let engine_version = match cli.engine_version {
        Some(raw) => EngineVersion::parse(&raw).map_err(|e| e.to_string())?,
        None => config.engine_version.unwrap_or(EngineVersion::V3_10_0),
    };
    tracing::info!(%engine_version, "adapting to engine release");

    match cli.command {
        Command::Translate {
            operation,
            options,
            artifacts,
        } => {
            let translated = translate_tokens(
                &operation,
                &options,
                &engine_version.to_string(),
                artifacts,
            )
            .map_err(|e| e.to_string())?;
            println!("{}", translated);
        }
        Command::Labels {
            count,
            labels,
            strict,
        } => {
            let resolved =
                resolve_labels(Some(labels.as_slice()), count, strict).map_err(|e| e.to_string())?;
            for label in &resolved.labels {
                println!("{}", label);
            }
        }
        Command::Layout {
            format,
            input,
            algorithm,
            rescale,
        } => {
            let text = read_input(input.as_deref())?;
            let rows = parse_rows(&text)?;
            let network = match format {
                InputFormat::Adjacency => Network::from_adjacency(&rows),
                InputFormat::Edges => Network::from_edge_list(&rows),
            }
            .map_err(|e| e.to_string())?;
            let spec = algorithm.map(LayoutSpec::from).unwrap_or_default();
            let positions = resolve_layout(&network, &spec, &config.default_layout, rescale)
                .map_err(|e| e.to_string())?;
            for (id, p) in positions.iter() {
                println!("{} {:.6} {:.6}", id, p.x, p.y);
            }
        }
        Command::Violin {
            groups,
            labels,
            horizontal,
            hatch,
        } => {
            let data = groups
                .iter()
                .map(|g| parse_numbers(g.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            let config = config.with_engine_version(engine_version);
            let mut axes = Axes::new(MemoryEngine::new(engine_version.to_string()), config)
                .map_err(|e| e.to_string())?;
            let mut args = StatArgs::new();
            if !labels.is_empty() {
                args = args.labels(labels);
            }
            if let Some(hatch) = hatch {
                args = args.hatch(hatch);
            }
            let plotted = if horizontal {
                axes.violinploth(&data, args)
            } else {
                axes.violinplot(&data, args)
            }
            .map_err(|e| e.to_string())?;
            for warning in &plotted.warnings {
                eprintln!("warning: {}", warning);
            }
            for call in axes.engine().calls() {
                println!("{} {}", call.operation, call.options);
            }
            for body in &plotted.value {
                println!("body {}", body.label.as_deref().unwrap_or("-"));
            }
        }
        Command::Version => {
            println!("plot-compat {}", VERSION);
            println!("engine {}", engine_version);
            let names: Vec<&str> = algorithms::names().collect();
            println!("layouts {}", names.join(" "));
        }
    }
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path, e)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

/// Numeric rows, one per non-blank line; `#` starts a comment.
fn parse_rows(text: &str) -> Result<Vec<Vec<f64>>, String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(parse_numbers)
        .collect()
}

fn parse_numbers(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| format!("'{}' is not a number", s)))
        .collect()
}
