//! h5grid - read a square simulation grid from an HDF5 file.
//!
//! Walks the whole hierarchy (following soft and hard links, skipping
//! loops), extracts `dim`, `domain_box`, `interior_box`, `mask` and `xy`,
//! and prints them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use h5grid::extract::GridPolicy;
use h5grid::types::{ExtractionResult, FloatGrid3D, IntGrid2D};
use h5grid::{Hdf5Backend, LoadConfig, Loader, SourceGroup};
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "h5grid")]
#[command(version, about, long_about = None)]
struct Cli {
    /// HDF5 file to read.
    #[arg(default_value = "squaregrid.hdf")]
    path: PathBuf,

    /// Print the hierarchy outline before the arrays.
    #[arg(long = "tree")]
    tree: bool,

    /// Group each dataset is read from.
    #[arg(long = "source", value_enum, default_value_t = SourceArg::Recorded)]
    source: SourceArg,

    /// Accepted grid shapes.
    #[arg(long = "grid", value_enum, default_value_t = GridArg::Square)]
    grid: GridArg,

    /// Log traversal details.
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Only log errors.
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceArg {
    /// The group each dataset was found in.
    Recorded,
    /// The last group entered during traversal.
    LastEntered,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GridArg {
    /// Leading axes must be equal.
    Square,
    /// Leading axes may differ.
    Rectangular,
}

impl Cli {
    fn load_config(&self) -> LoadConfig {
        LoadConfig {
            source: match self.source {
                SourceArg::Recorded => SourceGroup::Recorded,
                SourceArg::LastEntered => SourceGroup::LastEntered,
            },
            grid: match self.grid {
                GridArg::Square => GridPolicy::SquareOnly,
                GridArg::Rectangular => GridPolicy::Rectangular,
            },
            ..LoadConfig::default()
        }
    }
}

fn setup_logging(verbose: bool, quiet: bool) -> Result<()> {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")
}

fn print_int_grid(name: &str, grid: &IntGrid2D) {
    println!("{name} ({}x{}):", grid.rows(), grid.cols());
    for row in grid.iter_rows() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("  {}", cells.join(" "));
    }
}

fn print_float_grid(name: &str, grid: &FloatGrid3D) {
    let [rows, cols, inner] = grid.dims();
    println!("{name} ({rows}x{cols}x{inner}):");
    for i in 0..rows {
        let cells: Vec<String> = (0..cols)
            .map(|j| {
                let v: Vec<String> = grid[(i, j)].iter().map(|x| format!("{x}")).collect();
                format!("({})", v.join(", "))
            })
            .collect();
        println!("  {}", cells.join(" "));
    }
}

fn print_result(result: &ExtractionResult) {
    match result.dimension_count {
        Some(d) => println!("dim: {}", d.value),
        None => println!("dim: <missing>"),
    }
    let grids = [
        ("domain_box", &result.domain_box),
        ("interior_box", &result.interior_box),
        ("mask", &result.mask),
    ];
    for (name, grid) in grids {
        match grid {
            Some(g) => print_int_grid(name, g),
            None => println!("{name}: <missing>"),
        }
    }
    match &result.xy {
        Some(g) => print_float_grid("xy", g),
        None => println!("xy: <missing>"),
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet)?;

    let loaded = Loader::new(cli.load_config())
        .run(&Hdf5Backend, &cli.path)
        .with_context(|| format!("failed to load {}", cli.path.display()))?;

    if cli.tree {
        print!("{}", loaded.walk.outline());
    }
    for w in &loaded.warnings {
        warn!("{w}");
    }
    for f in &loaded.failures {
        warn!("{f}");
    }
    print_result(&loaded.result);

    if !loaded.result.is_complete() {
        anyhow::bail!("{} is missing required datasets", cli.path.display());
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
