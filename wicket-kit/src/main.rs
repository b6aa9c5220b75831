use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::Level;
use wicket::{AdjacencyTest, ConeOptions, ConstraintOrder, Precision};

mod project;

use project::Project;

/// Extreme rays, circuits and lineality space of a polyhedral cone
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project path; reads PROJECT.mat and, when present, PROJECT.sign and PROJECT.rel
    project: PathBuf,

    /// Adjacency test used when combining generators
    #[arg(short, long, value_enum, default_value_t = Algorithm::Tree)]
    algorithm: Algorithm,

    /// Rule picking the next constraint
    #[arg(short, long, value_enum, default_value_t = Order::MaxIntersection)]
    order: Order,

    /// Integer precision of the computation
    #[arg(short, long, value_enum, default_value_t = Bits::Word64)]
    precision: Bits,

    /// Worker threads, including the calling one
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Log progress every N processed constraints (0 disables)
    #[arg(long, default_value_t = 0)]
    log_every: usize,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    Tree,
    Matrix,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Order {
    MinIndex,
    MaxIntersection,
    MaxCutoff,
    MinCutoff,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Bits {
    #[value(name = "32")]
    Word32,
    #[value(name = "64")]
    Word64,
    #[value(name = "arbitrary")]
    Arbitrary,
}

impl Cli {
    fn options(&self) -> ConeOptions {
        ConeOptions::builder()
            .adjacency(match self.algorithm {
                Algorithm::Tree => AdjacencyTest::Tree,
                Algorithm::Matrix => AdjacencyTest::Matrix,
            })
            .order(match self.order {
                Order::MinIndex => ConstraintOrder::MinIndex,
                Order::MaxIntersection => ConstraintOrder::MaxIntersection,
                Order::MaxCutoff => ConstraintOrder::MaxCutoff,
                Order::MinCutoff => ConstraintOrder::MinCutoff,
            })
            .precision(match self.precision {
                Bits::Word32 => Precision::Bits32,
                Bits::Word64 => Precision::Bits64,
                Bits::Arbitrary => Precision::Arbitrary,
            })
            .threads(self.threads)
            .log_every(self.log_every)
            .build()
    }

    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("installing the log subscriber")?;

    let project = Project::new(&cli.project);
    let options = cli.options();
    let written = project
        .solve(&options)
        .with_context(|| format!("solving {}", cli.project.display()))?;
    for path in written {
        tracing::info!(path = %path.display(), "wrote");
    }
    Ok(())
}
