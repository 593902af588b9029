use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use mk_rg::{phase_sink, CoarseOpts, Phase, SinkOpts};
use mk_search::{critical_point, Direction, SearchOpts, SearchReport, SearchStage};

#[derive(Parser, Debug)]
#[command(name = "mk-sim", about = "Migdal-Kadanoff phase-diagram CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single phase-sink probe at fixed parameters.
    Sink(SinkArgs),
    /// Locate a critical point by bracketing and bisection.
    Critical(CriticalArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TargetPhase {
    Ferro,
    Disorder,
}

impl From<TargetPhase> for Phase {
    fn from(target: TargetPhase) -> Self {
        match target {
            TargetPhase::Ferro => Phase::Ferro,
            TargetPhase::Disorder => Phase::Disorder,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Axis {
    Vertical,
    Horizontal,
}

impl From<Axis> for Direction {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Direction::Vertical,
            Axis::Horizontal => Direction::Horizontal,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct SinkArgs {
    /// Temperature of the probe; the coupling is its reciprocal.
    #[arg(long)]
    temperature: f64,
    /// Fraction of antiferromagnetic bonds.
    #[arg(long, default_value_t = 0.0)]
    concentration: f64,
    /// Phase sink the probe waits for.
    #[arg(long, value_enum, default_value = "disorder")]
    target: TargetPhase,
    /// Number of bonds modelled per generation.
    #[arg(long, default_value_t = 1000)]
    lattice_size: usize,
    /// Maximum coarse-graining generations.
    #[arg(long, default_value_t = 29)]
    generations: usize,
    /// Sampling seed for the coarse-graining step.
    #[arg(long, default_value_t = 19)]
    seed: u64,
    /// Emit the report as JSON instead of prose.
    #[arg(long)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct CriticalArgs {
    /// Starting temperature (vertical) or fixed temperature (horizontal).
    #[arg(long)]
    temperature: f64,
    /// Fixed concentration (vertical) or starting concentration (horizontal).
    #[arg(long, default_value_t = 0.0)]
    concentration: f64,
    /// Search axis.
    #[arg(long, value_enum, default_value = "vertical")]
    direction: Axis,
    /// Bisection tolerance.
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,
    /// Number of bonds modelled per generation.
    #[arg(long, default_value_t = 1000)]
    lattice_size: usize,
    /// Maximum coarse-graining generations per probe.
    #[arg(long, default_value_t = 29)]
    generations: usize,
    /// Sampling seed for the coarse-graining step.
    #[arg(long, default_value_t = 19)]
    seed: u64,
    /// YAML file with the full search configuration; overrides the flags
    /// above except temperature, concentration and direction.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit the report as JSON instead of prose.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Sink(args) => run_sink(args),
        Command::Critical(args) => run_critical(args),
    }
}

fn run_sink(args: SinkArgs) -> Result<(), Box<dyn Error>> {
    let opts = SinkOpts {
        lattice_size: args.lattice_size,
        max_generations: args.generations,
        coarse: CoarseOpts { seed: args.seed },
    };
    let coupling = 1.0 / args.temperature;
    let report = phase_sink(coupling, args.concentration, args.target.into(), &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "T = {} p = {} -> {} after {} generations",
            args.temperature, args.concentration, report.verdict, report.generations
        );
        println!(
            "tally: ferro={} aferro={} disorder={} out-of-sink={}",
            report.tally.ferro, report.tally.aferro, report.tally.disorder, report.tally.out_of_sink
        );
    }
    Ok(())
}

fn run_critical(args: CriticalArgs) -> Result<(), Box<dyn Error>> {
    let opts = match &args.config {
        Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        None => SearchOpts {
            tolerance: args.tolerance,
            sink: SinkOpts {
                lattice_size: args.lattice_size,
                max_generations: args.generations,
                coarse: CoarseOpts { seed: args.seed },
            },
            ..SearchOpts::default()
        },
    };

    let report = critical_point(
        args.temperature,
        args.concentration,
        args.direction.into(),
        &opts,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        narrate(&report);
    }
    Ok(())
}

fn narrate(report: &SearchReport) {
    let label = match report.direction {
        Direction::Vertical => "T",
        Direction::Horizontal => "p",
    };
    for step in &report.steps {
        let stage = match step.stage {
            SearchStage::Bracket => "bracketing",
            SearchStage::Bisect => "bisection ",
        };
        println!(
            "{stage}: {label} = {:.4} -> {} ({} generations) | bracket [{}, {}]",
            step.trial,
            step.verdict,
            step.generations,
            bound(step.low),
            bound(step.high)
        );
    }
    println!(
        "critical point = {:.4} ({} oracle calls, bracket width {:.4})",
        report.critical,
        report.oracle_calls,
        (report.bracket.1 - report.bracket.0).abs()
    );
}

fn bound(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "?".to_string(),
    }
}
