//! CLI entry point for the burrow solver.
//!
//! Usage:
//!   burrow-solver solve <burrow.txt> [options]
//!   burrow-solver solve --stdin [options]
//!
//! Options:
//!   --depth <2|4>            Room depth to solve, repeatable. Defaults to both
//!                            for a two-row diagram, and to 4 for a four-row one
//!   --strategy <strategy>    dijkstra or relaxation (default: dijkstra)
//!   --trace                  Include the winning steps and print each board to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use burrow_solver::{
    parse_burrow, replay, room_depth, solve, Burrow, Error, ParseError, SolverConfig, Step,
    Strategy,
};

#[derive(Parser)]
#[command(name = "burrow-solver")]
#[command(about = "Minimum-energy solver for the amphipod burrow sorting puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the cheapest way to sort a burrow
    Solve {
        /// Path to the burrow diagram (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the diagram from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Room depth to solve, may be given more than once
        #[arg(long, value_enum)]
        depth: Vec<DepthArg>,

        /// Search strategy
        #[arg(long, value_enum, default_value_t = StrategyArg::Dijkstra)]
        strategy: StrategyArg,

        /// Record the winning steps and print every intermediate board
        #[arg(long)]
        trace: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DepthArg {
    #[value(name = "2")]
    Two,
    #[value(name = "4")]
    Four,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Dijkstra,
    Relaxation,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Dijkstra => Strategy::Dijkstra,
            StrategyArg::Relaxation => Strategy::Relaxation,
        }
    }
}

/// Output format for one solved depth
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    depth: usize,
    strategy: Strategy,
    min_energy: u64,
    states_expanded: usize,
    states_recorded: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<Vec<Step>>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            depth,
            strategy,
            trace,
        } => {
            // Read burrow diagram
            let input = if stdin {
                let mut buffer = String::new();
                if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
                buffer
            } else if let Some(path) = file {
                match fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        eprintln!("Error reading file {:?}: {}", path, e);
                        std::process::exit(1);
                    }
                }
            } else {
                eprintln!("Error: Must provide either a file path or --stdin");
                std::process::exit(1);
            };

            let depths = if depth.is_empty() {
                match default_depths(&input) {
                    Ok(depths) => depths,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                depth
            };

            let config = SolverConfig {
                strategy: strategy.into(),
                record_path: trace,
            };

            let mut outputs = Vec::with_capacity(depths.len());
            for depth in depths {
                let result = match depth {
                    DepthArg::Two => run::<2>(&input, &config, trace),
                    DepthArg::Four => run::<4>(&input, &config, trace),
                };
                match result {
                    Ok(output) => outputs.push(output),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }

            match serde_json::to_string_pretty(&outputs) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing result: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Depths worth solving when none were asked for.
///
/// A two-row diagram is solved as drawn and unfolded. A four-row diagram is
/// already unfolded and can only be read at depth 4.
fn default_depths(input: &str) -> Result<Vec<DepthArg>, ParseError> {
    match room_depth(input)? {
        4 => Ok(vec![DepthArg::Four]),
        2 => Ok(vec![DepthArg::Two, DepthArg::Four]),
        found => Err(ParseError::DepthMismatch { found, depth: 2 }),
    }
}

/// Parse and solve the diagram with rooms of depth `N`
fn run<const N: usize>(
    input: &str,
    config: &SolverConfig,
    trace: bool,
) -> Result<SolveOutput, Error> {
    let start: Burrow<N> = parse_burrow(input)?;
    let result = solve(&start, config)?;

    if trace {
        if let Some(steps) = &result.steps {
            print_trace(&start, steps);
        }
    }

    Ok(SolveOutput {
        depth: N,
        strategy: config.strategy,
        min_energy: result.min_energy,
        states_expanded: result.states_expanded,
        states_recorded: result.states_recorded,
        time_elapsed_ms: result.time_elapsed_ms,
        steps: result.steps,
    })
}

/// Print every board along the solution to stderr
fn print_trace<const N: usize>(start: &Burrow<N>, steps: &[Step]) {
    eprintln!("depth {}, start:\n{}\n", N, start);

    let mut burrow = *start;
    let mut spent = 0;
    for step in steps {
        match replay(&burrow, step) {
            Some(next) => burrow = next,
            None => {
                eprintln!("step {:?} cannot be replayed", step);
                return;
            }
        }
        spent += step.energy;
        eprintln!(
            "{} moves for {} (total {}):\n{}\n",
            step.species, step.energy, spent, burrow
        );
    }
}
