use clap::Parser;
use npuzzle_solver::solver::{Outcome, SearchLimits, Solver};
use npuzzle_solver::utils::{blank_index_from_arg, read_puzzle_file};
use npuzzle_solver::PuzzleError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the puzzle file (initial grid, blank line, optional goal grid)
    puzzle_file: PathBuf,

    /// Row-major index of the blank in the generated goal, used when the file has no goal grid
    /// (-1 keeps the default bottom-right corner)
    #[clap(short, long, allow_negative_numbers = true)]
    blank_index: Option<i64>,

    /// Give up after this many threshold rounds
    #[clap(long)]
    max_rounds: Option<u32>,

    /// Give up after this many state expansions
    #[clap(long)]
    max_expansions: Option<u64>,

    /// Give up after this many seconds
    #[clap(long)]
    time_limit_secs: Option<u64>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), PuzzleError> {
    let puzzle = read_puzzle_file(&args.puzzle_file)?;
    let goal = puzzle.goal_or_default(blank_index_from_arg(args.blank_index)?)?;
    println!("Loaded puzzle from {}\n", args.puzzle_file.display());
    println!("Initial board:\n{}\n", puzzle.initial);
    println!("Goal board:\n{}\n", goal);

    let mut limits = SearchLimits::unbounded();
    limits.max_rounds = args.max_rounds;
    limits.max_expansions = args.max_expansions;
    limits.time_limit = args.time_limit_secs.map(Duration::from_secs);

    match Solver::new(goal).with_limits(limits).solve(&puzzle.initial)? {
        Outcome::Unsolvable => println!("Not solvable!"),
        Outcome::Solved(solution) => {
            println!("{}", solution.move_count);
            for direction in &solution.moves {
                println!("{}", direction);
            }
            tracing::info!(
                rounds = solution.stats.rounds,
                expanded = solution.stats.expanded,
                generated = solution.stats.generated,
                "search statistics"
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
