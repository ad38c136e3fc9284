use clap::Parser;
use npuzzle_solver::solver::{Outcome, SearchLimits, Solver};
use npuzzle_solver::Grid;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solve seeded random scrambles and report search statistics", long_about = None)]
struct Args {
    /// Grid dimension (3 for the 8-puzzle, 4 for the 15-puzzle)
    #[clap(short, long, default_value_t = 3)]
    dimension: usize,

    /// Number of random blank moves applied to the goal for each scramble
    #[clap(short, long, default_value_t = 40)]
    scramble_moves: usize,

    /// Number of scrambles to solve
    #[clap(short = 'n', long, default_value_t = 20)]
    count: u64,

    /// Seed of the first scramble; scramble `i` uses `start_seed + i`, wrapping at u64::MAX
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Per-scramble expansion cap
    #[clap(long)]
    max_expansions: Option<u64>,
}

/// Seed of the `i`-th scramble; wraps around instead of overflowing.
fn scramble_seed(start_seed: u64, i: u64) -> u64 {
    start_seed.wrapping_add(i)
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let goal = match Grid::solved(args.dimension) {
        Ok(goal) => goal,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut limits = SearchLimits::unbounded();
    limits.max_expansions = args.max_expansions;
    let solver = Solver::new(goal.clone()).with_limits(limits);

    println!(
        "Solving {} scrambles of the {}x{} puzzle ({} random moves each)...",
        args.count, args.dimension, args.dimension, args.scramble_moves
    );

    let mut solved = 0u64;
    let mut total_moves = 0usize;
    let mut total_expanded = 0u64;
    let mut total_elapsed = Duration::ZERO;

    for i in 0..args.count {
        let seed = scramble_seed(args.start_seed, i);
        let start = goal.scrambled(args.scramble_moves, seed);
        let started = Instant::now();
        let result = solver.solve(&start);
        let elapsed = started.elapsed();

        match result {
            Ok(Outcome::Solved(solution)) => {
                println!(
                    "  Seed: {:<6} Moves: {:<4} Rounds: {:<4} Expanded: {:<10} Time: {:.3}s",
                    seed,
                    solution.move_count,
                    solution.stats.rounds,
                    solution.stats.expanded,
                    elapsed.as_secs_f64()
                );
                solved += 1;
                total_moves += solution.move_count;
                total_expanded += solution.stats.expanded;
                total_elapsed += elapsed;
            }
            Ok(Outcome::Unsolvable) => {
                // A scramble is a walk from the goal, so this means a solver bug.
                eprintln!("Error: seed {} reported unsolvable:\n{}", seed, start);
                return ExitCode::FAILURE;
            }
            Err(e) => println!("  Seed: {:<6} gave up: {}", seed, e),
        }
    }

    println!("\n--- Benchmark Complete ---");
    println!("Solved: {}/{}", solved, args.count);
    if solved > 0 {
        println!("Average moves: {:.2}", total_moves as f64 / solved as f64);
        println!("Average expansions: {:.1}", total_expanded as f64 / solved as f64);
        println!("Average time: {:.4}s", total_elapsed.as_secs_f64() / solved as f64);
    }
    ExitCode::SUCCESS
}
