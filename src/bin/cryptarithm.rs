use clap::Parser;
use cryptarithm::{
    puzzle::Puzzle,
    solver::{search::BacktrackingSearch, stats::render_stats_table},
};
use tracing_subscriber::EnvFilter;

/// Solves cryptarithmetic puzzles such as SEND + MORE = MONEY.
///
/// Each letter stands for a distinct digit; the sum's leading letter may not
/// be zero. Diagnostic trace output is controlled with RUST_LOG.
#[derive(Parser, Debug)]
#[command(name = "cryptarithm", version, about)]
struct Cli {
    /// The first summand.
    summand1: String,
    /// The second summand.
    summand2: String,
    /// The sum of the two summands.
    sum: String,
    /// Print the solution as JSON.
    #[arg(long)]
    json: bool,
    /// Print per-constraint search statistics.
    #[arg(long)]
    stats: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let puzzle = match Puzzle::new(&cli.summand1, &cli.summand2, &cli.sum) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let search = BacktrackingSearch::default();
    let (solution, stats) = match puzzle.solve_with(&search) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if cli.stats {
        let csp = puzzle.compile();
        eprintln!("{}", render_stats_table(&stats, csp.constraints()));
    }

    match solution {
        Some(solution) => {
            if cli.json {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("{err}");
                        std::process::exit(1);
                    }
                }
            } else {
                println!("{solution}");
                if let (Some(s1), Some(s2), Some(s)) = (
                    solution.value_of(puzzle.summand1()),
                    solution.value_of(puzzle.summand2()),
                    solution.value_of(puzzle.sum()),
                ) {
                    println!("{s1} + {s2} = {s}");
                }
            }
        }
        None => {
            println!("There is no solution for the puzzle: {puzzle}");
            std::process::exit(2);
        }
    }
}
