//! CLI entry point for the triangle puzzle tools.
//!
//! Usage:
//!   triangle-puzzle solve <puzzle.txt|puzzle.json> [--json]
//!   triangle-puzzle generate [--rows <n>] [--difficulty <level>] [--output <file>] [options]
//!   triangle-puzzle verify <puzzle> [--json]
//!
//! Puzzles are read as JSON when the input starts with `{`, otherwise as
//! the plain-text format.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use triangle_puzzle::generator::DEFAULT_MAX_ATTEMPTS;
use triangle_puzzle::{
    count_solutions, generate_with, parse_puzzle, render_puzzle, solve_with_stats,
    write_puzzle_files, Difficulty, GeneratorConfig, Layout, Puzzle, PuzzleError,
};

#[derive(Parser)]
#[command(name = "triangle-puzzle")]
#[command(about = "Solve and generate multiplicative triangle path puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Where to read a puzzle from
#[derive(Args)]
struct Input {
    /// Path to a puzzle file (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read puzzle from stdin instead of file
    #[arg(long)]
    stdin: bool,
}

#[derive(Args)]
struct LayoutArgs {
    /// Spaces after each comma within a row
    #[arg(long, default_value = "1")]
    horizontal_spacing: usize,

    /// Blank lines between rows
    #[arg(long, default_value = "0")]
    vertical_spacing: usize,
}

impl LayoutArgs {
    fn layout(&self) -> Layout {
        Layout {
            horizontal_spacing: self.horizontal_spacing,
            vertical_spacing: self.vertical_spacing,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find the path whose product equals the target
    Solve {
        #[command(flatten)]
        input: Input,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Generate a puzzle with exactly one solution
    Generate {
        /// Number of rows (2 to 11)
        #[arg(long, default_value = "5")]
        rows: usize,

        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,

        /// Seed for a reproducible puzzle
        #[arg(long)]
        seed: Option<u64>,

        /// Candidate triangles to try before giving up
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,

        /// Write the puzzle to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also write an answer key next to the output file
        #[arg(long, requires = "output")]
        answer_key: bool,

        /// Include the solution when printing to stdout
        #[arg(long)]
        show_solution: bool,

        /// Print the puzzle as JSON
        #[arg(long, conflicts_with = "output")]
        json: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Check that exactly one path reaches the target
    Verify {
        #[command(flatten)]
        input: Input,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Output format for a solve result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    nodes_entered: usize,
    backtracks: usize,
    time_elapsed_ms: u64,
}

/// Output format for a uniqueness check
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOutput {
    unique: bool,
    solution_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_solution_valid: Option<bool>,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    match run(cli.command) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

/// Run one subcommand. `Ok(false)` means it ran but the answer was negative.
fn run(command: Commands) -> Result<bool, PuzzleError> {
    match command {
        Commands::Solve {
            input,
            json,
            layout,
        } => {
            let puzzle = read_puzzle(&input)?;
            let (result, stats) = solve_with_stats(puzzle.triangle(), puzzle.target());

            // Only "no path" is an answer; malformed input is an error.
            let solution = match result {
                Ok(path) => Some(path),
                Err(PuzzleError::Unsolvable) => None,
                Err(e) => return Err(e),
            };

            if json {
                let output = SolveOutput {
                    solved: solution.is_some(),
                    solution: solution.as_ref().map(|path| path.to_string()),
                    reason: solution
                        .is_none()
                        .then(|| PuzzleError::Unsolvable.to_string()),
                    nodes_entered: stats.nodes_entered,
                    backtracks: stats.backtracks,
                    time_elapsed_ms: stats.elapsed.as_millis() as u64,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match &solution {
                    Some(path) => print!("{}", render_puzzle(&puzzle, Some(path), &layout.layout())),
                    None => println!("{}", PuzzleError::Unsolvable),
                }
            }
            Ok(solution.is_some())
        }

        Commands::Generate {
            rows,
            difficulty,
            seed,
            max_attempts,
            output,
            answer_key,
            show_solution,
            json,
            layout,
        } => {
            let config = GeneratorConfig {
                rows,
                difficulty,
                max_attempts,
                seed,
            };
            let puzzle = generate_with(&config)?;

            if let Some(path) = output {
                for written in write_puzzle_files(&path, &puzzle, &layout.layout(), answer_key)? {
                    println!("{}", written.display());
                }
            } else if json {
                println!("{}", serde_json::to_string_pretty(&puzzle)?);
            } else {
                let solution = if show_solution { puzzle.solution() } else { None };
                print!("{}", render_puzzle(&puzzle, solution, &layout.layout()));
            }
            Ok(true)
        }

        Commands::Verify { input, json } => {
            let puzzle = read_puzzle(&input)?;
            let solution_count = count_solutions(puzzle.triangle(), puzzle.target())?;
            let stored_solution_valid = puzzle.solution().map(|path| puzzle.is_solution(path));
            let unique = solution_count == 1 && stored_solution_valid != Some(false);

            if json {
                let output = VerifyOutput {
                    unique,
                    solution_count,
                    stored_solution_valid,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{} path(s) reach {}", solution_count, puzzle.target());
                if stored_solution_valid == Some(false) {
                    println!("the stored solution does not reach the target");
                }
            }
            Ok(unique)
        }
    }
}

fn read_puzzle(input: &Input) -> Result<Puzzle, PuzzleError> {
    let content = if input.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = &input.file {
        info!(path = %path.display(), "reading puzzle");
        fs::read_to_string(path)?
    } else {
        return Err(PuzzleError::InvalidInput(
            "must provide either a file path or --stdin".to_string(),
        ));
    };

    if content.trim_start().starts_with('{') {
        Ok(serde_json::from_str(&content)?)
    } else {
        parse_puzzle(&content)
    }
}
