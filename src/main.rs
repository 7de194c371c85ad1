use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use slider::{parse_board, Board, Solution, Solver, SolverConfig, TwinSelection};

const USAGE: &str = "Usage: slider [--seed N] [--closed-set] [--max-expansions N] [FILE...]

Reads puzzles in the format `n` followed by n*n tiles, 0 being the blank.
Without FILE, a single puzzle is read from stdin.";

struct Args {
    config: SolverConfig,
    files: Vec<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut config = SolverConfig::default();
    let mut files = vec![];
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--seed" => {
                let seed = args.next().context("--seed needs a value")?;
                let seed = seed.parse().with_context(|| format!("Invalid seed {seed:?}"))?;
                config.twin = TwinSelection::Seeded(seed);
            }
            "--closed-set" => config.closed_set = true,
            "--max-expansions" => {
                let limit = args.next().context("--max-expansions needs a value")?;
                let limit = limit
                    .parse()
                    .with_context(|| format!("Invalid expansion limit {limit:?}"))?;
                config.max_expansions = Some(limit);
            }
            flag if flag.starts_with('-') => bail!("Unknown option {flag}\n\n{USAGE}"),
            file => files.push(PathBuf::from(file)),
        }
    }
    Ok(Some(Args { config, files }))
}

fn read_board(path: &Path) -> Result<Board> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_board(&input).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_solution(solution: &Solution) {
    match solution {
        Solution::Unsolvable => println!("No solution possible"),
        Solution::Solved { path } => {
            println!("Minimum number of moves = {}", path.len() - 1);
            for board in path {
                println!("{}\n", board);
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };
    let solver = Solver::new(args.config);
    info!("Solving with {:?}", solver.config());

    if args.files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read puzzle from stdin")?;
        let board = parse_board(&input).context("Failed to parse puzzle from stdin")?;
        let (solution, stats) = solver.solve_with_stats(&board)?;
        info!("{:?}", stats);
        print_solution(&solution);
        return Ok(());
    }

    let boards = args
        .files
        .iter()
        .map(|path| read_board(path))
        .collect::<Result<Vec<Board>>>()?;
    let solutions = solver.solve_all(&boards);
    for (path, solution) in args.files.iter().zip(solutions) {
        let solution = solution.with_context(|| format!("Failed to solve {}", path.display()))?;
        if args.files.len() > 1 {
            println!("{}:", path.display());
        }
        print_solution(&solution);
    }
    Ok(())
}
