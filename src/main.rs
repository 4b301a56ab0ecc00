use std::{
    error::Error,
    fs::File,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use crossterm::style::Stylize;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};

use tile_search::{
    graph::render_png,
    input::{read_instance, Instance},
    Board, DotGraph, GraphLogger, Move, NullLogger, Outcome, ReopenPolicy, SearchConfig,
    SearchEngine, SearchError,
};

#[derive(Parser, Debug)]
#[command(name = "tile-search")]
#[command(about = "Minimal move count for an N×N sliding-tile puzzle")]
struct Cli {
    /// Instance file: N, the start tiles, then the goal tiles. Reads stdin when omitted.
    #[arg(conflicts_with = "scramble")]
    input: Option<PathBuf>,

    /// Generate the start board by this many random slides from the solved board.
    #[arg(long, value_name = "MOVES")]
    scramble: Option<usize>,

    /// Board side used with --scramble.
    #[arg(long, default_value_t = 4)]
    size: usize,

    /// Seed for --scramble.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the search tree as a Graphviz document.
    #[arg(long, value_name = "PATH")]
    graph: Option<PathBuf>,

    /// Render the search tree to PNG with `dot`.
    #[arg(long, value_name = "PATH", requires = "graph")]
    render: Option<PathBuf>,

    /// Never move an expanded board back into the frontier.
    #[arg(long)]
    no_reopen: bool,

    /// Give up after expanding this many nodes.
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Print every board along the solution.
    #[arg(long)]
    show_path: bool,
}

impl Cli {
    fn config(&self) -> SearchConfig {
        let reopen = if self.no_reopen {
            ReopenPolicy::Never
        } else {
            ReopenPolicy::Reopen
        };
        let config = SearchConfig::default().with_reopen(reopen);
        match self.max_expansions {
            Some(limit) => config.with_max_expansions(limit),
            None => config,
        }
    }

    fn instance(&self) -> Result<Instance, Box<dyn Error>> {
        if let Some(moves) = self.scramble {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Board::check_side(self.size)?;
            if self.size < 2 {
                return Err("--scramble needs a board side of at least 2".into());
            }
            let start = Board::scrambled(self.size, moves, &mut rng);
            return Ok(Instance {
                start,
                goal: Board::solved(self.size),
            });
        }

        let instance = match &self.input {
            Some(path) => read_instance(File::open(path)?)?,
            None => read_instance(io::stdin().lock())?,
        };
        Ok(instance)
    }
}

fn search<L: GraphLogger>(
    instance: &Instance,
    config: SearchConfig,
    logger: L,
) -> Result<(Outcome, L), SearchError> {
    let mut engine = SearchEngine::with_logger(instance.goal.clone(), config, logger);
    let outcome = engine.solve(instance.start.clone())?;
    Ok((outcome, engine.into_logger()))
}

fn print_board(out: &mut impl Write, board: &Board) -> io::Result<()> {
    let width = (board.tiles().len() - 1).to_string().len();
    for row in board.rows() {
        for &val in row {
            let cell = format!("{:width$}", val, width = width);
            if val == 0 {
                write!(out, "{} ", cell.reverse())?;
            } else {
                write!(out, "{} ", cell.bold())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn print_path(out: &mut impl Write, start: &Board, path: &[Move]) -> io::Result<()> {
    let mut board = start.clone();
    print_board(out, &board)?;
    for &dir in path {
        board.apply_move(dir);
        writeln!(out, "\n{}", dir.to_string().green())?;
        print_board(out, &board)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let instance = cli.instance()?;
    if !instance.is_solvable() {
        warn!("goal is not reachable from start; the search will exhaust the frontier");
    }
    info!("solving {0}x{0} instance", instance.side());

    let outcome = match &cli.graph {
        Some(path) => {
            let (outcome, graph) = search(&instance, cli.config(), DotGraph::search_tree())?;
            graph.save(path)?;
            info!("wrote {} nodes to {}", graph.node_count(), path.display());
            if let Some(png) = &cli.render {
                render_png(path, png)?;
            }
            outcome
        }
        None => search(&instance, cli.config(), NullLogger)?.0,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", outcome.move_count())?;
    if let (true, Outcome::Solved(solution)) = (cli.show_path, &outcome) {
        print_path(&mut out, &instance.start, &solution.path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
