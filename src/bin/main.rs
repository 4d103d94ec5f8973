use std::path::PathBuf;
use std::rc::Rc;

use anstream::println;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use derive_more::Display;
use indoc::indoc;
use owo_colors::OwoColorize;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use statespace::CspAlgorithm;
use statespace::Node;
use statespace::Problem;
use statespace::problems::map_coloring::australia;
use statespace::problems::maze_2d::Maze2DProblem;
use statespace::problems::weighted_graph::WeightedGraph;
use statespace::space::Action;
use statespace::space::State;

#[cfg(feature = "mem_profile")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;
#[cfg(all(not(feature = "mem_profile"), not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const SAMPLE_MAZE: &str = indoc! {"
    S.....#.........
    .####.#.######..
    .#....#......#..
    .#.#######.#.#..
    .#.........#.#G.
    .###########.##.
    ................
"};

const PALETTE: [&str; 8] = [
    "red", "green", "blue", "yellow", "cyan", "magenta", "white", "black",
];

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = statespace::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Logs every search step.
    #[arg(short, long, global = true, env = "SEARCH_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Finds a path on a small weighted graph.
    Graph {
        #[arg(short, long, value_enum, default_value_t = PathAlgorithm::AStar)]
        algorithm: PathAlgorithm,
        #[arg(long, default_value = "A")]
        from: String,
        #[arg(long, default_value = "D")]
        to: String,
    },
    /// Finds a path through a maze.
    ///
    /// Reads the maze from a file, generates one from a seed, or falls back to
    /// a built-in sample.
    Maze {
        #[arg(short, long, value_enum, default_value_t = PathAlgorithm::AStar)]
        algorithm: PathAlgorithm,
        #[arg(short, long, conflicts_with = "seed")]
        file: Option<PathBuf>,
        #[arg(short, long, env = "SEARCH_SEED")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 64)]
        width: usize,
        #[arg(long, default_value_t = 32)]
        height: usize,
        /// Probability of each cell being a wall, in `[0, 1]`.
        #[arg(long, default_value_t = 0.25, value_parser = parse_density)]
        density: f64,
    },
    /// Colours the map of Australia.
    Csp {
        /// One of backtracking, dfs, best_first.
        #[arg(short, long, default_value_t = CspAlgorithm::Backtracking)]
        algorithm: CspAlgorithm,
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=8))]
        colours: u8,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum PathAlgorithm {
    #[display("BFS")]
    Bfs,
    #[display("DFS")]
    Dfs,
    #[display("UCS")]
    Ucs,
    #[display("Greedy")]
    Greedy,
    #[value(name = "astar")]
    #[display("A*")]
    AStar,
}

fn search<P, St, A>(
    algorithm: PathAlgorithm,
    problem: &P,
    initial: St,
    goal: &St,
    verbose: bool,
) -> Option<Rc<Node<St, A>>>
where
    P: Problem<St, A>,
    St: State,
    A: Action,
{
    #[cfg(feature = "coz_profile")]
    coz::scope!("Search");

    match algorithm {
        PathAlgorithm::Bfs => statespace::breadth_first_search(problem, initial, goal, verbose),
        PathAlgorithm::Dfs => statespace::depth_first_search(problem, initial, goal, verbose),
        PathAlgorithm::Ucs => statespace::uniform_cost_search(problem, initial, goal, verbose),
        PathAlgorithm::Greedy => {
            statespace::greedy_best_first_search(problem, initial, goal, verbose)
        }
        PathAlgorithm::AStar => statespace::astar_search(problem, initial, goal, verbose),
    }
}

fn report<St: State, A: Action + std::fmt::Display>(
    algorithm: PathAlgorithm,
    node: Option<&Rc<Node<St, A>>>,
) {
    let Some(node) = node else {
        println!("{}: {}", algorithm.bold(), "No solution".red());
        return;
    };
    let actions: Vec<String> = node.solution().iter().map(|a| a.to_string()).collect();
    println!(
        "{}: {} in {} steps, cost {:.3}",
        algorithm.bold(),
        "Solved".green(),
        node.depth(),
        node.path_cost().cyan(),
    );
    println!("  {}", actions.join(" "));
}

/// `A -> {B: 1, C: 4}, B -> {C: 2, D: 5}, C -> {D: 1}`, estimating the
/// distance to `D`.
fn sample_graph() -> WeightedGraph<String> {
    let mut g = WeightedGraph::new();
    for (from, to, w) in [
        ("A", "B", 1.0),
        ("A", "C", 4.0),
        ("B", "C", 2.0),
        ("B", "D", 5.0),
        ("C", "D", 1.0),
    ] {
        g.add_edge(from.to_string(), to.to_string(), w);
    }
    g.add_node("D".to_string());
    g.with_estimates([("A", 3.0), ("B", 2.0), ("C", 1.0)].map(|(n, h)| (n.to_string(), h)))
}

fn load_maze(
    file: Option<PathBuf>,
    seed: Option<u64>,
    width: usize,
    height: usize,
    density: f64,
) -> std::io::Result<Maze2DProblem> {
    if let Some(path) = file {
        let text = std::fs::read_to_string(&path)?;
        return Maze2DProblem::try_from(text.as_str())
            .map_err(|e| std::io::Error::other(format!("Failed parsing {path:?}. {e}")));
    }
    if let Some(seed) = seed {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        return Maze2DProblem::random(&mut rng, width, height, density).ok_or_else(|| {
            std::io::Error::other(format!(
                "Failed to generate a {width}x{height} maze with density {density} (seed {seed})"
            ))
        });
    }
    Maze2DProblem::try_from(SAMPLE_MAZE)
        .map_err(|e| std::io::Error::other(format!("Failed parsing the sample maze. {e}")))
}

fn parse_density(s: &str) -> Result<f64, String> {
    let density: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err(format!("{density} is not in [0, 1]"))
    }
}

/// `RUST_LOG` directives if given, otherwise `info` when verbose and `warn`
/// when not.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let default = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

fn main() -> std::io::Result<()> {
    #[cfg(feature = "coz_profile")]
    coz::thread_init();
    #[cfg(feature = "mem_profile")]
    let _profiler = dhat::Profiler::new_heap();

    let args = Args::parse();
    args.color.write_global();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Graph {
            algorithm,
            from,
            to,
        } => {
            let g = sample_graph();
            println!("{}", format!("{from} -> {to}").blue());
            let node = search(algorithm, &g, from, &to, args.verbose);
            if let Some(n) = &node {
                let states: Vec<&str> = n.path().iter().map(|n| n.state().as_str()).collect();
                println!("  {}", states.join(" -> "));
            }
            report(algorithm, node.as_ref());
        }
        Command::Maze {
            algorithm,
            file,
            seed,
            width,
            height,
            density,
        } => {
            let problem = load_maze(file, seed, width, height, density)?;
            println!("{problem}");
            let node = search(
                algorithm,
                &problem,
                problem.start(),
                &problem.goal(),
                args.verbose,
            );
            report(algorithm, node.as_ref());
            if let Some(view) = node.and_then(|n| problem.view_state(n.state()).ok()) {
                println!("{view}");
            }
        }
        Command::Csp { algorithm, colours } => {
            let palette: Vec<String> = PALETTE
                .iter()
                .take(colours as usize)
                .map(|c| c.to_string())
                .collect();
            let problem = australia(&palette)
                .map_err(|e| std::io::Error::other(format!("Invalid CSP. {e}")))?;
            match statespace::csp_search(&problem, algorithm, args.verbose) {
                Some(solution) => {
                    println!("{}: {}", algorithm.bold(), "Solved".green());
                    for (region, colour) in solution {
                        println!("  {region:>3} = {colour}");
                    }
                }
                None => println!("{}: {}", algorithm.bold(), "No solution".red()),
            }
        }
    }

    Ok(())
}
