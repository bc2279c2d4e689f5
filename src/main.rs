use log::*;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::fs::{File, OpenOptions};
use std::io::{stdin, BufReader, ErrorKind, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};
use structopt::StructOpt;

use ufvs::algorithm::IterativeAlgorithm;
use ufvs::graph::io::{read_solution, write_solution, DotWrite, FileFormat, GraphRead};
use ufvs::graph::*;
use ufvs::heuristics::greedy::{greedy_forest, ConstructionOrder};
use ufvs::heuristics::local_search::{
    ConflictScoring, DegreeScoring, ForestLocalSearch, FvsState, Scoring, SearchParams,
};
use ufvs::signal_handling;

type Graph = AdjArray;

#[cfg(feature = "jemallocator")]
#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(feature = "jemallocator")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ufvs",
    about = "Computes a small feedback vertex set of an undirected graph by local search."
)]
struct Opt {
    /// Input file. `stdin` if not specified.
    #[structopt(short, long, parse(from_os_str))]
    input: Option<PathBuf>,

    /// Input format: 'pace' or 'metis'
    #[structopt(short = "F", long, default_value = "pace")]
    input_format: FileFormat,

    /// Output file. `stdout` if not specified.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Output format: 'solution' (one vertex per line) or 'dot' (graph with solution highlighted)
    #[structopt(short = "f", long, default_value = "solution")]
    output_format: OutputFormat,

    /// Start from this solution instead of the greedy construction
    #[structopt(long, parse(from_os_str))]
    initial: Option<PathBuf>,

    /// Seed value
    #[structopt(short, long, default_value = "0")]
    seed: u64,

    /// Time budget in seconds. Without budget the search runs until it is interrupted.
    #[structopt(short, long)]
    timeout: Option<f64>,

    /// Maximal number of local search iterations
    #[structopt(short, long)]
    max_iterations: Option<u64>,

    /// Order of the greedy construction: 'degree-asc', 'degree-desc' or 'random'
    #[structopt(short, long, default_value = "degree-asc")]
    construction: ConstructionOrder,

    /// Vertex scoring: 'conflict' or 'degree'
    #[structopt(long, default_value = "conflict")]
    scoring: ScoringKind,

    #[structopt(long)]
    sample_size: Option<usize>,

    #[structopt(long)]
    max_idle_steps: Option<usize>,

    /// Neutral swaps count towards `max-idle-steps`
    #[structopt(long)]
    count_plateau_as_idle: bool,

    #[structopt(long)]
    perturbation_strength: Option<usize>,

    #[structopt(long)]
    force_in_probability: Option<f64>,

    #[structopt(long)]
    tabu_tenure: Option<u64>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

impl Opt {
    fn search_params(&self) -> std::io::Result<SearchParams> {
        let default = SearchParams::default();
        let params = SearchParams {
            sample_size: self.sample_size.unwrap_or(default.sample_size),
            max_idle_steps: self.max_idle_steps.unwrap_or(default.max_idle_steps),
            count_plateau_as_idle: self.count_plateau_as_idle,
            perturbation_strength: self
                .perturbation_strength
                .unwrap_or(default.perturbation_strength),
            force_in_probability: self
                .force_in_probability
                .unwrap_or(default.force_in_probability),
            tabu_tenure: self.tabu_tenure.unwrap_or(default.tabu_tenure),
            max_iterations: self.max_iterations,
        };

        params.validate()?;
        Ok(params)
    }

    fn timeout(&self) -> std::io::Result<Option<Duration>> {
        self.timeout
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|err| {
                    std::io::Error::new(
                        ErrorKind::InvalidInput,
                        format!("Invalid timeout '{}': {}", secs, err),
                    )
                })
            })
            .transpose()
    }
}

// Output Format ////////////////////////////////////////////
#[derive(PartialEq, Debug)]
enum OutputFormat {
    Solution,
    Dot,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "solution" | "pace" => Ok(OutputFormat::Solution),
            "dot" => Ok(OutputFormat::Dot),
            _ => Err(format!("'{}' is an invalid OutputFormat.", value)),
        }
    }
}

// Scoring ////////////////////////////////////////////
#[derive(PartialEq, Debug)]
enum ScoringKind {
    Conflict,
    Degree,
}

impl FromStr for ScoringKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "conflict" => Ok(ScoringKind::Conflict),
            "degree" => Ok(ScoringKind::Degree),
            _ => Err(format!("'{}' is an invalid Scoring.", value)),
        }
    }
}

fn main() -> std::io::Result<()> {
    let opt = Opt::from_args();
    ufvs::log::build_pace_logger_for_verbosity(LevelFilter::Warn, opt.verbose);
    signal_handling::initialize();

    let params = opt.search_params()?;
    let timeout = opt.timeout()?;

    let graph: Graph = match &opt.input {
        Some(path) => {
            info!("Read file {:?}", path);
            Graph::try_read_graph(opt.input_format, path)?
        }
        None => {
            let stdin = stdin();
            Graph::try_read_format(opt.input_format, stdin.lock())?
        }
    };

    info!(
        "Input graph with n={}, m={}, self-loops={}",
        graph.number_of_nodes(),
        graph.number_of_edges(),
        graph.self_loops().len()
    );

    let start = Instant::now();
    let solution = match opt.scoring {
        ScoringKind::Conflict => solve(&graph, ConflictScoring, &opt, params, timeout)?,
        ScoringKind::Degree => solve(&graph, DegreeScoring, &opt, params, timeout)?,
    };
    info!(
        "Solution has size {}. Elapsed: {}ms",
        solution.len(),
        start.elapsed().as_millis()
    );

    // Verify solution
    {
        info!("Verify solution {}", solution.len());
        assert!(solution.windows(2).all(|w| w[0] < w[1]));
        assert!(graph.is_forest_without(&solution));
    }

    // Output solution
    if let Some(path) = &opt.output {
        let writer = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        output_result(writer, &opt.output_format, &graph, &solution)?;
    } else {
        output_result(std::io::stdout().lock(), &opt.output_format, &graph, &solution)?;
    }

    info!("Done");

    Ok(())
}

fn solve<S: Scoring<Graph>>(
    graph: &Graph,
    scoring: S,
    opt: &Opt,
    params: SearchParams,
    timeout: Option<Duration>,
) -> std::io::Result<Vec<Node>> {
    let mut rng = Pcg64::seed_from_u64(opt.seed);

    let state = match &opt.initial {
        Some(path) => {
            info!("Read initial solution {:?}", path);
            let fvs = read_solution(BufReader::new(File::open(path)?), graph.len())?;
            FvsState::from_fvs(graph, scoring, &fvs).ok_or_else(|| {
                std::io::Error::new(
                    ErrorKind::InvalidData,
                    "Initial solution is not a feedback vertex set",
                )
            })?
        }
        None => greedy_forest(graph, scoring, opt.construction, &mut rng),
    };
    info!("Initial solution has size {}", state.deletion_set_size());

    let mut algo = ForestLocalSearch::new(state, params, rng);
    match timeout {
        Some(timeout) => algo.run_until_timeout(timeout),
        None => algo.run_while(|_| true),
    }
    algo.log_statistics();

    Ok(algo
        .best_known_solution()
        .expect("Local search always holds a solution")
        .to_vec())
}

fn output_result<W: Write>(
    mut writer: W,
    format: &OutputFormat,
    graph: &Graph,
    solution: &[Node],
) -> std::io::Result<()> {
    match format {
        OutputFormat::Solution => write_solution(&mut writer, solution)?,
        OutputFormat::Dot => {
            graph.try_write_dot_with_solution(&mut writer, solution.iter().copied())?
        }
    }

    writer.flush()
}
