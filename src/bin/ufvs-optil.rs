use log::*;
use std::io::{stdin, stdout};

use rand::SeedableRng;
use rand_pcg::Pcg64;
use ufvs::algorithm::IterativeAlgorithm;
use ufvs::graph::io::{write_solution, MetisRead};
use ufvs::graph::*;
use ufvs::heuristics::greedy::{greedy_forest, ConstructionOrder};
use ufvs::heuristics::local_search::{ConflictScoring, ForestLocalSearch, SearchParams};
use ufvs::log::build_pace_logger_for_level;
use ufvs::signal_handling;

#[cfg(feature = "jemallocator")]
#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(feature = "jemallocator")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

type Graph = AdjArray;

/// Reads a METIS graph from stdin and improves a solution until SIGINT or SIGTERM arrives;
/// then the best solution is written to stdout.
fn main() -> std::io::Result<()> {
    build_pace_logger_for_level(LevelFilter::Off);
    signal_handling::initialize();

    let graph = {
        let stdin = stdin();
        Graph::try_read_metis(stdin.lock())?
    };

    info!(
        "Input graph with n={}, m={}",
        graph.number_of_nodes(),
        graph.number_of_edges()
    );

    let mut rng = Pcg64::seed_from_u64(0);
    let state = greedy_forest(
        &graph,
        ConflictScoring,
        ConstructionOrder::DegreeAscending,
        &mut rng,
    );
    info!("Greedy solution has size {}", state.deletion_set_size());

    let mut algo = ForestLocalSearch::new(state, SearchParams::default(), rng);
    trace!("Searching until a termination signal is received...");
    algo.run_while(|_| true);
    algo.log_statistics();

    let solution = algo
        .best_known_solution()
        .expect("Local search always holds a solution")
        .to_vec();
    info!("Solution has size {}", solution.len());

    // Verify solution
    assert!(graph.is_forest_without(&solution));

    let stdout = stdout();
    write_solution(stdout.lock(), &solution)?;

    Ok(())
}
