use super::local_search::fvs_state::FvsState;
use super::local_search::scoring::Scoring;
use crate::graph::{AdjacencyList, Node, SelfLoops};
use itertools::Itertools;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;
use std::str::FromStr;

/// Order in which [`greedy_forest`] tries to keep the vertices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstructionOrder {
    DegreeDescending,
    DegreeAscending,
    Random,
}

impl Default for ConstructionOrder {
    fn default() -> Self {
        ConstructionOrder::DegreeAscending
    }
}

impl FromStr for ConstructionOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "degree-desc" => Ok(ConstructionOrder::DegreeDescending),
            "degree-asc" => Ok(ConstructionOrder::DegreeAscending),
            "random" => Ok(ConstructionOrder::Random),
            _ => Err(format!("'{}' is an invalid ConstructionOrder.", value)),
        }
    }
}

impl ConstructionOrder {
    /// Returns the vertices without self-loop in this order; ties are broken by id
    pub fn arrange<G: AdjacencyList + SelfLoops, R: Rng>(
        &self,
        graph: &G,
        rng: &mut R,
    ) -> Vec<Node> {
        let candidates = graph.vertices().filter(|&u| !graph.has_self_loop(u));
        match self {
            ConstructionOrder::DegreeDescending => candidates
                .sorted_by_key(|&u| (Reverse(graph.degree(u)), u))
                .collect(),
            ConstructionOrder::DegreeAscending => candidates
                .sorted_by_key(|&u| (graph.degree(u), u))
                .collect(),
            ConstructionOrder::Random => {
                let mut order = candidates.collect_vec();
                order.shuffle(rng);
                order
            }
        }
    }
}

/// Computes an initial solution: starting with every vertex deleted, the vertices are kept one
/// after another in the given order, skipping each vertex that would close a cycle.
pub fn greedy_forest<'a, G, S, R>(
    graph: &'a G,
    scoring: S,
    order: ConstructionOrder,
    rng: &mut R,
) -> FvsState<'a, G, S>
where
    G: AdjacencyList + SelfLoops,
    S: Scoring<G>,
    R: Rng,
{
    let mut state = FvsState::new(graph, scoring);
    for u in order.arrange(graph, rng) {
        state.try_keep(u);
    }

    debug!(
        "Greedy construction ({:?}) deleted {} of {} vertices",
        order,
        state.deletion_set_size(),
        graph.len()
    );

    state
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::graph::{AdjArray, Traversal};
    use crate::heuristics::local_search::scoring::ConflictScoring;
    use crate::random_models::gnp::generate_gnp;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use test_case::test_case;

    #[test_case("degree-desc" => Ok(ConstructionOrder::DegreeDescending))]
    #[test_case("Degree-Asc" => Ok(ConstructionOrder::DegreeAscending))]
    #[test_case("random" => Ok(ConstructionOrder::Random))]
    #[test_case("best" => Err("'best' is an invalid ConstructionOrder.".to_string()))]
    fn parse_order(value: &str) -> Result<ConstructionOrder, String> {
        value.parse()
    }

    #[test]
    fn arrange() {
        let graph = AdjArray::from(&[(0, 1), (0, 2), (0, 3), (3, 4), (4, 4), (5, 5)]);
        let rng = &mut Pcg64::seed_from_u64(0);

        assert_eq!(
            ConstructionOrder::DegreeDescending.arrange(&graph, rng),
            vec![0, 3, 1, 2]
        );
        assert_eq!(
            ConstructionOrder::DegreeAscending.arrange(&graph, rng),
            vec![1, 2, 3, 0]
        );

        let random = ConstructionOrder::Random.arrange(&graph, rng);
        assert_eq!(random.iter().copied().sorted().collect_vec(), vec![0, 1, 2, 3]);
    }

    #[test_case(ConstructionOrder::DegreeDescending)]
    #[test_case(ConstructionOrder::DegreeAscending)]
    #[test_case(ConstructionOrder::Random)]
    fn tree_is_kept_completely(order: ConstructionOrder) {
        let graph = AdjArray::from(&[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (6, 7)]);
        let rng = &mut Pcg64::seed_from_u64(1);

        let state = greedy_forest(&graph, ConflictScoring, order, rng);
        assert_eq!(state.deletion_set_size(), 0);
    }

    #[test]
    fn degree_descending_keeps_the_hub() {
        // wheel: hub 0 and rim 1-2-3-4-1
        let graph = AdjArray::from(&[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (2, 3), (3, 4), (4, 1)]);
        let rng = &mut Pcg64::seed_from_u64(0);

        let state = greedy_forest(&graph, ConflictScoring, ConstructionOrder::DegreeDescending, rng);
        assert!(state.is_kept(0));
        assert_eq!(state.fvs(), vec![2, 4]);
    }

    #[test]
    fn self_loops_stay_deleted() {
        let graph = AdjArray::from(&[(0, 1), (1, 2), (2, 2)]);
        let rng = &mut Pcg64::seed_from_u64(0);

        let state = greedy_forest(&graph, ConflictScoring, ConstructionOrder::Random, rng);
        assert_eq!(state.fvs(), vec![2]);
    }

    #[test_case(ConstructionOrder::DegreeDescending)]
    #[test_case(ConstructionOrder::DegreeAscending)]
    #[test_case(ConstructionOrder::Random)]
    fn feasible_and_deterministic(order: ConstructionOrder) {
        let gen_rng = &mut Pcg64::seed_from_u64(3);

        for (n, p) in [(20, 0.2), (100, 0.04), (300, 0.01)] {
            let graph: AdjArray = generate_gnp(gen_rng, n, p);

            let first = greedy_forest(&graph, ConflictScoring, order, &mut Pcg64::seed_from_u64(9));
            let second =
                greedy_forest(&graph, ConflictScoring, order, &mut Pcg64::seed_from_u64(9));

            assert!(first.is_consistent());
            assert!(graph.is_forest_without(&first.fvs()));
            assert_eq!(first.fvs(), second.fvs());
        }
    }
}
