use crate::forest::DynamicForest;
use crate::graph::{AdjacencyList, Node, SelfLoops};

/// Encapsulates the functionality of estimating the value of flipping a vertex, i.e. the net
/// reduction of the deletion set if the vertex changed its membership.
pub trait Scoring<G> {
    /// Score of a deleted vertex *u*; higher is a more promising insertion
    fn deleted_score(&self, forest: &DynamicForest<'_, G>, u: Node) -> isize;

    /// Score of a kept vertex *u*; lower means less useful to keep, i.e. a better candidate to
    /// delete when a cycle has to be broken
    fn kept_score(&self, forest: &DynamicForest<'_, G>, u: Node) -> isize;
}

/// Scores vertices by the conflicts they take part in.
///
/// A deleted vertex scores `1 - c` where `c` is the number of independent cycles its insertion
/// would close: 1 is a free insertion, 0 requires one swap and negative values are unlikely to
/// succeed. A kept vertex scores the negated number of deleted neighbors, as a kept vertex next
/// to many deleted vertices blocks many insertions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConflictScoring;

impl<G: AdjacencyList + SelfLoops> Scoring<G> for ConflictScoring {
    fn deleted_score(&self, forest: &DynamicForest<'_, G>, u: Node) -> isize {
        1 - forest.closed_cycles(u) as isize
    }

    fn kept_score(&self, forest: &DynamicForest<'_, G>, u: Node) -> isize {
        let graph = forest.graph();
        forest.kept_degree(u) as isize - graph.degree(u) as isize
    }
}

/// Ignores the structure of the forest and prefers vertices by degree only: high degree
/// deleted vertices are inserted first and high degree kept vertices are sacrificed first.
#[derive(Clone, Copy, Debug, Default)]
pub struct DegreeScoring;

impl<G: AdjacencyList + SelfLoops> Scoring<G> for DegreeScoring {
    fn deleted_score(&self, forest: &DynamicForest<'_, G>, u: Node) -> isize {
        forest.graph().degree(u) as isize
    }

    fn kept_score(&self, forest: &DynamicForest<'_, G>, u: Node) -> isize {
        -(forest.graph().degree(u) as isize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::InsertOutcome;
    use crate::graph::AdjArray;

    #[test]
    fn conflict_scores() {
        // two triangles sharing vertex 0: 0-1-2 and 0-3-4, pendant 5 at 1
        let graph = AdjArray::from(&[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0), (1, 5)]);
        let mut forest = DynamicForest::new(&graph);
        for u in [1, 2, 3, 4, 5] {
            assert_eq!(forest.try_insert(u), InsertOutcome::Inserted);
        }

        // keeping 0 closes both triangles
        assert_eq!(ConflictScoring.deleted_score(&forest, 0), -1);

        // 1 has the deleted neighbor 0; 5 has none
        assert_eq!(ConflictScoring.kept_score(&forest, 1), -1);
        assert_eq!(ConflictScoring.kept_score(&forest, 5), 0);

        forest.remove(2);
        assert_eq!(ConflictScoring.deleted_score(&forest, 0), 0);
        assert_eq!(ConflictScoring.deleted_score(&forest, 2), 1);
        assert_eq!(ConflictScoring.kept_score(&forest, 1), -2);
    }

    #[test]
    fn degree_scores() {
        let graph = AdjArray::from(&[(0, 1), (0, 2), (0, 3)]);
        let forest = DynamicForest::new(&graph);
        assert_eq!(DegreeScoring.deleted_score(&forest, 0), 3);
        assert_eq!(DegreeScoring.kept_score(&forest, 1), -1);
    }
}
