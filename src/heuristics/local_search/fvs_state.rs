use super::scoring::{ConflictScoring, Scoring};
use crate::forest::{DynamicForest, InsertOutcome};
use crate::graph::{AdjacencyList, Node, SelfLoops};
use crate::heuristics::utils::set_vec::HashSetVec;
use bit_set::BitSet;
use std::cmp::Reverse;

/// Result of [`FvsState::flip_in`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// The vertex is kept and the deletion set shrank by one
    Inserted,

    /// The vertex closed exactly one cycle; `victim` was deleted in exchange
    Swapped { victim: Node },

    /// The vertex closed several independent cycles and stays deleted; nothing changed
    Refused,
}

impl FlipOutcome {
    /// Change of the deletion set size caused by the flip
    pub fn delta(&self) -> isize {
        match self {
            FlipOutcome::Inserted => -1,
            FlipOutcome::Swapped { .. } | FlipOutcome::Refused => 0,
        }
    }
}

/// Current candidate solution of the local search: the partition of the vertices into kept and
/// deleted ones, the forest of the kept vertices and the bookkeeping used to bias moves.
///
/// Vertices with a self-loop are *forced*: they are part of every deletion set and never appear
/// among the candidates of a move.
#[derive(Clone)]
pub struct FvsState<'a, G, S = ConflictScoring> {
    forest: DynamicForest<'a, G>,
    scoring: S,

    /// Deleted vertices without a self-loop
    deleted: HashSetVec<Node>,
    kept: HashSetVec<Node>,
    forced: Vec<Node>,

    /// Value of `clock` at the last flip of each vertex
    last_flip: Vec<u64>,
    /// Configuration checking: set iff a neighbor changed its membership since the last flip
    conf_changed: BitSet,
    clock: u64,
}

impl<'a, G, S> FvsState<'a, G, S>
where
    G: AdjacencyList + SelfLoops,
    S: Scoring<G>,
{
    /// Creates a state in which every vertex is deleted
    pub fn new(graph: &'a G, scoring: S) -> Self {
        let n = graph.len();
        let forced = graph.self_loops();
        let deleted = graph
            .vertices()
            .filter(|&u| !graph.has_self_loop(u))
            .collect();

        let mut conf_changed = BitSet::with_capacity(n);
        conf_changed.extend(0..n);

        Self {
            forest: DynamicForest::new(graph),
            scoring,
            deleted,
            kept: HashSetVec::with_capacity(n),
            forced,
            last_flip: vec![0; n],
            conf_changed,
            clock: 0,
        }
    }

    /// Creates a state whose deletion set is `fvs` (plus the forced vertices). Returns None if
    /// `fvs` is not a feedback vertex set of the graph.
    pub fn from_fvs(graph: &'a G, scoring: S, fvs: &[Node]) -> Option<Self> {
        let mut in_fvs = BitSet::with_capacity(graph.len());
        for &u in fvs {
            in_fvs.insert(u as usize);
        }

        let mut state = Self::new(graph, scoring);
        for u in graph.vertices().filter(|&u| !in_fvs.contains(u as usize)) {
            if graph.has_self_loop(u) || !state.try_keep(u) {
                return None;
            }
        }

        Some(state)
    }

    /// Keeps the deleted vertex *u* if this does not close a cycle and returns whether it did.
    /// Does not advance the clock; meant for constructing initial solutions.
    pub fn try_keep(&mut self, u: Node) -> bool {
        debug_assert!(self.deleted.contains(&u));
        match self.forest.try_insert(u) {
            InsertOutcome::Inserted => {
                self.mark_kept(u);
                self.on_flip(u);
                true
            }
            InsertOutcome::Cycle(_) => false,
        }
    }

    pub fn graph(&self) -> &'a G {
        self.forest.graph()
    }

    pub fn forest(&self) -> &DynamicForest<'a, G> {
        &self.forest
    }

    pub fn deletion_set_size(&self) -> usize {
        self.deleted.len() + self.forced.len()
    }

    /// Returns the current deletion set, forced vertices included, in increasing order
    pub fn fvs(&self) -> Vec<Node> {
        let mut fvs = Vec::with_capacity(self.deletion_set_size());
        fvs.extend_from_slice(&self.forced);
        fvs.extend_from_slice(self.deleted.as_slice());
        fvs.sort_unstable();
        fvs
    }

    /// Deleted vertices which may be flipped, i.e. all deleted vertices but the forced ones
    pub fn deleted(&self) -> &HashSetVec<Node> {
        &self.deleted
    }

    pub fn kept(&self) -> &HashSetVec<Node> {
        &self.kept
    }

    pub fn forced(&self) -> &[Node] {
        &self.forced
    }

    pub fn is_kept(&self, u: Node) -> bool {
        self.forest.is_kept(u)
    }

    /// Number of flips carried out so far
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Number of flips since *u* changed its membership the last time
    pub fn age(&self, u: Node) -> u64 {
        self.clock - self.last_flip[u as usize]
    }

    /// Score of *u* according to the scoring in use; see [`Scoring`]
    pub fn score(&self, u: Node) -> isize {
        if self.is_kept(u) {
            self.scoring.kept_score(&self.forest, u)
        } else {
            self.scoring.deleted_score(&self.forest, u)
        }
    }

    /// A vertex may be flipped if some neighbor changed since its own last flip, or if that flip
    /// lies more than `tabu_tenure` flips in the past.
    pub fn is_eligible(&self, u: Node, tabu_tenure: u64) -> bool {
        self.conf_changed.contains(u as usize) || self.age(u) > tabu_tenure
    }

    /// Tries to keep the deleted vertex *v*. If *v* closes a cycle, the vertex of the cycle chosen
    /// by [`FvsState::choose_victim`] is deleted in exchange; if this does not suffice, the
    /// state is restored and *v* stays deleted. Never increases the deletion set.
    ///
    /// ** Panics if v is not a non-forced deleted vertex **
    pub fn flip_in(&mut self, v: Node) -> FlipOutcome {
        assert!(self.deleted.contains(&v), "Vertex {} cannot be flipped in", v);
        self.clock += 1;

        let cycle = match self.forest.try_insert(v) {
            InsertOutcome::Inserted => {
                self.mark_kept(v);
                self.on_flip(v);
                return FlipOutcome::Inserted;
            }
            InsertOutcome::Cycle(cycle) => cycle,
        };

        let victim = self.choose_victim(&cycle[1..]);
        self.forest.remove(victim);

        match self.forest.try_insert(v) {
            InsertOutcome::Inserted => {
                self.mark_deleted(victim);
                self.mark_kept(v);
                self.on_flips(&[v, victim]);
                FlipOutcome::Swapped { victim }
            }
            InsertOutcome::Cycle(_) => {
                // the kept vertices were a forest before, so this cannot fail
                let restored = self.forest.try_insert(victim);
                assert_eq!(restored, InsertOutcome::Inserted);

                self.last_flip[v as usize] = self.clock;
                self.conf_changed.remove(v as usize);
                FlipOutcome::Refused
            }
        }
    }

    /// Keeps the deleted vertex *v* unconditionally, deleting one victim per closed cycle until
    /// the kept vertices form a forest again. Returns the change of the deletion set size, which
    /// is positive if *v* closed more than one independent cycle.
    ///
    /// ** Panics if v is not a non-forced deleted vertex **
    pub fn force_in(&mut self, v: Node) -> isize {
        assert!(self.deleted.contains(&v), "Vertex {} cannot be forced in", v);
        self.clock += 1;

        let mut victims = Vec::new();
        while let InsertOutcome::Cycle(cycle) = self.forest.try_insert(v) {
            let victim = self.choose_victim(&cycle[1..]);
            self.forest.remove(victim);
            self.mark_deleted(victim);
            victims.push(victim);
        }

        self.mark_kept(v);
        let delta = victims.len() as isize - 1;

        victims.push(v);
        self.on_flips(&victims);
        delta
    }

    /// Deletes the kept vertex *v*; the deletion set grows by one.
    ///
    /// ** Panics if v is not kept **
    pub fn flip_out(&mut self, v: Node) -> isize {
        assert!(self.is_kept(v), "Vertex {} cannot be flipped out", v);
        self.clock += 1;

        self.forest.remove(v);
        self.mark_deleted(v);
        self.on_flip(v);
        1
    }

    /// Selects the vertex to delete from `candidates` (the kept part of a cycle): the lowest
    /// score first, then the highest degree, then the lowest id.
    pub fn choose_victim(&self, candidates: &[Node]) -> Node {
        let graph = self.graph();
        *candidates
            .iter()
            .min_by_key(|&&u| (self.score(u), Reverse(graph.degree(u)), u))
            .expect("A cycle contains at least one kept vertex")
    }

    fn mark_kept(&mut self, u: Node) {
        let removed = self.deleted.swap_remove(&u);
        debug_assert!(removed.is_some());
        self.kept.insert(u);
    }

    fn mark_deleted(&mut self, u: Node) {
        let removed = self.kept.swap_remove(&u);
        debug_assert!(removed.is_some());
        self.deleted.insert(u);
    }

    /// Records several flips of one move. A vertex flipped by the move does not count as changed
    /// by the other vertices of the same move.
    fn on_flips(&mut self, flipped: &[Node]) {
        for &u in flipped {
            self.on_flip(u);
        }
        for &u in flipped {
            self.conf_changed.remove(u as usize);
        }
    }

    fn on_flip(&mut self, u: Node) {
        self.last_flip[u as usize] = self.clock;
        self.conf_changed.remove(u as usize);
        for &w in self.forest.graph().neighbors(u) {
            if w != u {
                self.conf_changed.insert(w as usize);
            }
        }
    }

    /// Checks the forest and that the membership sets partition the vertices accordingly.
    /// Meant for tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let graph = self.graph();
        if self.deleted.len() + self.kept.len() + self.forced.len() != graph.len() {
            return false;
        }

        if self.kept.len() != self.forest.number_of_kept() {
            return false;
        }

        self.kept.iter().all(|&u| self.forest.is_kept(u))
            && self.deleted.iter().all(|&u| !self.forest.is_kept(u))
            && self.forced.iter().all(|&u| graph.has_self_loop(u))
            && self.forest.is_consistent()
    }
}
