use super::*;
use bit_set::BitSet;
use std::collections::VecDeque;

/// Breadth-first search over an undirected graph that only enters nodes accepted by a filter.
/// The visited set persists between calls to [`TraversalState::bfs`], so one state can be used to
/// enumerate all components.
pub struct TraversalState<'a, G> {
    graph: &'a G,
    visited: BitSet,
}

impl<'a, G: AdjacencyList> TraversalState<'a, G> {
    pub fn new(graph: &'a G) -> TraversalState<'a, G> {
        Self {
            graph,
            visited: BitSet::with_capacity(graph.len()),
        }
    }

    /// Executes breadth-first-search starting at node `start` and calls `callback(u, parent)`
    /// for every node visited in order. Only nodes for which `filter` returns true are entered;
    /// the start node is entered unconditionally unless it was visited before.
    pub fn bfs<F, C>(&mut self, start: Node, filter: F, mut callback: C)
    where
        F: Fn(Node) -> bool,
        C: FnMut(Node, Option<Node>),
    {
        if !self.visited.insert(start as usize) {
            return;
        }

        let mut queue: VecDeque<(Node, Option<Node>)> = VecDeque::from(vec![(start, None)]);
        while let Some((u, parent)) = queue.pop_front() {
            callback(u, parent);
            for &v in self.graph.neighbors(u) {
                if filter(v) && self.visited.insert(v as usize) {
                    queue.push_back((v, Some(u)));
                }
            }
        }
    }

    pub fn did_visit(&self, u: Node) -> bool {
        self.visited.contains(u as usize)
    }
}

pub trait Traversal: AdjacencyList + SelfLoops + Sized {
    /// Returns the connected components of the subgraph induced by the nodes accepted by
    /// `filter`. Each component lists its nodes in BFS order.
    fn components_where<F: Fn(Node) -> bool>(&self, filter: F) -> Vec<Vec<Node>> {
        let mut state = TraversalState::new(self);
        let mut components = Vec::new();

        for u in self.vertices().filter(|&u| filter(u)) {
            if state.did_visit(u) {
                continue;
            }

            let mut component = Vec::new();
            state.bfs(u, &filter, |v, _| component.push(v));
            components.push(component);
        }

        components
    }

    /// Returns true iff the subgraph induced by the nodes accepted by `filter` is a forest.
    /// A graph on k nodes with c components is a forest iff it has exactly k - c edges.
    fn is_forest_where<F: Fn(Node) -> bool>(&self, filter: F) -> bool {
        let mut nodes = 0;
        let mut edges = 0;
        for u in self.vertices().filter(|&u| filter(u)) {
            if self.has_self_loop(u) {
                return false;
            }
            nodes += 1;
            edges += self
                .neighbors(u)
                .iter()
                .filter(|&&v| u < v && filter(v))
                .count();
        }

        let components = self.components_where(&filter).len();
        edges + components == nodes
    }

    /// Returns true iff the graph is acyclic
    fn is_acyclic(&self) -> bool {
        self.is_forest_where(|_| true)
    }

    /// Returns true iff deleting `fvs` leaves a forest, i.e. `fvs` is a feedback vertex set
    fn is_forest_without(&self, fvs: &[Node]) -> bool {
        let mut deleted = BitSet::with_capacity(self.len());
        for &u in fvs {
            deleted.insert(u as usize);
        }
        self.is_forest_where(|u| !deleted.contains(u as usize))
    }
}

impl<G: AdjacencyList + SelfLoops> Traversal for G {}
