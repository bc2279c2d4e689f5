pub mod adj_array;
pub mod io;
pub mod traversal;

use std::ops::Range;

pub type Node = u32;
pub type Edge = (Node, Node);

pub use adj_array::AdjArray;
pub use traversal::Traversal;

pub trait GraphOrder {
    /// Returns the order (number of nodes) of the graph
    fn number_of_nodes(&self) -> Node;

    /// Returns the number of undirected edges, self-loops excluded
    fn number_of_edges(&self) -> usize;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns true if the graph has no nodes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }
}

/// Provides basic read-only functionality associated with an undirected adjacency list
pub trait AdjacencyList: GraphOrder {
    /// Returns a slice over the distinct neighbors of a given vertex. Self-loops are not included.
    /// ** Panics if the v >= n **
    fn neighbors(&self, u: Node) -> &[Node];

    /// Returns the number of distinct neighbors of *u*
    fn degree(&self, u: Node) -> Node {
        self.neighbors(u).len() as Node
    }

    /// Returns all edges *(u, v)* with *u < v*
    fn edges(&self) -> Vec<Edge> {
        self.vertices()
            .flat_map(|u| {
                self.neighbors(u)
                    .iter()
                    .filter(move |&&v| u < v)
                    .map(move |&v| (u, v))
            })
            .collect()
    }
}

/// A vertex carrying a self-loop lies on a cycle of length one and is part of every feedback
/// vertex set. Graphs store such vertices separately from the adjacency.
pub trait SelfLoops: GraphOrder {
    /// Returns *true* exactly if *u* carried a self-loop in the input
    fn has_self_loop(&self, u: Node) -> bool;

    /// Returns all vertices with a self-loop in increasing order
    fn self_loops(&self) -> Vec<Node> {
        self.vertices().filter(|&u| self.has_self_loop(u)).collect()
    }
}

/// Builds a graph from an edge list. This is the only way to construct a graph; there is no
/// mutation API afterwards.
pub trait GraphFromEdges: Sized {
    /// Creates a graph with *n* nodes and the given edges. Self-loops are recorded, parallel
    /// edges merged. Fails if an endpoint is not in `0..n`.
    fn try_from_edges<I>(n: usize, edges: I) -> Result<Self, io::ReadError>
    where
        I: IntoIterator<Item = Edge>;
}
