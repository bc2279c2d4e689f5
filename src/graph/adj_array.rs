use super::io::{DotWrite, ReadError};
use super::*;
use bit_set::BitSet;
use std::fmt::Debug;
use std::{fmt, str};

/// Static adjacency arrays of an undirected simple graph. Self-loops are kept out of the
/// adjacency and recorded in a separate mask.
#[derive(Clone, Default)]
pub struct AdjArray {
    m: usize,
    neighbors: Vec<Vec<Node>>,
    self_loops: BitSet,
}

impl GraphFromEdges for AdjArray {
    fn try_from_edges<I>(n: usize, edges: I) -> Result<Self, ReadError>
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut neighbors = vec![Vec::new(); n];
        let mut self_loops = BitSet::with_capacity(n);

        for (u, v) in edges {
            for x in [u, v] {
                if x as usize >= n {
                    return Err(ReadError::VertexOutOfRange {
                        vertex: x as u64,
                        order: n,
                    });
                }
            }

            if u == v {
                self_loops.insert(u as usize);
            } else {
                neighbors[u as usize].push(v);
                neighbors[v as usize].push(u);
            }
        }

        let mut m = 0;
        for neighs in &mut neighbors {
            neighs.sort_unstable();
            neighs.dedup();
            m += neighs.len();
        }

        Ok(Self {
            m: m / 2,
            neighbors,
            self_loops,
        })
    }
}

impl<'a, T: IntoIterator<Item = &'a Edge> + Clone> From<T> for AdjArray {
    /// Creates a graph whose order is one larger than the largest endpoint.
    fn from(edges: T) -> Self {
        let n = edges
            .clone()
            .into_iter()
            .map(|e| e.0.max(e.1) + 1)
            .max()
            .unwrap_or(0);

        Self::try_from_edges(n as usize, edges.into_iter().copied())
            .expect("Endpoints are in range by construction of n")
    }
}

impl AdjArray {
    /// Creates a graph with *n* isolated nodes
    pub fn new(n: usize) -> Self {
        Self {
            m: 0,
            neighbors: vec![Vec::new(); n],
            self_loops: BitSet::with_capacity(n),
        }
    }
}

impl Debug for AdjArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        if self.try_write_dot(&mut buf).is_ok() {
            if let Ok(dot) = str::from_utf8(&buf) {
                f.write_str(dot.trim())?;
            }
        }

        Ok(())
    }
}

impl GraphOrder for AdjArray {
    fn number_of_nodes(&self) -> Node {
        self.neighbors.len() as Node
    }

    fn number_of_edges(&self) -> usize {
        self.m
    }

    fn len(&self) -> usize {
        self.neighbors.len()
    }
}

impl AdjacencyList for AdjArray {
    fn neighbors(&self, u: Node) -> &[Node] {
        &self.neighbors[u as usize]
    }
}

#[cfg(test)]
impl AdjArray {
    pub(crate) fn has_edge(&self, u: Node, v: Node) -> bool {
        if u == v {
            self.has_self_loop(u)
        } else {
            // neighborhoods are sorted during construction
            self.neighbors[u as usize].binary_search(&v).is_ok()
        }
    }
}

impl SelfLoops for AdjArray {
    fn has_self_loop(&self, u: Node) -> bool {
        self.self_loops.contains(u as usize)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn graph_edges() {
        let mut edges = vec![(1, 2), (0, 1), (3, 4), (0, 5), (2, 4), (4, 5)];
        let graph = AdjArray::from(&edges);
        assert_eq!(graph.number_of_nodes(), 6);
        assert_eq!(graph.number_of_edges(), edges.len());
        let mut ret_edges = graph.edges();

        edges.sort();
        ret_edges.sort();

        assert_eq!(edges, ret_edges);
    }

    #[test]
    fn neighbors_are_symmetric() {
        let graph = AdjArray::from(&[(0, 1), (2, 0), (3, 1)]);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(1), &[0, 3]);
        assert_eq!(graph.neighbors(2), &[0]);
        assert_eq!(graph.degree(3), 1);

        for (u, v) in graph.edges() {
            assert!(graph.has_edge(u, v));
            assert!(graph.has_edge(v, u));
        }
        assert!(!graph.has_edge(2, 3));
    }

    #[test]
    fn parallel_edges_are_merged() {
        let graph = AdjArray::from(&[(0, 1), (1, 0), (0, 1), (1, 2)]);
        assert_eq!(graph.number_of_edges(), 2);
        assert_eq!(graph.neighbors(1), &[0, 2]);
    }

    #[test]
    fn self_loops_are_recorded() {
        let graph = AdjArray::from(&[(0, 1), (2, 2), (1, 2), (1, 1)]);
        assert_eq!(graph.number_of_edges(), 2);
        assert!(graph.has_self_loop(1));
        assert!(graph.has_self_loop(2));
        assert!(!graph.has_self_loop(0));
        assert!(graph.has_edge(2, 2));
        assert_eq!(graph.self_loops(), vec![1, 2]);
        assert!(!graph.neighbors(1).contains(&1));
    }

    #[test]
    fn out_of_range() {
        let res = AdjArray::try_from_edges(3, vec![(0, 1), (1, 3)]);
        assert!(matches!(
            res,
            Err(ReadError::VertexOutOfRange {
                vertex: 3,
                order: 3
            })
        ));
    }

    #[test]
    fn isolated_nodes() {
        let graph = AdjArray::try_from_edges(5, vec![(0, 1)]).unwrap();
        assert_eq!(graph.number_of_nodes(), 5);
        assert_eq!(graph.degree(4), 0);
        assert_eq!(AdjArray::new(3).number_of_edges(), 0);
    }
}
