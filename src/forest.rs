//! Incremental maintenance of the forest induced by the *kept* vertices of a graph.
//!
//! Every connected component of the kept subgraph is represented twice: as a union-find set,
//! which answers "same component?" in near-constant time, and as a rooted spanning tree given
//! by parent pointers, which recovers the path between two vertices of a component. Insertions
//! merge components by hooking the touched trees below the new vertex; removals cannot be
//! expressed as inverse unions and instead rebuild the component that contained the removed
//! vertex by traversing it.

use crate::graph::{AdjacencyList, Node, SelfLoops, Traversal};
use bit_set::BitSet;
use fxhash::{FxBuildHasher, FxHashMap};

const NONE: Node = Node::MAX;

/// Result of [`DynamicForest::try_insert`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The vertex is kept now and the kept subgraph is still a forest
    Inserted,

    /// Keeping the vertex would close a cycle; the forest is unchanged. The first element is
    /// the inserted vertex, followed by the tree path between two of its kept neighbors.
    Cycle(Vec<Node>),
}

#[derive(Clone)]
pub struct DynamicForest<'a, G> {
    graph: &'a G,
    kept: BitSet,
    num_kept: usize,

    // union-find over kept vertices
    uf_parent: Vec<Node>,
    uf_rank: Vec<u8>,

    // spanning tree of every component; NONE marks a root
    tree_parent: Vec<Node>,

    // epoch stamps for lowest common ancestor walks
    marks: Vec<u32>,
    epoch: u32,

    stack: Vec<Node>,
}

impl<'a, G: AdjacencyList + SelfLoops> DynamicForest<'a, G> {
    /// Creates a forest in which every vertex is deleted
    pub fn new(graph: &'a G) -> Self {
        let n = graph.len();
        Self {
            graph,
            kept: BitSet::with_capacity(n),
            num_kept: 0,
            uf_parent: (0..n as Node).collect(),
            uf_rank: vec![0; n],
            tree_parent: vec![NONE; n],
            marks: vec![0; n],
            epoch: 0,
            stack: Vec::new(),
        }
    }

    pub fn graph(&self) -> &'a G {
        self.graph
    }

    pub fn is_kept(&self, u: Node) -> bool {
        self.kept.contains(u as usize)
    }

    pub fn number_of_kept(&self) -> usize {
        self.num_kept
    }

    /// Number of neighbors of *u* which are currently kept
    pub fn kept_degree(&self, u: Node) -> usize {
        self.graph
            .neighbors(u)
            .iter()
            .filter(|&&v| self.is_kept(v))
            .count()
    }

    /// Returns the representative of the component of the kept vertex *u* without compressing
    /// paths. Union by rank bounds the walk to O(log n) steps.
    pub fn root(&self, mut u: Node) -> Node {
        debug_assert!(self.is_kept(u));
        while self.uf_parent[u as usize] != u {
            u = self.uf_parent[u as usize];
        }
        u
    }

    fn root_compress(&mut self, mut u: Node) -> Node {
        // path halving
        while self.uf_parent[u as usize] != u {
            let grand_parent = self.uf_parent[self.uf_parent[u as usize] as usize];
            self.uf_parent[u as usize] = grand_parent;
            u = grand_parent;
        }
        u
    }

    /// Returns true iff the kept vertices *u* and *v* lie in the same component
    pub fn same_component(&self, u: Node, v: Node) -> bool {
        self.root(u) == self.root(v)
    }

    /// Returns the number of independent cycles that keeping the deleted vertex *u* would close,
    /// i.e. the number of kept neighbors minus the number of distinct components among them.
    pub fn closed_cycles(&self, u: Node) -> usize {
        debug_assert!(!self.is_kept(u));
        let mut roots: Vec<Node> = self
            .graph
            .neighbors(u)
            .iter()
            .filter(|&&v| self.is_kept(v))
            .map(|&v| self.root(v))
            .collect();
        let kept_neighbors = roots.len();
        roots.sort_unstable();
        roots.dedup();
        kept_neighbors - roots.len()
    }

    fn union(&mut self, u: Node, v: Node) {
        let ru = self.root_compress(u);
        let rv = self.root_compress(v);
        if ru == rv {
            return;
        }

        let (rank_u, rank_v) = (self.uf_rank[ru as usize], self.uf_rank[rv as usize]);
        if rank_u < rank_v {
            self.uf_parent[ru as usize] = rv;
        } else {
            self.uf_parent[rv as usize] = ru;
            if rank_u == rank_v {
                self.uf_rank[ru as usize] += 1;
            }
        }
    }

    /// Makes *u* the root of its spanning tree by reversing the parent pointers on the path from
    /// *u* to the old root.
    fn evert(&mut self, u: Node) {
        let mut prev = NONE;
        let mut cur = u;
        while cur != NONE {
            let next = self.tree_parent[cur as usize];
            self.tree_parent[cur as usize] = prev;
            prev = cur;
            cur = next;
        }
    }

    fn next_epoch(&mut self) -> u32 {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.marks.iter_mut().for_each(|m| *m = 0);
            self.epoch = 1;
        }
        self.epoch
    }

    /// Returns the path from *a* to *b* in the spanning tree of their common component, both
    /// endpoints included. Walks both vertices towards their lowest common ancestor.
    /// ** Panics if a and b are not in the same component **
    pub fn tree_path(&mut self, a: Node, b: Node) -> Vec<Node> {
        assert!(self.is_kept(a) && self.is_kept(b));
        debug_assert!(self.same_component(a, b));

        let epoch = self.next_epoch();
        let mut x = a;
        while x != NONE {
            self.marks[x as usize] = epoch;
            x = self.tree_parent[x as usize];
        }

        let mut from_b = Vec::new();
        let mut lca = b;
        while self.marks[lca as usize] != epoch {
            from_b.push(lca);
            lca = self.tree_parent[lca as usize];
            assert_ne!(lca, NONE, "Vertices {} and {} are not in the same tree", a, b);
        }

        let mut path = Vec::with_capacity(from_b.len() + 1);
        let mut x = a;
        while x != lca {
            path.push(x);
            x = self.tree_parent[x as usize];
        }
        path.push(lca);
        path.extend(from_b.into_iter().rev());
        path
    }

    /// Tries to keep the deleted vertex *v*. If two kept neighbors of *v* share a component, the
    /// forest is left unchanged and the closed cycle is returned. Otherwise *v* becomes kept, it
    /// is made the root of the merged spanning tree and all touched components are united.
    ///
    /// ** Panics if v is already kept or carries a self-loop **
    pub fn try_insert(&mut self, v: Node) -> InsertOutcome {
        assert!(!self.is_kept(v), "Vertex {} is already kept", v);
        assert!(
            !self.graph.has_self_loop(v),
            "Vertex {} has a self-loop and can never be kept",
            v
        );

        let graph = self.graph;
        let mut touched = Vec::new();
        let mut neighbor_of_root: FxHashMap<Node, Node> = FxHashMap::with_capacity_and_hasher(
            graph.degree(v) as usize,
            FxBuildHasher::default(),
        );

        for &u in graph.neighbors(v) {
            if !self.is_kept(u) {
                continue;
            }

            let root = self.root_compress(u);
            if let Some(&w) = neighbor_of_root.get(&root) {
                let mut cycle = vec![v];
                cycle.extend(self.tree_path(w, u));
                return InsertOutcome::Cycle(cycle);
            }

            neighbor_of_root.insert(root, u);
            touched.push(u);
        }

        self.kept.insert(v as usize);
        self.num_kept += 1;
        self.uf_parent[v as usize] = v;
        self.uf_rank[v as usize] = 0;
        self.tree_parent[v as usize] = NONE;

        for u in touched {
            self.evert(u);
            self.tree_parent[u as usize] = v;
            self.union(u, v);
        }

        InsertOutcome::Inserted
    }

    /// Deletes the kept vertex *v* and rebuilds its component: every subtree that hung off a
    /// kept neighbor of *v* becomes a tree of its own rooted at that neighbor, with a flat
    /// union-find set. Only the old component of *v* is traversed.
    ///
    /// ** Panics if v is not kept **
    pub fn remove(&mut self, v: Node) {
        assert!(self.is_kept(v), "Vertex {} is not kept", v);

        self.kept.remove(v as usize);
        self.num_kept -= 1;
        self.tree_parent[v as usize] = NONE;
        self.uf_parent[v as usize] = v;
        self.uf_rank[v as usize] = 0;

        let graph = self.graph;
        let mut stack = std::mem::take(&mut self.stack);

        for &root in graph.neighbors(v) {
            if !self.is_kept(root) {
                continue;
            }

            self.tree_parent[root as usize] = NONE;
            self.uf_parent[root as usize] = root;
            self.uf_rank[root as usize] = 0;

            // the kept subgraph is a forest, so a vertex is only reached through its parent
            stack.push(root);
            while let Some(x) = stack.pop() {
                let parent = self.tree_parent[x as usize];
                for &y in graph.neighbors(x) {
                    if y == parent || !self.is_kept(y) {
                        continue;
                    }
                    self.tree_parent[y as usize] = x;
                    self.uf_parent[y as usize] = root;
                    self.uf_rank[root as usize] = 1;
                    stack.push(y);
                }
            }
        }

        self.stack = stack;
    }

    /// Checks that the kept subgraph is a forest, that every spanning tree edge is an edge of the
    /// graph between kept vertices, and that the union-find sets coincide with the components.
    /// Runs in linear time and is meant for tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        if !self.graph.is_forest_where(|u| self.is_kept(u)) {
            return false;
        }

        if self.kept.len() != self.num_kept {
            return false;
        }

        for u in self.kept.iter().map(|u| u as Node) {
            let p = self.tree_parent[u as usize];
            if p != NONE && (!self.is_kept(p) || !self.graph.neighbors(u).contains(&p)) {
                return false;
            }
        }

        let components = self.graph.components_where(|u| self.is_kept(u));
        let mut seen_roots = BitSet::with_capacity(self.graph.len());
        for component in components {
            let root = self.root(component[0]);
            if !seen_roots.insert(root as usize) {
                return false;
            }

            if component.iter().any(|&u| self.root(u) != root) {
                return false;
            }

            // exactly one tree root per component
            let tree_roots = component
                .iter()
                .filter(|&&u| self.tree_parent[u as usize] == NONE)
                .count();
            if tree_roots != 1 {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AdjArray, GraphOrder};
    use crate::random_models::gnp::generate_gnp;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    fn sorted(mut nodes: Vec<Node>) -> Vec<Node> {
        nodes.sort_unstable();
        nodes
    }

    #[test]
    fn insert_path() {
        let graph = AdjArray::from(&[(0, 1), (1, 2), (2, 3)]);
        let mut forest = DynamicForest::new(&graph);

        for u in [3, 0, 2, 1] {
            assert_eq!(forest.try_insert(u), InsertOutcome::Inserted);
            assert!(forest.is_consistent());
        }

        assert_eq!(forest.number_of_kept(), 4);
        assert!(forest.same_component(0, 3));
        assert_eq!(forest.tree_path(0, 3), vec![0, 1, 2, 3]);
        assert_eq!(forest.tree_path(2, 0), vec![2, 1, 0]);
        assert_eq!(forest.tree_path(1, 1), vec![1]);
    }

    #[test]
    fn triangle_closes_cycle() {
        let graph = AdjArray::from(&[(0, 1), (1, 2), (2, 0)]);
        let mut forest = DynamicForest::new(&graph);

        assert_eq!(forest.try_insert(0), InsertOutcome::Inserted);
        assert_eq!(forest.try_insert(1), InsertOutcome::Inserted);
        assert_eq!(forest.closed_cycles(2), 1);

        match forest.try_insert(2) {
            InsertOutcome::Cycle(cycle) => {
                assert_eq!(cycle[0], 2);
                assert_eq!(sorted(cycle), vec![0, 1, 2]);
            }
            InsertOutcome::Inserted => panic!("Triangle must not be kept completely"),
        }

        // unchanged
        assert!(!forest.is_kept(2));
        assert_eq!(forest.number_of_kept(), 2);
        assert!(forest.is_consistent());
    }

    #[test]
    fn cycle_path_is_a_real_cycle() {
        // 4-cycle with a chord-free pendant: 0-1-2-3-0, 3-4
        let graph = AdjArray::from(&[(0, 1), (1, 2), (2, 3), (3, 0), (3, 4)]);
        let mut forest = DynamicForest::new(&graph);
        for u in [4, 1, 2, 3] {
            assert_eq!(forest.try_insert(u), InsertOutcome::Inserted);
        }

        match forest.try_insert(0) {
            InsertOutcome::Cycle(cycle) => {
                assert_eq!(sorted(cycle.clone()), vec![0, 1, 2, 3]);
                for (&a, &b) in cycle.iter().zip(cycle.iter().cycle().skip(1)) {
                    assert!(graph.neighbors(a).contains(&b));
                }
            }
            InsertOutcome::Inserted => panic!("Expected cycle"),
        }
    }

    #[test]
    fn remove_splits_component() {
        // star with center 0 plus path 1-5
        let graph = AdjArray::from(&[(0, 1), (0, 2), (0, 3), (1, 5)]);
        let mut forest = DynamicForest::new(&graph);
        for u in graph.vertices() {
            assert_eq!(forest.try_insert(u), InsertOutcome::Inserted);
        }
        assert!(forest.same_component(5, 3));

        forest.remove(0);
        assert!(forest.is_consistent());
        assert!(!forest.is_kept(0));
        assert!(forest.same_component(1, 5));
        assert!(!forest.same_component(1, 2));
        assert!(!forest.same_component(2, 3));
        assert_eq!(forest.number_of_kept(), 5);

        assert_eq!(forest.try_insert(0), InsertOutcome::Inserted);
        assert!(forest.same_component(5, 3));
        assert!(forest.is_consistent());
    }

    #[test]
    fn remove_breaks_cycle() {
        let graph = AdjArray::from(&[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let mut forest = DynamicForest::new(&graph);
        for u in [0, 1, 2] {
            assert_eq!(forest.try_insert(u), InsertOutcome::Inserted);
        }
        assert!(matches!(forest.try_insert(3), InsertOutcome::Cycle(_)));

        forest.remove(1);
        assert_eq!(forest.try_insert(3), InsertOutcome::Inserted);
        assert!(forest.is_consistent());
        let kept: Vec<Node> = graph.vertices().filter(|&u| forest.is_kept(u)).collect();
        assert_eq!(kept, vec![0, 2, 3]);
    }

    #[test]
    #[should_panic]
    fn double_insert_panics() {
        let graph = AdjArray::from(&[(0, 1)]);
        let mut forest = DynamicForest::new(&graph);
        forest.try_insert(0);
        forest.try_insert(0);
    }

    #[test]
    #[should_panic]
    fn remove_deleted_panics() {
        let graph = AdjArray::from(&[(0, 1)]);
        let mut forest = DynamicForest::new(&graph);
        forest.remove(1);
    }

    #[test]
    #[should_panic]
    fn insert_self_loop_panics() {
        let graph = AdjArray::from(&[(0, 1), (1, 1)]);
        let mut forest = DynamicForest::new(&graph);
        forest.try_insert(1);
    }

    #[test]
    fn random_operations_agree_with_traversal() {
        let mut rng = Pcg64::seed_from_u64(42);

        for (n, p) in [(10, 0.3), (40, 0.08), (100, 0.03)] {
            let graph: AdjArray = generate_gnp(&mut rng, n, p);
            let mut forest = DynamicForest::new(&graph);

            for _ in 0..500 {
                let u = rng.gen_range(0..n);
                if forest.is_kept(u) {
                    forest.remove(u);
                } else {
                    let creates_cycle =
                        !graph.is_forest_where(|x| x == u || forest.is_kept(x));
                    let expected_closed = forest.closed_cycles(u);

                    match forest.try_insert(u) {
                        InsertOutcome::Inserted => {
                            assert!(!creates_cycle);
                            assert_eq!(expected_closed, 0);
                        }
                        InsertOutcome::Cycle(cycle) => {
                            assert!(creates_cycle);
                            assert!(expected_closed > 0);
                            assert_eq!(cycle[0], u);
                            assert!(cycle.len() >= 3);
                            assert!(cycle[1..].iter().all(|&x| forest.is_kept(x)));
                            assert!(!forest.is_kept(u));
                        }
                    }
                }

                assert!(forest.is_consistent());
            }
        }
    }
}
