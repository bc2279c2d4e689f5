use fxhash::{FxBuildHasher, FxHashMap};
use rand::seq::SliceRandom;
use rand::Rng;
use std::borrow::Borrow;
use std::hash::Hash;
use std::iter::FromIterator;
use std::slice::Iter;

/// Wrapper around a HashMap and a Vector to provide insertion, removal and uniform random
/// sampling in O(1) at the expense of memory. The order of elements is not stable under removal.
#[derive(Clone, Debug, Default)]
pub struct HashSetVec<T> {
    map: FxHashMap<T, usize>,
    vec: Vec<T>,
}

impl<T> HashSetVec<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            vec: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            vec: Vec::with_capacity(capacity),
        }
    }

    pub fn contains<Q: ?Sized>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.map.contains_key(value)
    }

    /// Inserts the element at the end in O(1). Returns false if it was already contained.
    pub fn insert(&mut self, value: T) -> bool {
        if self.contains(&value) {
            return false;
        }

        let i = self.vec.len();
        self.vec.push(value.clone());
        self.map.insert(value, i);
        true
    }

    /// Removes the element in O(1). The removed element is replaced by the last element.
    pub fn swap_remove<Q: ?Sized>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq,
    {
        let i = self.map.remove(value)?;
        let removed_value = self.vec.swap_remove(i);

        // update index of swapped element in hashmap
        if i < self.vec.len() {
            let new_value_at_i = &self.vec[i];
            self.map.insert(new_value_at_i.clone(), i);
        }

        Some(removed_value)
    }

    /// Returns a reference to one random element, or None if the set is empty.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        self.vec.choose(rng)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.vec
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.vec.iter()
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
}

impl<T> Extend<T> for HashSetVec<T>
where
    T: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for HashSetVec<T>
where
    T: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut res = Self::new();
        res.extend(iter);
        res
    }
}

impl<'a, T: Clone> IntoIterator for &'a HashSetVec<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.vec.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::collections::HashSet;
    use test_case::test_case;

    fn assert_set_vec_eq(actual: HashSetVec<Node>, expected: Vec<Node>) {
        assert_eq!(actual.vec, expected);
        assert_eq!(actual.len(), expected.len());
        assert_eq!(actual.is_empty(), expected.is_empty());
        assert_eq!(actual.as_slice(), expected.as_slice());

        for (i, element) in expected.into_iter().enumerate() {
            assert!(actual.contains(&element));
            assert_eq!(actual.map[&element], i);
        }
    }

    #[test_case(&[], 2, &[2])]
    #[test_case(&[5], 5, &[5])]
    #[test_case(&[6], 1, &[6, 1])]
    #[test_case(&[4, 3], 4, &[4, 3])]
    #[test_case(&[5, 2], 6, &[5, 2, 6])]
    fn insert(input: &[Node], node: Node, expected: &[Node]) {
        let mut set: HashSetVec<Node> = input.iter().copied().collect();
        assert_eq!(!set.contains(&node), set.insert(node));

        assert_set_vec_eq(set, expected.to_vec());
    }

    #[test_case(&[3], 3, &[])]
    #[test_case(&[3], 5, &[3])]
    #[test_case(&[7, 2, 9], 7, &[9, 2])]
    #[test_case(&[4, 1, 8, 5], 1, &[4, 5, 8])]
    #[test_case(&[3, 5, 7, 2], 2, &[3, 5, 7])]
    fn swap_remove(input: &[Node], node: Node, expected: &[Node]) {
        let mut set: HashSetVec<Node> = input.iter().copied().collect();
        assert_eq!(set.contains(&node), set.swap_remove(&node).is_some());

        assert_set_vec_eq(set, expected.to_vec());
    }

    #[test_case(&[], 1)]
    #[test_case(&[3], 1)]
    #[test_case(&[7, 1], 1000)]
    #[test_case(&[9, 4, 6], 1000)]
    fn choose(input: &[Node], sample_count: usize) {
        let set: HashSetVec<Node> = input.iter().copied().collect();
        let mut rng = Pcg64::seed_from_u64(0);

        let mut samples = HashSet::with_capacity(input.len());
        for _ in 0..sample_count {
            if let Some(node) = set.choose(&mut rng) {
                samples.insert(*node);
            }
        }

        let actual_samples = samples.iter().sorted().collect_vec();
        let expected_samples = input.iter().sorted().collect_vec();
        assert_eq!(actual_samples, expected_samples);
    }

    #[test]
    fn collect_skips_duplicates() {
        let mut set: HashSetVec<Node> = vec![4, 2, 4, 1].into_iter().collect();
        assert_set_vec_eq(set.clone(), vec![4, 2, 1]);

        set.extend([1, 7]);
        assert_set_vec_eq(set, vec![4, 2, 1, 7]);
    }
}
