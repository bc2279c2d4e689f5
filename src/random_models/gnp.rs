use crate::graph::*;
use rand::Rng;
use rand_distr::Geometric;

/// Provides an iterator similarly to Range, but
/// includes each element i.i.d. with probability of p
pub struct BernoulliSamplingRange<'a, R: Rng> {
    current: i64,
    end: i64,
    distr: Geometric,
    rng: &'a mut R,
}

impl<'a, R: Rng> BernoulliSamplingRange<'a, R> {
    pub fn new(rng: &'a mut R, begin: i64, end: i64, prob: f64) -> Self {
        assert!(begin <= end);
        assert!((0.0..=1.0).contains(&prob));
        Self {
            rng,
            current: begin - 1,
            end,
            distr: Geometric::new(prob).expect("Probability was checked to be in [0, 1]"),
        }
    }

    fn try_advance(&mut self) {
        if self.current >= self.end {
            return;
        }

        let skip = self.rng.sample(self.distr);
        if skip > i64::MAX as u64 {
            self.current = self.end;
        } else {
            self.current += 1;
            self.current = match self.current.checked_add(skip as i64) {
                Some(x) => x,
                None => self.end,
            }
        }
    }
}

impl<'a, R: Rng> Iterator for BernoulliSamplingRange<'a, R> {
    type Item = i64;
    fn next(&mut self) -> Option<Self::Item> {
        self.try_advance();

        if self.current >= self.end {
            None
        } else {
            Some(self.current)
        }
    }
}

/// Maps the index of an unordered pair in the lexicographic enumeration
/// (0,1), (0,2), (1,2), (0,3), (1,3), (2,3), ... back to the pair.
fn pair_from_index(x: i64) -> Edge {
    // v is the largest integer with v*(v-1)/2 <= x
    let mut v = ((1.0 + (1.0 + 8.0 * x as f64).sqrt()) / 2.0) as i64;
    while v * (v - 1) / 2 > x {
        v -= 1;
    }
    while (v + 1) * v / 2 <= x {
        v += 1;
    }
    let u = x - v * (v - 1) / 2;
    (u as Node, v as Node)
}

/// Generates an undirected Gilbert (also, wrongly, known as Erdos-Reyni) graph
/// The G(n,p) contains n nodes and each of the n(n-1)/2 possible edges exists
/// independently with probability p. No self-loops are generated.
pub fn generate_gnp<G, R>(rng: &mut R, n: Node, p: f64) -> G
where
    R: Rng,
    G: GraphFromEdges,
{
    let pairs = (n as i64) * (n as i64 - 1) / 2;
    let edges = BernoulliSamplingRange::new(rng, 0, pairs.max(0), p)
        .map(pair_from_index)
        .collect::<Vec<_>>();

    G::try_from_edges(n as usize, edges).expect("Generated endpoints are below n")
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_bernoulli_range() {
        let rng = &mut Pcg64::seed_from_u64(3);

        // empty range
        assert_eq!(BernoulliSamplingRange::new(rng, 0, 0, 1.0).count(), 0);

        // p=1
        assert_eq!(BernoulliSamplingRange::new(rng, 0, 10, 1.0).count(), 10);

        // p=0
        assert_eq!(BernoulliSamplingRange::new(rng, 0, 100, 0.0).count(), 0);

        // test that we see each element ~p*n times
        let min = 3;
        let max = 100;
        let mut counts = vec![0; max as usize];
        for _ in 0..1000 {
            let b = BernoulliSamplingRange::new(rng, min, max, 0.25);
            for x in b {
                assert!(min <= x);
                assert!(x < max);
                counts[x as usize] += 1;
            }
        }

        assert!(counts.iter().enumerate().all(|(i, &c)| {
            if i < min as usize {
                c == 0
            } else {
                (150..350).contains(&c)
            }
        }));
    }

    #[test]
    fn test_pair_from_index() {
        let mut expected = Vec::new();
        for v in 1..40 {
            for u in 0..v {
                expected.push((u, v));
            }
        }

        for (x, &pair) in expected.iter().enumerate() {
            assert_eq!(pair_from_index(x as i64), pair);
        }
    }

    #[test]
    fn test_gnp() {
        let rng = &mut Pcg64::seed_from_u64(1);

        // generate multiple graphs of various densities and verify that the
        // expected number of edges is close to the expected value
        for p in [0.01, 0.05, 0.1] {
            let repeats = 100;
            let n = 100;

            let mean_edges = (0..repeats)
                .map(|_| {
                    let g: AdjArray = generate_gnp(rng, n, p);
                    assert!(g.self_loops().is_empty());
                    g.number_of_edges() as f64
                })
                .sum::<f64>()
                / repeats as f64;

            let expected = p * (n * (n - 1) / 2) as f64;

            assert!((0.75 * expected..1.25 * expected).contains(&mean_edges));
        }
    }

    #[test]
    fn test_gnp_complete() {
        let rng = &mut Pcg64::seed_from_u64(1);
        let g: AdjArray = generate_gnp(rng, 7, 1.0);
        assert_eq!(g.number_of_edges(), 21);

        let g: AdjArray = generate_gnp(rng, 1, 1.0);
        assert_eq!(g.number_of_edges(), 0);
    }
}
