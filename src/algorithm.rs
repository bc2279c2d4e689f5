//! Search procedures are implemented using the [`IterativeAlgorithm`] trait.
//!
//! An algorithm does a small amount of work per step and then returns control to the caller,
//! which decides whether to continue (time budget, iteration budget, termination signal). This
//! keeps the search interruptible between two steps only, so the search state is never observed
//! half-way through a move.

use super::graph::Node;
use crate::signal_handling::received_ctrl_c;
use std::time::{Duration, Instant};

/// [`IterativeAlgorithm`] provides a consistent interface to execute an anytime search. It does
/// not prescribe any constructor, as each algorithm has its own parameters. The construction
/// phase should be fast and only involve little computation.
///
/// As an adopter of [`IterativeAlgorithm`], you have to implement at least the methods
///   [`IterativeAlgorithm::execute_step`],
///   [`IterativeAlgorithm::is_completed`] and [`IterativeAlgorithm::best_known_solution`].
/// You may also implement [`IterativeAlgorithm::best_known_solution_size`] if the size of the
/// solution can be computed more cheaply than the solution itself.
///
/// If your algorithm is known to eventually terminate please also implement the marker trait
/// [`TerminatingIterativeAlgorithm`]. It offers an easy interface to run the algorithm to completion.
///
/// # Example
/// ```
/// use ufvs::algorithm::IterativeAlgorithm;
/// use ufvs::graph::{AdjacencyList, Node};
/// struct MyAlgorithm<'a, G> {
///    graph: &'a G,
///    solution: Option<Vec<Node>>
/// }
///
/// impl<'a, G> IterativeAlgorithm for MyAlgorithm<'a, G> where G: 'a + AdjacencyList {
///     fn execute_step(&mut self) {
///         // improve the solution a little; a step should be short enough that
///         // timeouts and signals are noticed quickly
///     }
///
///     fn is_completed(&self) -> bool {
///         // decide whether the solution is known to be optimal
///         false
///     }
///
///     fn best_known_solution(&mut self) -> Option<&[Node]> {
///         self.solution.as_deref()
///     }
/// }
/// ```
pub trait IterativeAlgorithm {
    /// Advances the computation of this algorithm. A single step should be short; callers check
    /// budgets and signals only between steps.
    fn execute_step(&mut self);

    /// Returns true iff the algorithm is completed and [`IterativeAlgorithm::execute_step`] may not
    /// be called again.
    fn is_completed(&self) -> bool;

    /// Returns the currently best known solution or None if no solution is known yet.
    fn best_known_solution(&mut self) -> Option<&[Node]>;

    /// Returns the size of the currently best known solution.
    fn best_known_solution_size(&mut self) -> Option<Node> {
        Some(self.best_known_solution()?.len() as Node)
    }

    /// Execute the algorithm and keeps calling [`IterativeAlgorithm::execute_step`] until the
    /// `predicate` becomes false, a termination signal was received, or
    /// [`IterativeAlgorithm::is_completed`] becomes true. The function `predicate` is evaluated
    /// after each iteration, i.e. a step is carried out even if the predicate always returns false.
    fn run_while<F: Fn(&mut Self) -> bool>(&mut self, predicate: F) {
        while !self.is_completed() && !received_ctrl_c() {
            self.execute_step();

            if !predicate(self) {
                break;
            }
        }
    }

    /// Execute the algorithm and keeps calling [`IterativeAlgorithm::execute_step`] until either a
    /// timeout occurred, a termination signal was received, or [`IterativeAlgorithm::is_completed`]
    /// is true. Observe that the timeout is guaranteed only in the sense that
    /// [`IterativeAlgorithm::execute_step`] is not called again after the timeout; if the function
    /// should take too long (or not return at all) the timeout will be violated.
    fn run_until_timeout(&mut self, timeout: Duration) {
        let start = Instant::now();
        self.run_while(|_| start.elapsed() < timeout);
    }
}

/// [`TerminatingIterativeAlgorithm`] is a marker trait, i.e. to adopt it, you give an empty `impl`
/// block. Add this trait to algorithms that will eventually terminate (i.e. in contrast to an
/// algorithm that does not know when to stop).
///
/// # Example
///
/// ```ignore
/// use ufvs::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
///
/// struct MyAlgorithm {};
///
/// impl IterativeAlgorithm for MyAlgorithm {
///    /* implement all methods required */
/// }
///
/// impl TerminatingIterativeAlgorithm for MyAlgorithm {
///    // no implementation required
/// }
/// ```
pub trait TerminatingIterativeAlgorithm: IterativeAlgorithm {
    /// Execute the algorithm until it completed (or the termination signal was received) and
    /// return the solution if it was found.
    fn run_to_completion(&mut self) -> Option<Vec<Node>> {
        while !self.is_completed() && !received_ctrl_c() {
            self.execute_step();
        }
        Some(self.best_known_solution()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts down and reports the counter as solution
    struct Countdown {
        remaining: usize,
        steps: usize,
        solution: Vec<Node>,
    }

    impl Countdown {
        fn new(remaining: usize) -> Self {
            Self {
                remaining,
                steps: 0,
                solution: Vec::new(),
            }
        }
    }

    impl IterativeAlgorithm for Countdown {
        fn execute_step(&mut self) {
            self.remaining -= 1;
            self.steps += 1;
            self.solution.push(self.steps as Node);
        }

        fn is_completed(&self) -> bool {
            self.remaining == 0
        }

        fn best_known_solution(&mut self) -> Option<&[Node]> {
            Some(&self.solution)
        }
    }

    impl TerminatingIterativeAlgorithm for Countdown {}

    #[test]
    fn run_while_stops_on_false_predicate() {
        let mut algo = Countdown::new(100);
        algo.run_while(|a| a.steps < 10);
        assert_eq!(algo.steps, 10);

        // at least one step is executed
        let mut algo = Countdown::new(100);
        algo.run_while(|_| false);
        assert_eq!(algo.steps, 1);
    }

    #[test]
    fn run_while_stops_on_completion() {
        let mut algo = Countdown::new(5);
        algo.run_while(|_| true);
        assert_eq!(algo.steps, 5);
        assert!(algo.is_completed());
    }

    #[test]
    fn run_until_timeout() {
        let mut algo = Countdown::new(3);
        algo.run_until_timeout(Duration::from_secs(3600));
        assert!(algo.is_completed());

        let mut algo = Countdown::new(usize::MAX);
        algo.run_until_timeout(Duration::from_millis(10));
        assert!(algo.steps >= 1);
    }

    #[test]
    fn run_to_completion() {
        let mut algo = Countdown::new(4);
        assert_eq!(algo.best_known_solution_size(), Some(0));
        assert_eq!(algo.run_to_completion(), Some(vec![1, 2, 3, 4]));
    }
}
