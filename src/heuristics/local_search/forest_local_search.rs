use super::fvs_state::{FlipOutcome, FvsState};
use super::scoring::Scoring;
use crate::algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm};
use crate::graph::{AdjacencyList, Node, SelfLoops};
use log::{debug, info, trace};
use rand::Rng;
use std::cmp::Reverse;
use std::io::ErrorKind;
use thiserror::Error;

/// Tuning knobs of [`ForestLocalSearch`]
#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Number of random vertices evaluated to choose the next move
    pub sample_size: usize,
    /// Number of consecutive steps without an improving or neutral move until the search is
    /// perturbed
    pub max_idle_steps: usize,
    /// Neutral swaps count as idle steps, too, so long plateau walks end in a perturbation
    pub count_plateau_as_idle: bool,
    /// Number of random moves carried out per perturbation
    pub perturbation_strength: usize,
    /// Probability that a random move forces a deleted vertex into the forest rather than
    /// deleting a kept one
    pub force_in_probability: f64,
    /// Number of flips for which a flipped vertex stays tabu, unless its neighborhood changes
    pub tabu_tenure: u64,
    /// The search completes after this many steps
    pub max_iterations: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            sample_size: 8,
            max_idle_steps: 200,
            count_plateau_as_idle: false,
            perturbation_strength: 2,
            force_in_probability: 0.5,
            tabu_tenure: 7,
            max_iterations: None,
        }
    }
}

impl SearchParams {
    /// Checks the values a search cannot run with
    pub fn validate(&self) -> Result<(), InvalidParams> {
        if self.sample_size == 0 {
            return Err(InvalidParams::ZeroSampleSize);
        }

        if !(0.0..=1.0).contains(&self.force_in_probability) {
            return Err(InvalidParams::ForceInProbability(self.force_in_probability));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidParams {
    #[error("sample size has to be positive")]
    ZeroSampleSize,

    #[error("force-in probability {0} is not in [0, 1]")]
    ForceInProbability(f64),
}

impl From<InvalidParams> for std::io::Error {
    fn from(err: InvalidParams) -> Self {
        std::io::Error::new(ErrorKind::InvalidInput, err.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Improving,
    Perturbing,
}

/// Anytime local search for the feedback vertex set problem. In the improving phase it keeps
/// deleted vertices, swapping them against a vertex of the closed cycle where necessary; after
/// too many steps without improvement a few random moves perturb the solution.
///
/// The smallest deletion set seen so far is kept as a copy, so the perturbations may worsen the
/// live state without losing the best solution.
pub struct ForestLocalSearch<'a, G, S, R> {
    state: FvsState<'a, G, S>,
    params: SearchParams,
    rng: R,
    /// Best FVS that was found so far
    best_fvs: Vec<Node>,

    phase: Phase,
    /// Amount of steps since the last improving (or neutral) move
    idle_steps: usize,

    // fields for analyzing algo
    iterations: u64,
    moves_total: usize,
    perturbations: usize,
}

impl<'a, G, S, R> ForestLocalSearch<'a, G, S, R>
where
    G: AdjacencyList + SelfLoops,
    S: Scoring<G>,
    R: Rng,
{
    /// ** Panics if `params` do not pass [`SearchParams::validate`] **
    pub fn new(state: FvsState<'a, G, S>, params: SearchParams, rng: R) -> Self {
        assert_eq!(params.validate(), Ok(()));

        let best_fvs = state.fvs();
        Self {
            state,
            params,
            rng,
            best_fvs,
            phase: Phase::Improving,
            idle_steps: 0,
            iterations: 0,
            moves_total: 0,
            perturbations: 0,
        }
    }

    pub fn state(&self) -> &FvsState<'a, G, S> {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of consecutive steps without progress in the current improving phase
    pub fn idle_steps(&self) -> usize {
        self.idle_steps
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn moves_total(&self) -> usize {
        self.moves_total
    }

    pub fn perturbations(&self) -> usize {
        self.perturbations
    }

    pub fn log_statistics(&self) {
        info!(
            "Local search: {} iterations, {} moves, {} perturbations, best size {}",
            self.iterations,
            self.moves_total,
            self.perturbations,
            self.best_fvs.len()
        );
    }

    /// Samples deleted vertices and returns the eligible one with the highest score, preferring
    /// vertices which have not been flipped for a long time.
    fn select_candidate(&mut self) -> Option<Node> {
        let mut best: Option<(Node, (isize, u64, Reverse<Node>))> = None;

        for _ in 0..self.params.sample_size {
            let u = *self.state.deleted().choose(&mut self.rng)?;
            if !self.state.is_eligible(u, self.params.tabu_tenure) {
                continue;
            }

            let key = (self.state.score(u), self.state.age(u), Reverse(u));
            if best.map_or(true, |(_, best_key)| key > best_key) {
                best = Some((u, key));
            }
        }

        best.map(|(u, _)| u)
    }

    fn improve(&mut self) {
        match self.select_candidate().map(|u| self.state.flip_in(u)) {
            Some(FlipOutcome::Inserted) => {
                self.moves_total += 1;
                self.idle_steps = 0;
            }
            Some(FlipOutcome::Swapped { .. }) => {
                self.moves_total += 1;
                if self.params.count_plateau_as_idle {
                    self.idle_steps += 1;
                } else {
                    self.idle_steps = 0;
                }
            }
            Some(FlipOutcome::Refused) | None => {
                self.idle_steps += 1;
            }
        }

        if self.idle_steps >= self.params.max_idle_steps {
            self.phase = Phase::Perturbing;
        }
    }

    fn perturb(&mut self) {
        trace!(
            "Perturb solution of size {} after {} iterations",
            self.state.deletion_set_size(),
            self.iterations
        );

        for _ in 0..self.params.perturbation_strength {
            let force_in = !self.state.deleted().is_empty()
                && self.rng.gen_bool(self.params.force_in_probability);

            if force_in {
                let u = *self
                    .state
                    .deleted()
                    .choose(&mut self.rng)
                    .expect("Deleted vertices are non-empty");
                self.state.force_in(u);
            } else if !self.state.kept().is_empty() {
                let sample: Vec<Node> = (0..self.params.sample_size)
                    .filter_map(|_| self.state.kept().choose(&mut self.rng).copied())
                    .collect();
                let u = self.state.choose_victim(&sample);
                self.state.flip_out(u);
            } else {
                continue;
            }

            self.moves_total += 1;
        }

        self.perturbations += 1;
        self.idle_steps = 0;
        self.phase = Phase::Improving;
    }
}

impl<'a, G, S, R> IterativeAlgorithm for ForestLocalSearch<'a, G, S, R>
where
    G: AdjacencyList + SelfLoops,
    S: Scoring<G>,
    R: Rng,
{
    fn execute_step(&mut self) {
        self.iterations += 1;

        match self.phase {
            Phase::Improving => self.improve(),
            Phase::Perturbing => self.perturb(),
        }

        debug_assert!(self.state.is_consistent());

        if self.state.deletion_set_size() < self.best_fvs.len() {
            self.best_fvs = self.state.fvs();
            debug!(
                "New best solution of size {} in iteration {}",
                self.best_fvs.len(),
                self.iterations
            );
        }
    }

    fn is_completed(&self) -> bool {
        // only self-loops left: the solution is optimal
        self.state.deleted().is_empty()
            || self
                .params
                .max_iterations
                .map_or(false, |max| self.iterations >= max)
    }

    fn best_known_solution(&mut self) -> Option<&[Node]> {
        Some(&self.best_fvs)
    }

    fn best_known_solution_size(&mut self) -> Option<Node> {
        Some(self.best_fvs.len() as Node)
    }
}

/// Terminates if `max_iterations` is set, or once no deleted vertex besides the self-loops is left
impl<'a, G, S, R> TerminatingIterativeAlgorithm for ForestLocalSearch<'a, G, S, R>
where
    G: AdjacencyList + SelfLoops,
    S: Scoring<G>,
    R: Rng,
{
}
