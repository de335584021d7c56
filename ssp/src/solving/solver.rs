use ssp_instance::Instance;
use std::time::Instant;
use tracing::{debug, trace};

/// Upper bound on the number of solutions kept in memory. Accepted subsets beyond it are only
/// counted.
pub const MAX_SOLUTIONS: usize = 10_000_000;

/// Values of the chosen elements, in the element order of the solved instance.
pub type Solution = Vec<i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    pub max_solutions: usize,
    /// Cut branches whose partial sum already exceeds the target.
    pub prune_over_target: bool,
    /// Cut branches that cannot reach the target even by taking every undecided element.
    pub prune_under_target: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_solutions: MAX_SOLUTIONS,
            prune_over_target: true,
            prune_under_target: true,
        }
    }
}

/// Depth-first branch-and-prune enumeration of every subset summing to the target.
///
/// Each level decides one element, excluding it first and including it second. The partial sum
/// of included elements and the sum of undecided elements bound what a subtree can still
/// reach. Both bounds assume non-negative elements.
pub struct Solver<'a> {
    instance: &'a Instance,
    target: i128,
    config: SolverConfig,
    solutions: Vec<Solution>,
    pub statistics: Statistics,
}

impl<'a> Solver<'a> {
    pub fn new(instance: &'a Instance) -> Solver<'a> {
        Solver::with_config(instance, SolverConfig::default())
    }

    pub fn with_config(instance: &'a Instance, config: SolverConfig) -> Solver<'a> {
        Solver {
            instance,
            target: instance.target() as i128,
            config,
            solutions: Vec::new(),
            statistics: Statistics::default(),
        }
    }

    /// Runs the whole search. Solving again starts from scratch and yields the same solutions in
    /// the same order.
    pub fn solve(&mut self) -> SolverResult {
        self.statistics = Statistics::default();
        self.solutions.clear();
        debug!(n = self.instance.len(), target = self.target, "starting branch and prune");

        let now = Instant::now();
        let mut decisions = vec![false; self.instance.len()];
        self.branch(0, 0, self.instance.total_sum(), &mut decisions);
        self.statistics.time_to_compute = now.elapsed().as_millis();

        debug!(
            nodes = self.statistics.nodes,
            pruned_over_target = self.statistics.pruned_over_target,
            pruned_under_target = self.statistics.pruned_under_target,
            solutions = self.solutions.len(),
            millis = self.statistics.time_to_compute,
            "search finished"
        );
        SolverResult {
            solutions: std::mem::take(&mut self.solutions),
            truncated: self.statistics.solutions_dropped > 0,
        }
    }

    /// `partial` is the sum of the included elements among `0..i`, `remaining` the sum of
    /// `i..n`. `decisions` is left as it was found.
    fn branch(&mut self, i: usize, partial: i128, remaining: i128, decisions: &mut [bool]) {
        self.statistics.nodes += 1;

        if self.config.prune_over_target && partial > self.target {
            self.statistics.pruned_over_target += 1;
            return;
        }
        if self.config.prune_under_target && partial + remaining < self.target {
            self.statistics.pruned_under_target += 1;
            return;
        }
        if partial == self.target {
            self.accept(decisions);
            return;
        }
        if i >= decisions.len() {
            return;
        }

        let value = self.instance.elements()[i];
        let remaining = remaining - value as i128;

        decisions[i] = false;
        self.branch(i + 1, partial, remaining, decisions);

        decisions[i] = true;
        self.branch(i + 1, partial + value as i128, remaining, decisions);

        decisions[i] = false;
    }

    fn accept(&mut self, decisions: &[bool]) {
        if self.solutions.len() >= self.config.max_solutions {
            self.statistics.solutions_dropped += 1;
            return;
        }
        let solution: Solution = decisions
            .iter()
            .zip(self.instance.elements())
            .filter(|(included, _)| **included)
            .map(|(_, value)| *value)
            .collect();
        trace!(?solution, "found solution");
        self.solutions.push(solution);
    }
}

/// Solves `instance` with the default configuration.
pub fn solve(instance: &Instance) -> SolverResult {
    Solver::new(instance).solve()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub nodes: u64,
    pub pruned_over_target: u64,
    pub pruned_under_target: u64,
    pub solutions_dropped: u64,
    /// Milliseconds spent in the search itself.
    pub time_to_compute: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverResult {
    /// In discovery order.
    pub solutions: Vec<Solution>,
    /// Set when `max_solutions` was hit and later solutions were dropped.
    pub truncated: bool,
}
