use crate::limit::StopReason;
use paragen_core::{Candidate, Individual};

/// Snapshot of the engine state after one completed generation.
pub struct Generation<I: Individual> {
    pub(crate) index: usize,
    pub(crate) best: Candidate<I>,
    pub(crate) best_fitness: f64,
    pub(crate) population_size: usize,
    pub(crate) temperature: Option<f64>,
}

impl<I: Individual> Generation<I> {
    /// Zero-based index of the generation that just completed.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The best candidate of the generation, i.e. parent zero after
    /// selection.
    pub fn best(&self) -> &Candidate<I> {
        &self.best
    }

    /// Raw primary fitness of the best candidate.
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// The current annealing temperature; `None` for the evolutionary
    /// engine.
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }
}

/// The result of a completed run.
pub struct OptimizeOutcome<I: Individual> {
    pub(crate) best: Candidate<I>,
    pub(crate) best_fitness: f64,
    pub(crate) stop_reason: StopReason,
    pub(crate) iterations: usize,
    pub(crate) last_improvement: usize,
}

impl<I: Individual> OptimizeOutcome<I> {
    /// The best candidate ever seen across the whole run.
    pub fn best(&self) -> &Candidate<I> {
        &self.best
    }

    /// Raw primary fitness of the best candidate ever seen.
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    /// Number of completed generations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The generation in which the global best last improved.
    pub fn last_improvement(&self) -> usize {
        self.last_improvement
    }
}
