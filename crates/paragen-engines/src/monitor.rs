use paragen_core::{Individual, Objective, Population};
use tracing::info;

/// Where in a run the observer is being called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// Once, before the first generation.
    Init,
    /// After every completed generation.
    Processing,
    /// Once, after the run has terminated.
    End,
}

/// A side-effect-only observer of the optimization.
///
/// Monitors get a read-only view of the population after each generation and
/// must not try to influence the run; typical implementations log, snapshot
/// best candidates or emit plot data.
pub trait Monitor<I: Individual>: Send {
    fn inform(&mut self, phase: MonitorPhase, population: &Population<I>, iteration: usize);
}

/// Logs the best primary fitness of each generation through `tracing`.
pub struct ProgressMonitor {
    objective: Objective,
    every: usize,
}

impl ProgressMonitor {
    pub fn new(objective: Objective) -> Self {
        ProgressMonitor {
            objective,
            every: 1,
        }
    }

    /// Only log every `every`-th generation.
    pub fn every(mut self, every: usize) -> Self {
        self.every = every.max(1);
        self
    }
}

impl<I: Individual> Monitor<I> for ProgressMonitor {
    fn inform(&mut self, phase: MonitorPhase, population: &Population<I>, iteration: usize) {
        match phase {
            MonitorPhase::Init => {
                info!(
                    size = population.len(),
                    parents = population.n_parents(),
                    "optimization starting"
                );
            }
            MonitorPhase::Processing => {
                if iteration % self.every != 0 {
                    return;
                }
                if let Some(best) = population.get(0) {
                    info!(
                        iteration,
                        best = best.min_only_fitness(&self.objective),
                        "generation complete"
                    );
                }
            }
            MonitorPhase::End => {
                info!(iteration, "optimization finished");
            }
        }
    }
}

/// Convenience implementation so plain closures can be used as monitors.
impl<I, F> Monitor<I> for F
where
    I: Individual,
    F: FnMut(MonitorPhase, &Population<I>, usize) + Send,
{
    fn inform(&mut self, phase: MonitorPhase, population: &Population<I>, iteration: usize) {
        self(phase, population, iteration)
    }
}
