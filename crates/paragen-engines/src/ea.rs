use crate::Result;
use crate::base::ParChildBase;
use crate::builder::EvolutionaryAlgorithmBuilder;
use crate::engine::Engine;
use crate::generation::{Generation, OptimizeOutcome};
use crate::limit::{Limit, StopReason, first_hit};
use crate::monitor::MonitorPhase;
use paragen_core::{Individual, paragen_err};
use paragen_selectors::{SortScheme, SortingMode};
use std::time::Instant;
use tracing::debug;

/// The parent-child evolutionary algorithm.
///
/// Each generation runs the cycle: scheduled growth, recombination,
/// adaptation, evaluation through the configured executor, population
/// repair, selection under the configured sorting mode, and bookkeeping of
/// the best candidates. Use [EvolutionaryAlgorithm::builder] to configure
/// and [EvolutionaryAlgorithm::optimize] to run to termination, or step
/// generations by hand through the [Engine] trait.
pub struct EvolutionaryAlgorithm<I: Individual> {
    pub(crate) base: ParChildBase<I>,
    pub(crate) sorting: SortingMode,
    pub(crate) scheme: Box<dyn SortScheme<I>>,
    pub(crate) limits: Vec<Limit>,
    pub(crate) initialized: bool,
}

impl<I: Individual> EvolutionaryAlgorithm<I> {
    pub fn builder() -> EvolutionaryAlgorithmBuilder<I> {
        EvolutionaryAlgorithmBuilder::default()
    }

    /// Runs the generation loop until a limit fires or the halt handle is
    /// raised, then returns the best candidate ever seen.
    pub fn optimize(&mut self) -> Result<OptimizeOutcome<I>> {
        let started = Instant::now();

        let stop_reason = loop {
            let generation = Engine::next(self)?;

            // In-flight work of the generation has completed by now, so an
            // external halt takes effect between generations.
            if self.base.halt.is_halted() {
                break StopReason::Halted;
            }
            if let Some(reason) = first_hit(
                &self.limits,
                &self.base.objective,
                generation.index() + 1,
                generation.best_fitness(),
                started,
            ) {
                break reason;
            }
        };

        self.base.checkpoint_final()?;
        self.base.inform(MonitorPhase::End);
        debug!(reason = %stop_reason, "run terminated");

        let best = self
            .base
            .best_ever
            .best()
            .cloned()
            .ok_or_else(|| paragen_err!(Population: "run ended without any evaluated candidate"))?;
        let best_fitness = best.primary_fitness()?;

        Ok(OptimizeOutcome {
            best,
            best_fitness,
            stop_reason,
            iterations: self.base.iteration,
            last_improvement: self.base.last_improvement,
        })
    }

    /// The best candidates seen over the whole run, best first.
    pub fn best_ever(&self) -> &[paragen_core::Candidate<I>] {
        self.base.best_ever.snapshot()
    }

    /// The retained best-of-iteration candidates.
    pub fn iteration_best(&self) -> &[paragen_core::Candidate<I>] {
        self.base.iteration_best.snapshot()
    }

    pub fn population(&self) -> &paragen_core::Population<I> {
        &self.base.population
    }

    pub fn halt_handle(&self) -> crate::control::HaltHandle {
        self.base.halt.clone()
    }

    pub fn iteration(&self) -> usize {
        self.base.iteration
    }
}

impl<I: Individual> Engine for EvolutionaryAlgorithm<I> {
    type Epoch = Generation<I>;

    fn next(&mut self) -> Result<Generation<I>> {
        if !self.initialized {
            self.base.init()?;
            self.initialized = true;
        }

        if !self.base.first_iteration() {
            self.base.scheduled_growth()?;
        }

        self.base.recombine()?;
        self.base.adapt_children();
        self.base.run_evaluation()?;

        let first_iteration = self.base.first_iteration();
        self.scheme
            .sort(&mut self.base.population, &self.base.objective, first_iteration)?;

        self.base.population.mark_parents();
        self.base.population.mark_children();
        self.base.population.mark_positions();

        // Excess candidates from old returns or over-returns are dropped
        // here, after selection has seen all available data.
        let nominal = self.base.population.nominal_size();
        self.base.population.truncate(nominal);

        self.base.update_records(self.sorting.is_pareto());
        self.base.checkpoint_if_due()?;
        self.base.inform(MonitorPhase::Processing);

        let best = self.base.population[0].clone();
        let best_fitness = best.primary_fitness()?;
        let generation = Generation {
            index: self.base.iteration,
            best,
            best_fitness,
            population_size: self.base.population.len(),
            temperature: None,
        };

        self.base.iteration += 1;
        Ok(generation)
    }
}
