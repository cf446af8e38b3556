use crate::Result;
use crate::checkpoint::CheckpointSink;
use crate::control::HaltHandle;
use crate::monitor::{Monitor, MonitorPhase};
use crate::recombine::RecombinationMethod;
use paragen_core::{
    BestSet, Candidate, Executor, Individual, Objective, Population, paragen_bail,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Generations without improvement between stall warnings.
const STALL_WARNING_INTERVAL: usize = 25;

/// The machinery shared by the evolutionary and annealing engines: the
/// population with its parent/child split, scheduled growth, recombination,
/// dispatch through an executor, post-dispatch repair, record keeping and
/// checkpointing. The engines themselves only differ in how they select the
/// next generation's parents.
pub(crate) struct ParChildBase<I: Individual> {
    pub(crate) population: Population<I>,
    pub(crate) objective: Objective,
    pub(crate) executor: Arc<dyn Executor<I>>,
    pub(crate) recombination: RecombinationMethod,
    pub(crate) amalgamation_likelihood: f64,
    pub(crate) growth_rate: usize,
    pub(crate) max_population_size: usize,
    pub(crate) iteration: usize,
    pub(crate) best_ever: BestSet<I>,
    pub(crate) iteration_best: BestSet<I>,
    pub(crate) monitors: Vec<Box<dyn Monitor<I>>>,
    pub(crate) halt: HaltHandle,
    pub(crate) checkpoint: Option<CheckpointSink<I>>,
    pub(crate) best_seen: Option<f64>,
    pub(crate) last_improvement: usize,
}

impl<I: Individual> ParChildBase<I> {
    pub(crate) fn first_iteration(&self) -> bool {
        self.iteration == 0
    }

    /// Fills the population up to its nominal size before the first
    /// generation. Missing candidates are clones of the last provided seed,
    /// each adapted once so the initial population is not degenerate.
    pub(crate) fn init(&mut self) -> Result<()> {
        if self.population.is_empty() {
            paragen_bail!(InvalidConfig: "population holds no individuals");
        }

        let before = self.population.len();
        self.population.fill_to_nominal()?;
        for index in before..self.population.len() {
            self.population[index].adapt();
        }

        self.population.mark_parents();
        self.population.mark_children();
        self.population.mark_positions();
        self.inform(MonitorPhase::Init);
        Ok(())
    }

    /// Linear population growth: raises the nominal size by `growth_rate`
    /// (capped at `max_population_size`) and appends clones of the last
    /// candidate to fill the gap. The parent count is held constant.
    pub(crate) fn scheduled_growth(&mut self) -> Result<()> {
        if self.growth_rate == 0 || self.population.nominal_size() >= self.max_population_size {
            return Ok(());
        }

        let nominal = (self.population.nominal_size() + self.growth_rate)
            .min(self.max_population_size);
        let n_parents = self.population.n_parents();
        self.population.set_sizes(nominal, n_parents);
        self.population.fill_to_nominal()?;

        debug!(nominal, "population grown");
        Ok(())
    }

    /// The range submitted for evaluation this generation. Every candidate is
    /// evaluated in the first iteration, because parents have never been
    /// scored; later on, parents stay clean from prior rounds.
    pub(crate) fn evaluation_range(&self) -> std::ops::Range<usize> {
        if self.first_iteration() {
            0..self.population.len()
        } else {
            self.population.n_parents()..self.population.len()
        }
    }

    /// Runs the adaptation phase over the children through the executor.
    /// Adaptation failures are not fatal; the lost candidates are restored by
    /// the repair step.
    pub(crate) fn adapt_children(&mut self) {
        let range = self.population.n_parents()..self.population.len();
        if let Err(e) = self.executor.adapt_range(&mut self.population, range) {
            warn!(error = %e, "adaptation incomplete");
        }
    }

    /// Dispatches the evaluation range through the executor and repairs the
    /// population back to nominal size afterwards.
    pub(crate) fn run_evaluation(&mut self) -> Result<()> {
        self.population.mark_positions();

        let range = self.evaluation_range();
        let outcome =
            self.executor
                .evaluate_range(&mut self.population, range, self.iteration)?;

        for error in &outcome.errors {
            warn!(error = %error, "evaluation task failed");
        }

        self.repair(outcome.old, outcome.completed)
    }

    /// Restores population consistency after dispatch: obsolete parents
    /// among the old returns are rejected, the remaining old
    /// items are stamped with the current iteration and appended behind the
    /// surviving candidates, and the population is refilled to nominal size
    /// by cloning the last candidate. Trimming back to nominal happens after
    /// selection so that selection sees all available data.
    pub(crate) fn repair(
        &mut self,
        mut old: Vec<Candidate<I>>,
        completed: usize,
    ) -> Result<()> {
        let iteration = self.iteration;

        // Old parents from earlier iterations are worthless duplicates of
        // candidates that were already selected against. Old children keep
        // their fitness as a usable datum.
        old.retain(|candidate| {
            !(candidate.traits().is_parent() && candidate.assigned_iteration() != iteration)
        });
        for candidate in old.iter_mut() {
            candidate.set_assigned_iteration(iteration);
        }

        self.population.partition_parents_first();
        self.population.extend(old);

        if completed == 0 {
            warn!(iteration, "no candidate of this generation returned from dispatch");
        }

        if self.population.len() < self.population.nominal_size() {
            let Some(last) = self.population.as_slice().last() else {
                paragen_bail!(Population: "repair impossible: no candidates survived dispatch");
            };
            if last.is_dirty() {
                paragen_bail!(Population: "repair impossible: last candidate is dirty");
            }

            let appended = self.population.fill_to_nominal()?;
            debug!(appended, "population refilled after dispatch");
        }

        // Nothing is guaranteed about order before the first selection, so
        // give the first generation a sane parent/child split.
        if self.first_iteration() {
            self.population.mark_parents();
            self.population.mark_children();
        }

        Ok(())
    }

    /// Feeds the priority queues after selection. Single-objective runs add
    /// the best of the iteration to both queues; pareto runs add the entire
    /// front instead. Both queues accumulate across generations, bounded by
    /// their capacity.
    pub(crate) fn update_records(&mut self, pareto: bool) {
        if pareto {
            let front: Vec<&Candidate<I>> = self
                .population
                .iter()
                .filter(|candidate| candidate.traits().is_on_pareto_front())
                .collect();
            for candidate in front.iter().copied() {
                self.best_ever.add(candidate);
                self.iteration_best.add(candidate);
            }
        } else if let Some(best) = self.population.get(0) {
            self.best_ever.add(best);
            self.iteration_best.add(best);
        }

        if let Some(best) = self.population.get(0) {
            let value = best.min_only_fitness(&self.objective);
            match self.best_seen {
                Some(seen) if value >= seen => {
                    let stalled = self.iteration - self.last_improvement;
                    if stalled > 0 && stalled % STALL_WARNING_INTERVAL == 0 {
                        warn!(stalled, "no improvement of the best candidate");
                    }
                }
                _ => {
                    self.best_seen = Some(value);
                    self.last_improvement = self.iteration;
                }
            }
        }
    }

    pub(crate) fn inform(&mut self, phase: MonitorPhase) {
        for monitor in self.monitors.iter_mut() {
            monitor.inform(phase, &self.population, self.iteration);
        }
    }
}

impl<I: Individual> ParChildBase<I> {
    /// Writes a periodic checkpoint when one is due.
    pub(crate) fn checkpoint_if_due(&self) -> Result<()> {
        if let Some(sink) = &self.checkpoint {
            if sink.every() > 0 && self.iteration % sink.every() == 0 {
                sink.save(&self.population, self.iteration)?;
            }
        }
        Ok(())
    }

    /// Writes the final checkpoint at termination.
    pub(crate) fn checkpoint_final(&self) -> Result<()> {
        if let Some(sink) = &self.checkpoint {
            sink.save(&self.population, self.iteration)?;
        }
        Ok(())
    }
}
