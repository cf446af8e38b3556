use crate::Result;
use crate::base::ParChildBase;
use crate::builder::SimulatedAnnealingBuilder;
use crate::engine::Engine;
use crate::generation::{Generation, OptimizeOutcome};
use crate::limit::{Limit, StopReason, first_hit};
use crate::monitor::MonitorPhase;
use paragen_core::{Individual, paragen_err, random_provider};
use paragen_selectors::{ensure_clean, sort_range_by_primary};
use std::time::Instant;
use tracing::debug;

/// Simulated annealing on the parent-child population.
///
/// The generation cycle is identical to the evolutionary algorithm's; only
/// selection differs. After partial-sorting the µ best children right behind
/// the parents, each parent is challenged pairwise by its corresponding
/// child: a better child replaces the parent unconditionally, a worse one
/// replaces it with the Metropolis probability `exp(−|Δ| / T)`. The
/// temperature then cools by the factor `alpha`; with `alpha = 1` this is a
/// pure Metropolis algorithm at fixed temperature.
pub struct SimulatedAnnealing<I: Individual> {
    pub(crate) base: ParChildBase<I>,
    pub(crate) t0: f64,
    pub(crate) temperature: f64,
    pub(crate) alpha: f64,
    pub(crate) limits: Vec<Limit>,
    pub(crate) initialized: bool,
}

impl<I: Individual> SimulatedAnnealing<I> {
    pub fn builder() -> SimulatedAnnealingBuilder<I> {
        SimulatedAnnealingBuilder::default()
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// Runs until a limit fires or the halt handle is raised.
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

    pub fn best_ever(&self) -> &[paragen_core::Candidate<I>] {
        self.base.best_ever.snapshot()
    }

    pub fn population(&self) -> &paragen_core::Population<I> {
        &self.base.population
    }

    pub fn halt_handle(&self) -> crate::control::HaltHandle {
        self.base.halt.clone()
    }

    /// Metropolis acceptance: replaces selection for simulated annealing.
    fn sort_sa_mode(&mut self) -> Result<()> {
        let objective = self.base.objective.clone();
        let population = &mut self.base.population;
        let n_parents = population.n_parents();
        let len = population.len();

        ensure_clean(population, 0..len, "SimulatedAnnealing")?;

        // Position the µ best children right behind the parents.
        sort_range_by_primary(population, n_parents..len, &objective);

        for parent in 0..n_parents {
            let q_parent = population[parent].min_only_fitness(&objective);
            let q_child = population[n_parents + parent].min_only_fitness(&objective);

            let p_pass = sa_probability(q_parent, q_child, self.temperature);
            if p_pass >= 1.0 || random_provider::random::<f64>() < p_pass {
                let child = population[n_parents + parent].clone();
                population[parent].load_from(&child);
            }
        }

        // A child with a worse fitness may have replaced a parent, so the
        // parent section needs re-sorting.
        sort_range_by_primary(population, 0..n_parents, &objective);

        self.temperature *= self.alpha;
        Ok(())
    }
}

/// The pairwise acceptance probability in min-only space. Values of one or
/// above mean the child replaces the parent unconditionally.
fn sa_probability(q_parent: f64, q_child: f64, temperature: f64) -> f64 {
    if q_child < q_parent {
        return 2.0;
    }
    (-(q_child - q_parent) / temperature).exp()
}

impl<I: Individual> Engine for SimulatedAnnealing<I> {
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

        // Parents are evaluated together with the children in generation 0,
        // so the pairwise challenge applies from the very first selection.
        self.sort_sa_mode()?;

        self.base.population.mark_parents();
        self.base.population.mark_children();
        self.base.population.mark_positions();

        let nominal = self.base.population.nominal_size();
        self.base.population.truncate(nominal);

        self.base.update_records(false);
        self.base.checkpoint_if_due()?;
        self.base.inform(MonitorPhase::Processing);

        let best = self.base.population[0].clone();
        let best_fitness = best.primary_fitness()?;
        let generation = Generation {
            index: self.base.iteration,
            best,
            best_fitness,
            population_size: self.base.population.len(),
            temperature: Some(self.temperature),
        };

        self.base.iteration += 1;
        Ok(generation)
    }
}
