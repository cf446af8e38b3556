use crate::Result;
use crate::base::ParChildBase;
use crate::checkpoint::{CheckpointConfig, CheckpointSink};
use crate::control::HaltHandle;
use crate::ea::EvolutionaryAlgorithm;
use crate::limit::Limit;
use crate::monitor::Monitor;
use crate::recombine::RecombinationMethod;
use crate::sa::SimulatedAnnealing;
use paragen_core::{
    BestSet, Candidate, Executor, Individual, Objective, Optimize, Population, SerialExecutor,
    ensure,
};
use paragen_selectors::SortingMode;
use serde::Serialize;
use std::sync::Arc;

const DEFAULT_POPULATION_SIZE: usize = 100;
const DEFAULT_N_PARENTS: usize = 5;
const DEFAULT_BEST_CAPACITY: usize = 10;
const DEFAULT_MAX_ITERATIONS: usize = 1000;
const DEFAULT_T0: f64 = 1000.0;
const DEFAULT_ALPHA: f64 = 0.95;

/// Settings shared by both engine builders.
struct CommonSettings<I: Individual> {
    seeds: Vec<I>,
    population_size: usize,
    n_parents: usize,
    objective: Objective,
    executor: Option<Arc<dyn Executor<I>>>,
    recombination: RecombinationMethod,
    amalgamation_likelihood: f64,
    growth_rate: usize,
    max_population_size: usize,
    best_capacity: usize,
    monitors: Vec<Box<dyn Monitor<I>>>,
    checkpoint: Option<CheckpointSink<I>>,
    halt: HaltHandle,
    limits: Vec<Limit>,
}

impl<I: Individual> Default for CommonSettings<I> {
    fn default() -> Self {
        CommonSettings {
            seeds: Vec::new(),
            population_size: DEFAULT_POPULATION_SIZE,
            n_parents: DEFAULT_N_PARENTS,
            objective: Objective::Single(Optimize::Minimize),
            executor: None,
            recombination: RecombinationMethod::Default,
            amalgamation_likelihood: 0.0,
            growth_rate: 0,
            max_population_size: 0,
            best_capacity: DEFAULT_BEST_CAPACITY,
            monitors: Vec::new(),
            checkpoint: None,
            halt: HaltHandle::new(),
            limits: Vec::new(),
        }
    }
}

impl<I: Individual> CommonSettings<I> {
    fn validate(&self) -> Result<()> {
        ensure!(!self.seeds.is_empty(), InvalidConfig: "at least one seed individual is required");
        ensure!(self.population_size > 0, InvalidConfig: "population size is set to 0");
        ensure!(self.n_parents > 0, InvalidConfig: "number of parents is set to 0");
        ensure!(
            (0.0..=1.0).contains(&self.amalgamation_likelihood),
            InvalidParameter: "amalgamation likelihood {} is outside [0, 1]",
            self.amalgamation_likelihood
        );
        if self.growth_rate > 0 {
            ensure!(
                self.max_population_size >= self.population_size,
                InvalidConfig: "maximum population size {} is below the initial size {}",
                self.max_population_size,
                self.population_size
            );
        }
        Ok(())
    }

    fn into_base(mut self) -> ParChildBase<I> {
        let candidates = self
            .seeds
            .drain(..)
            .map(Candidate::new)
            .collect::<Vec<_>>();
        let mut population = Population::new(candidates);
        population.set_sizes(self.population_size, self.n_parents);

        ParChildBase {
            population,
            objective: self.objective.clone(),
            executor: self
                .executor
                .unwrap_or_else(|| Arc::new(SerialExecutor::new())),
            recombination: self.recombination,
            amalgamation_likelihood: self.amalgamation_likelihood,
            growth_rate: self.growth_rate,
            max_population_size: self.max_population_size,
            iteration: 0,
            best_ever: BestSet::new(self.best_capacity, self.objective.clone()),
            iteration_best: BestSet::new(self.best_capacity, self.objective),
            monitors: self.monitors,
            halt: self.halt,
            checkpoint: self.checkpoint,
            best_seen: None,
            last_improvement: 0,
        }
    }

    fn limits_or_default(limits: Vec<Limit>) -> Vec<Limit> {
        if limits.is_empty() {
            vec![Limit::Iterations(DEFAULT_MAX_ITERATIONS)]
        } else {
            limits
        }
    }
}

macro_rules! common_builder_methods {
    () => {
        /// Seeds the population. Missing candidates up to the nominal size
        /// are filled in as adapted clones of the last seed.
        pub fn individuals(mut self, seeds: Vec<I>) -> Self {
            self.common.seeds = seeds;
            self
        }

        pub fn individual(mut self, seed: I) -> Self {
            self.common.seeds.push(seed);
            self
        }

        /// Nominal population size µ+λ.
        pub fn population_size(mut self, size: usize) -> Self {
            self.common.population_size = size;
            self
        }

        /// Parent count µ.
        pub fn n_parents(mut self, n_parents: usize) -> Self {
            self.common.n_parents = n_parents;
            self
        }

        pub fn minimizing(mut self) -> Self {
            self.common.objective = Objective::Single(Optimize::Minimize);
            self
        }

        pub fn maximizing(mut self) -> Self {
            self.common.objective = Objective::Single(Optimize::Maximize);
            self
        }

        /// One optimization direction per fitness criterion, for
        /// multi-objective runs.
        pub fn objectives(mut self, directions: Vec<Optimize>) -> Self {
            self.common.objective = Objective::Multi(directions);
            self
        }

        /// The execution backend; defaults to the serial executor.
        pub fn executor(mut self, executor: Arc<dyn Executor<I>>) -> Self {
            self.common.executor = Some(executor);
            self
        }

        pub fn recombination_method(mut self, method: RecombinationMethod) -> Self {
            self.common.recombination = method;
            self
        }

        /// Probability of producing a child by amalgamation instead of
        /// duplication.
        pub fn amalgamation_likelihood(mut self, likelihood: f64) -> Self {
            self.common.amalgamation_likelihood = likelihood;
            self
        }

        /// Linear growth schedule: add `growth_rate` candidates per
        /// generation until `max_population_size` is reached.
        pub fn growth(mut self, growth_rate: usize, max_population_size: usize) -> Self {
            self.common.growth_rate = growth_rate;
            self.common.max_population_size = max_population_size;
            self
        }

        /// Capacity of the best-ever and best-of-iteration queues.
        pub fn best_capacity(mut self, capacity: usize) -> Self {
            self.common.best_capacity = capacity;
            self
        }

        pub fn monitor(mut self, monitor: impl Monitor<I> + 'static) -> Self {
            self.common.monitors.push(Box::new(monitor));
            self
        }

        pub fn checkpoint(mut self, config: CheckpointConfig) -> Self
        where
            I: Serialize,
        {
            self.common.checkpoint = Some(CheckpointSink::new(config));
            self
        }

        pub fn halt_handle(mut self, halt: HaltHandle) -> Self {
            self.common.halt = halt;
            self
        }

        pub fn max_iterations(mut self, iterations: usize) -> Self {
            self.common.limits.push(Limit::Iterations(iterations));
            self
        }

        pub fn max_minutes(mut self, minutes: f64) -> Self {
            self.common.limits.push(Limit::Minutes(minutes));
            self
        }

        /// Stop once the best primary fitness is at least as good as this.
        pub fn target_fitness(mut self, target: f64) -> Self {
            self.common.limits.push(Limit::Target(target));
            self
        }
    };
}

/// Fluent configuration of an [EvolutionaryAlgorithm]. Inconsistent
/// population sizes and parameters are reported here, at build time.
pub struct EvolutionaryAlgorithmBuilder<I: Individual> {
    common: CommonSettings<I>,
    sorting: SortingMode,
}

impl<I: Individual> Default for EvolutionaryAlgorithmBuilder<I> {
    fn default() -> Self {
        EvolutionaryAlgorithmBuilder {
            common: CommonSettings::default(),
            sorting: SortingMode::default(),
        }
    }
}

impl<I: Individual> EvolutionaryAlgorithmBuilder<I> {
    common_builder_methods!();

    pub fn sorting_method(mut self, sorting: SortingMode) -> Self {
        self.sorting = sorting;
        self
    }

    pub fn build(mut self) -> Result<EvolutionaryAlgorithm<I>> {
        self.common.validate()?;

        let size = self.common.population_size;
        let n_parents = self.common.n_parents;
        if self.sorting.requires_full_child_set() {
            // All parents may be replaced by children, so at least µ
            // children must exist.
            ensure!(size >= 2 * n_parents,
                InvalidConfig: "population size {} is too small for {} parents in a comma mode", size, n_parents);
        } else {
            ensure!(size > n_parents,
                InvalidConfig: "population size {} is too small for {} parents in a plus mode", size, n_parents);
        }

        if self.sorting.is_pareto() {
            let criteria = self
                .common
                .seeds
                .first()
                .map(|seed| seed.n_criteria())
                .unwrap_or(1);
            ensure!(criteria >= 2,
                InvalidConfig: "pareto sorting requires at least two fitness criteria, individuals expose {}", criteria);
            ensure!(self.common.objective.is_multi(),
                InvalidConfig: "pareto sorting requires a multi-criterion objective");
            ensure!(self.common.objective.n_criteria() == criteria,
                InvalidConfig: "objective carries {} directions but individuals expose {} criteria",
                self.common.objective.n_criteria(), criteria);
        }

        let limits =
            CommonSettings::<I>::limits_or_default(std::mem::take(&mut self.common.limits));
        let sorting = self.sorting;

        Ok(EvolutionaryAlgorithm {
            base: self.common.into_base(),
            sorting,
            scheme: sorting.scheme(),
            limits,
            initialized: false,
        })
    }
}

/// Fluent configuration of a [SimulatedAnnealing] engine.
pub struct SimulatedAnnealingBuilder<I: Individual> {
    common: CommonSettings<I>,
    t0: f64,
    alpha: f64,
}

impl<I: Individual> Default for SimulatedAnnealingBuilder<I> {
    fn default() -> Self {
        SimulatedAnnealingBuilder {
            common: CommonSettings::default(),
            t0: DEFAULT_T0,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl<I: Individual> SimulatedAnnealingBuilder<I> {
    common_builder_methods!();

    /// Start temperature T₀; must be positive.
    pub fn t0(mut self, t0: f64) -> Self {
        self.t0 = t0;
        self
    }

    /// Cooling factor applied every generation; must lie in (0, 1].
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn build(mut self) -> Result<SimulatedAnnealing<I>> {
        self.common.validate()?;

        let size = self.common.population_size;
        let n_parents = self.common.n_parents;
        ensure!(size >= 2 * n_parents,
            InvalidConfig: "population size {} is too small for {} parents in annealing mode", size, n_parents);
        ensure!(self.t0 > 0.0, InvalidParameter: "start temperature {} must be positive", self.t0);
        ensure!(self.alpha > 0.0 && self.alpha <= 1.0,
            InvalidParameter: "cooling factor {} is outside (0, 1]", self.alpha);

        let limits =
            CommonSettings::<I>::limits_or_default(std::mem::take(&mut self.common.limits));
        let t0 = self.t0;
        let alpha = self.alpha;

        Ok(SimulatedAnnealing {
            base: self.common.into_base(),
            t0,
            temperature: t0,
            alpha,
            limits,
            initialized: false,
        })
    }
}
