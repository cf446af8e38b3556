use paragen_engines::*;
use rstest::*;
use std::sync::Arc;

fn sphere_seed(dimension: usize) -> FunctionIndividual {
    FunctionIndividual::new(dimension, -10.0..10.0, 1.0, BenchmarkFunction::Sphere)
}

#[test]
fn sphere_minimization_converges() {
    random_provider::set_seed(42);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(5)
        .n_parents(2)
        .minimizing()
        .recombination_method(RecombinationMethod::Random)
        .sorting_method(SortingMode::MuPlusLambda)
        .max_iterations(100)
        .build()
        .unwrap();

    let outcome = engine.optimize().unwrap();

    assert_eq!(outcome.stop_reason(), StopReason::IterationLimit);
    assert_eq!(outcome.iterations(), 100);
    assert!(
        outcome.best_fitness() < 0.1,
        "sphere best fitness was {}",
        outcome.best_fitness()
    );
}

#[test]
fn mu_plus_lambda_improvement_is_monotone() {
    random_provider::set_seed(7);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(3))
        .population_size(8)
        .n_parents(2)
        .minimizing()
        .sorting_method(SortingMode::MuPlusLambda)
        .build()
        .unwrap();

    let mut previous = f64::INFINITY;
    for _ in 0..60 {
        let generation = engine.next().unwrap();
        assert!(
            generation.best_fitness() <= previous,
            "generation {} degraded from {} to {}",
            generation.index(),
            previous,
            generation.best_fitness()
        );
        previous = generation.best_fitness();
    }
}

#[test]
fn parents_are_flagged_after_every_selection() {
    random_provider::set_seed(11);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(6)
        .n_parents(2)
        .sorting_method(SortingMode::MuCommaLambda)
        .build()
        .unwrap();

    for _ in 0..10 {
        engine.next().unwrap();
        let population = engine.population();
        for (position, candidate) in population.iter().enumerate() {
            let expect_parent = position < 2;
            assert_eq!(candidate.traits().is_parent(), expect_parent);
            assert_eq!(candidate.traits().parent_counter() > 0, expect_parent);
            assert_eq!(candidate.traits().population_position(), position);
        }
    }
}

#[test]
fn population_is_nominal_and_clean_after_every_generation() {
    random_provider::set_seed(13);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(7)
        .n_parents(3)
        .executor(Arc::new(WorkerPoolExecutor::new(4)))
        .sorting_method(SortingMode::MuPlusLambda)
        .build()
        .unwrap();

    for _ in 0..15 {
        let generation = engine.next().unwrap();
        assert_eq!(generation.population_size(), 7);
        for candidate in engine.population().iter() {
            assert!(!candidate.is_dirty());
        }
    }
}

#[test]
fn scheduled_growth_follows_the_linear_schedule() {
    random_provider::set_seed(3);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(10)
        .n_parents(2)
        .growth(2, 20)
        .sorting_method(SortingMode::MuPlusLambda)
        .build()
        .unwrap();

    let mut sizes = Vec::new();
    for _ in 0..8 {
        sizes.push(engine.next().unwrap().population_size());
    }

    assert_eq!(sizes, vec![10, 12, 14, 16, 18, 20, 20, 20]);
    // The parent count is held constant through growth.
    assert_eq!(engine.population().n_parents(), 2);
}

#[rstest]
#[case(RecombinationMethod::Value)]
#[case(RecombinationMethod::Default)]
fn recombination_methods_make_progress(#[case] method: RecombinationMethod) {
    random_provider::set_seed(19);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(4))
        .population_size(12)
        .n_parents(3)
        .recombination_method(method)
        .amalgamation_likelihood(0.3)
        .sorting_method(SortingMode::MuPlusLambda)
        .max_iterations(40)
        .build()
        .unwrap();

    let first = engine.next().unwrap().best_fitness();
    let outcome = engine.optimize().unwrap();
    assert!(outcome.best_fitness() <= first);
}

#[test]
fn pareto_parents_are_mutually_non_dominated_at_termination() {
    random_provider::set_seed(29);

    let seed = FunctionIndividual::new(1, -5.0..5.0, 0.5, BenchmarkFunction::TwoParabolas);
    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(seed)
        .population_size(12)
        .n_parents(4)
        .objectives(vec![Optimize::Minimize, Optimize::Minimize])
        .sorting_method(SortingMode::MuPlusLambdaPareto)
        .max_iterations(50)
        .build()
        .unwrap();

    engine.optimize().unwrap();

    let objective = Objective::Multi(vec![Optimize::Minimize, Optimize::Minimize]);
    let population = engine.population();
    for i in 0..4 {
        for j in 0..4 {
            if i == j {
                continue;
            }
            let a = population[i].score().unwrap().clone();
            let b = population[j].score().unwrap().clone();
            let strictly = objective.dominates(&a, &b) && !objective.dominates(&b, &a);
            assert!(!strictly, "parent {} strictly dominates parent {}", i, j);
        }
    }
}

#[test]
fn pareto_iteration_best_accumulates_across_generations() {
    random_provider::set_seed(37);

    let seed = FunctionIndividual::new(1, -5.0..5.0, 0.5, BenchmarkFunction::TwoParabolas);
    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(seed)
        .population_size(12)
        .n_parents(4)
        .objectives(vec![Optimize::Minimize, Optimize::Minimize])
        .sorting_method(SortingMode::MuPlusLambdaPareto)
        .best_capacity(30)
        .max_iterations(50)
        .build()
        .unwrap();

    engine.optimize().unwrap();

    // One generation's front holds at most the whole population (12), so a
    // full queue proves the history survived across generations instead of
    // being rewritten by the last front.
    assert_eq!(engine.iteration_best().len(), 30);
    for pair in engine.iteration_best().windows(2) {
        assert!(pair[0].score().unwrap().as_f64() <= pair[1].score().unwrap().as_f64());
    }
}

#[test]
fn target_limit_stops_the_run() {
    random_provider::set_seed(47);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(6)
        .n_parents(2)
        .target_fitness(1.0)
        .max_iterations(500)
        .sorting_method(SortingMode::MuPlusLambda)
        .build()
        .unwrap();

    let outcome = engine.optimize().unwrap();
    if outcome.stop_reason() == StopReason::TargetReached {
        assert!(outcome.best_fitness() <= 1.0);
        assert!(outcome.iterations() < 500);
    }
}

#[test]
fn halt_handle_stops_the_run() {
    random_provider::set_seed(53);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(6)
        .n_parents(2)
        .sorting_method(SortingMode::MuPlusLambda)
        .build()
        .unwrap();

    engine.halt_handle().halt();
    let outcome = engine.optimize().unwrap();
    assert_eq!(outcome.stop_reason(), StopReason::Halted);
}

#[test]
fn best_ever_queue_is_populated() {
    random_provider::set_seed(59);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(6)
        .n_parents(2)
        .best_capacity(5)
        .max_iterations(30)
        .sorting_method(SortingMode::MuPlusLambda)
        .build()
        .unwrap();

    let outcome = engine.optimize().unwrap();

    let best_ever = engine.best_ever();
    assert!(!best_ever.is_empty());
    assert!(best_ever.len() <= 5);
    assert_eq!(
        best_ever[0].primary_fitness().unwrap(),
        outcome.best_fitness()
    );
    // Best first.
    for pair in best_ever.windows(2) {
        assert!(pair[0].primary_fitness().unwrap() <= pair[1].primary_fitness().unwrap());
    }
}

#[rstest]
#[case(0, 2, SortingMode::MuPlusLambda)] // population size 0
#[case(6, 0, SortingMode::MuPlusLambda)] // no parents
#[case(3, 3, SortingMode::MuPlusLambda)] // plus mode needs size > parents
#[case(7, 4, SortingMode::MuCommaLambda)] // comma mode needs size >= 2 * parents
#[case(7, 4, SortingMode::MuOneRetain)]
fn invalid_sizes_are_rejected_at_build_time(
    #[case] size: usize,
    #[case] n_parents: usize,
    #[case] sorting: SortingMode,
) {
    let result = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(size)
        .n_parents(n_parents)
        .sorting_method(sorting)
        .build();

    assert!(result.is_err());
}

#[test]
fn pareto_with_single_criterion_individuals_is_rejected() {
    let result = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(8)
        .n_parents(2)
        .objectives(vec![Optimize::Minimize, Optimize::Minimize])
        .sorting_method(SortingMode::MuPlusLambdaPareto)
        .build();

    assert!(result.is_err());
}

struct PhaseRecorder {
    phases: Arc<std::sync::Mutex<Vec<MonitorPhase>>>,
}

impl Monitor<FunctionIndividual> for PhaseRecorder {
    fn inform(&mut self, phase: MonitorPhase, _: &Population<FunctionIndividual>, _: usize) {
        self.phases.lock().unwrap().push(phase);
    }
}

#[test]
fn monitors_see_all_three_phases() {
    use std::sync::Mutex;

    random_provider::set_seed(61);
    let phases: Arc<Mutex<Vec<MonitorPhase>>> = Arc::new(Mutex::new(Vec::new()));

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(5)
        .n_parents(2)
        .max_iterations(3)
        .sorting_method(SortingMode::MuPlusLambda)
        .monitor(PhaseRecorder {
            phases: Arc::clone(&phases),
        })
        .build()
        .unwrap();

    engine.optimize().unwrap();

    let seen = phases.lock().unwrap();
    assert_eq!(seen.first(), Some(&MonitorPhase::Init));
    assert_eq!(seen.last(), Some(&MonitorPhase::End));
    assert_eq!(
        seen.iter()
            .filter(|p| **p == MonitorPhase::Processing)
            .count(),
        3
    );
}
