use paragen::*;
use std::sync::Arc;

/// Minimizes the 16-dimensional sphere function with a µ+λ evolutionary
/// algorithm on the local thread pool.
fn main() -> ParagenResult<()> {
    init_logging();
    random_provider::set_seed(42);

    let seed = FunctionIndividual::new(16, -10.0..10.0, 1.0, BenchmarkFunction::Sphere);

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(seed)
        .population_size(60)
        .n_parents(10)
        .minimizing()
        .executor(Arc::new(WorkerPoolExecutor::new(0)))
        .recombination_method(RecombinationMethod::Value)
        .amalgamation_likelihood(0.2)
        .sorting_method(SortingMode::MuPlusLambda)
        .monitor(ProgressMonitor::new(Objective::Single(Optimize::Minimize)).every(25))
        .max_iterations(500)
        .target_fitness(1e-9)
        .build()?;

    let outcome = engine.optimize()?;

    println!(
        "best fitness {:.3e} after {} generations ({})",
        outcome.best_fitness(),
        outcome.iterations(),
        outcome.stop_reason()
    );
    println!("best parameters: {:?}", outcome.best().individual().params());
    Ok(())
}
