use paragen::*;

/// Simulated annealing on the 10-dimensional Rosenbrock valley.
fn main() -> ParagenResult<()> {
    init_logging();
    random_provider::set_seed(7);

    let seed = FunctionIndividual::new(10, -5.0..5.0, 0.5, BenchmarkFunction::Rosenbrock);

    let mut engine = SimulatedAnnealing::builder()
        .individual(seed)
        .population_size(10)
        .n_parents(1)
        .minimizing()
        .t0(10.0)
        .alpha(0.95)
        .monitor(ProgressMonitor::new(Objective::Single(Optimize::Minimize)).every(50))
        .max_iterations(500)
        .build()?;

    let outcome = engine.optimize()?;

    println!(
        "best fitness {:.3e} after {} generations, final temperature {:.3e}",
        outcome.best_fitness(),
        outcome.iterations(),
        engine.temperature()
    );
    Ok(())
}
