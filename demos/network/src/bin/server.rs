use paragen::*;
use std::sync::Arc;
use std::time::Duration;

/// Runs the driver side of a brokered optimization: a TCP consumer accepts
/// remote workers (see the `network-worker` binary) and the engine farms its
/// evaluations out to them.
fn main() -> ParagenResult<()> {
    init_logging();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:10200".to_string());

    let broker: Broker<FunctionIndividual> = Broker::new();
    let consumer = NetworkConsumer::bind(
        broker.clone(),
        NetworkConsumerConfig {
            addr,
            mode: SerializationMode::Binary,
            ..NetworkConsumerConfig::default()
        },
    )?;
    let handle = consumer.spawn()?;
    println!("listening on {}", handle.addr());

    let executor = BrokeredExecutor::new(&broker)
        .with_wait_factor(3.0)
        .with_max_wait(Duration::from_secs(30));

    let seed = FunctionIndividual::new(8, -10.0..10.0, 1.0, BenchmarkFunction::Rastrigin);
    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(seed)
        .population_size(40)
        .n_parents(8)
        .minimizing()
        .executor(Arc::new(executor))
        .sorting_method(SortingMode::MuPlusLambda)
        .monitor(ProgressMonitor::new(Objective::Single(Optimize::Minimize)).every(10))
        .max_iterations(200)
        .build()?;

    let outcome = engine.optimize()?;
    println!(
        "best fitness {:.3e} after {} generations ({})",
        outcome.best_fitness(),
        outcome.iterations(),
        outcome.stop_reason()
    );
    Ok(())
}
