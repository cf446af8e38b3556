use paragen_broker::*;
use paragen_core::*;
use paragen_engines::{
    Engine, EvolutionaryAlgorithm, RecombinationMethod, StopReason,
};
use paragen_selectors::SortingMode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

fn sphere_seed(dimension: usize) -> FunctionIndividual {
    FunctionIndividual::new(dimension, -10.0..10.0, 1.0, BenchmarkFunction::Sphere)
}

/// An in-process consumer that evaluates work items locally, dropping every
/// `drop_every`-th result on the floor (0 = lossless). Stands in for a fleet
/// of remote workers.
struct LossyConsumer {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<usize>>,
}

impl LossyConsumer {
    fn spawn(broker: Broker<FunctionIndividual>, drop_every: usize) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = std::thread::spawn(move || {
            let mut processed = 0usize;
            let mut seen = 0usize;
            while !stop_flag.load(Ordering::Relaxed) {
                let Some((port, mut item)) = broker.pop_work_or_timeout(Duration::from_millis(20))
                else {
                    continue;
                };

                seen += 1;
                if drop_every != 0 && seen % drop_every == 0 {
                    continue;
                }

                if item.candidate.evaluate().is_ok() {
                    processed += 1;
                }
                broker.push_result(port, item);
            }
            processed
        });

        LossyConsumer {
            stop,
            thread: Some(thread),
        }
    }

    fn stop(&mut self) -> usize {
        self.stop.store(true, Ordering::Relaxed);
        self.thread.take().map(|t| t.join().unwrap()).unwrap_or(0)
    }
}

impl Drop for LossyConsumer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[test]
fn brokered_run_with_packet_loss_repairs_every_generation() {
    random_provider::set_seed(42);

    let broker: Broker<FunctionIndividual> = Broker::new();
    // Drop every 5th result: 20 % loss.
    let mut consumer = LossyConsumer::spawn(broker.clone(), 5);

    let executor = BrokeredExecutor::new(&broker)
        .with_wait_factor(200.0)
        .with_max_wait(Duration::from_secs(2));

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(40)
        .n_parents(10)
        .minimizing()
        .executor(Arc::new(executor))
        .recombination_method(RecombinationMethod::Random)
        .sorting_method(SortingMode::MuPlusLambda)
        .build()
        .unwrap();

    let mut previous_best = f64::INFINITY;
    for _ in 0..100 {
        let generation = engine.next().unwrap();

        // Every generation ends with exactly µ+λ candidates, lost items
        // replaced by clones.
        assert_eq!(generation.population_size(), 40);

        // Monotone improvement still holds for µ+λ under loss.
        assert!(generation.best_fitness() <= previous_best);
        previous_best = generation.best_fitness();
    }

    let processed = consumer.stop();
    assert!(processed > 0);
}

#[test]
fn zero_returns_leave_the_population_nominal_and_the_run_alive() {
    random_provider::set_seed(7);

    let broker: Broker<FunctionIndividual> = Broker::new();
    let mut consumer = LossyConsumer::spawn(broker.clone(), 0);

    let executor = BrokeredExecutor::new(&broker)
        .with_wait_factor(200.0)
        .with_max_wait(Duration::from_millis(500));

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(2))
        .population_size(6)
        .n_parents(2)
        .executor(Arc::new(executor))
        .sorting_method(SortingMode::MuPlusLambda)
        .build()
        .unwrap();

    // Generation 0 runs against a live consumer so the parents get scored.
    let first = engine.next().unwrap();
    assert_eq!(first.population_size(), 6);

    // From here on every dispatched child is lost.
    consumer.stop();

    for _ in 0..3 {
        let generation = engine.next().unwrap();
        assert_eq!(generation.population_size(), 6);
        // The best parent survives untouched; termination is not forced.
        assert!(generation.best_fitness() <= first.best_fitness());
    }
}

#[test]
fn duplicate_returns_are_discarded() {
    random_provider::set_seed(11);

    let broker: Broker<FunctionIndividual> = Broker::new();

    // A consumer that returns every item twice.
    let echo_broker = broker.clone();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let duplicates = Arc::new(AtomicUsize::new(0));
    let duplicates_counter = Arc::clone(&duplicates);
    let consumer = std::thread::spawn(move || {
        while !stop_flag.load(Ordering::Relaxed) {
            if let Some((port, mut item)) =
                echo_broker.pop_work_or_timeout(Duration::from_millis(20))
            {
                item.candidate.evaluate().unwrap();
                echo_broker.push_result(port, item.clone());
                echo_broker.push_result(port, item);
                duplicates_counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    let executor = BrokeredExecutor::new(&broker)
        .with_wait_factor(200.0)
        .with_max_wait(Duration::from_secs(2));

    let mut population = Population::new(vec![
        Candidate::new(sphere_seed(2)),
        Candidate::new(sphere_seed(2)),
        Candidate::new(sphere_seed(2)),
    ]);
    population.set_sizes(3, 1);
    population.mark_positions();

    let outcome = executor.evaluate_range(&mut population, 0..3, 0).unwrap();

    assert_eq!(outcome.completed, 3);
    assert_eq!(population.len(), 3);
    assert!(duplicates.load(Ordering::Relaxed) >= 3);

    stop.store(true, Ordering::Relaxed);
    consumer.join().unwrap();
}

#[test]
fn wire_interop_seed_compute_and_result() {
    random_provider::set_seed(13);

    let broker: Broker<FunctionIndividual> = Broker::new();
    let consumer = NetworkConsumer::bind(
        broker.clone(),
        NetworkConsumerConfig {
            seed_start: 4711,
            ..NetworkConsumerConfig::default()
        },
    )
    .unwrap();
    let handle = consumer.spawn().unwrap();
    let addr = handle.addr().to_string();

    // A standalone worker: one getSeed transaction, then ready/result
    // cycles until it stalls out.
    let worker_addr = addr.clone();
    let worker = std::thread::spawn(move || {
        let mut config = NetworkWorkerConfig::new(worker_addr);
        config.max_stalls = 3;
        let worker: NetworkWorker<FunctionIndividual> = NetworkWorker::new(config)
            .with_sleeps(Duration::from_millis(20), Duration::from_millis(20));
        worker.run().unwrap()
    });

    // The driver side completes one dispatch with exactly that one
    // evaluation.
    let executor = BrokeredExecutor::new(&broker).with_max_wait(Duration::from_secs(10));
    let mut population = Population::new(vec![Candidate::new(FunctionIndividual::with_params(
        vec![3.0, 4.0],
        -10.0..10.0,
        1.0,
        BenchmarkFunction::Sphere,
    ))]);
    population.set_sizes(1, 1);
    population.mark_positions();

    let outcome = executor.evaluate_range(&mut population, 0..1, 0).unwrap();

    assert_eq!(outcome.completed, 1);
    assert_eq!(population.len(), 1);
    assert!(!population[0].is_dirty());
    assert_eq!(population[0].primary_fitness().unwrap(), 25.0);

    let report = worker.join().unwrap();
    assert_eq!(report.processed, 1);
    assert!(report.stalls >= 3);
}

#[test]
fn seed_transactions_hand_out_consecutive_seeds() {
    let broker: Broker<FunctionIndividual> = Broker::new();
    let consumer = NetworkConsumer::bind(
        broker,
        NetworkConsumerConfig {
            seed_start: 100,
            ..NetworkConsumerConfig::default()
        },
    )
    .unwrap();
    let handle = consumer.spawn().unwrap();

    let config = NetworkWorkerConfig::new(handle.addr().to_string());
    let worker: NetworkWorker<FunctionIndividual> = NetworkWorker::new(config);

    assert_eq!(worker.fetch_seed().unwrap(), 100);
    assert_eq!(worker.fetch_seed().unwrap(), 101);
    assert_eq!(worker.fetch_seed().unwrap(), 102);
}

#[test]
fn brokered_sphere_run_reaches_iteration_limit() {
    random_provider::set_seed(17);

    let broker: Broker<FunctionIndividual> = Broker::new();
    let _consumer = LossyConsumer::spawn(broker.clone(), 0);

    let executor = BrokeredExecutor::new(&broker)
        .with_wait_factor(200.0)
        .with_max_wait(Duration::from_secs(2));

    let mut engine = EvolutionaryAlgorithm::builder()
        .individual(sphere_seed(3))
        .population_size(10)
        .n_parents(3)
        .executor(Arc::new(executor))
        .sorting_method(SortingMode::MuCommaLambda)
        .max_iterations(20)
        .build()
        .unwrap();

    let outcome = engine.optimize().unwrap();
    assert_eq!(outcome.stop_reason(), StopReason::IterationLimit);
    assert_eq!(outcome.iterations(), 20);
}
