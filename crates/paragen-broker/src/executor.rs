use crate::broker::{Broker, PortHandle};
use crate::{Result, paragen_err};
use paragen_core::{EvalOutcome, Executor, Individual, Population, WorkerPoolExecutor};
use std::collections::HashSet;
use std::ops::Range;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEFAULT_WAIT_FACTOR: f64 = 3.0;
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(10);

/// Farms evaluations out through a [Broker] to whatever consumers are
/// attached to it, typically a TCP server with remote workers behind it.
///
/// One work item is pushed per candidate in the range; the call then collects
/// from the inbound queue until either every dispatched item is accounted for
/// or a deadline fires. The deadline is the *wait factor* times the latency
/// of the first returned item, bounded by `max_wait` so a run with no
/// consumers still terminates. Everything still missing at the deadline is
/// classified as lost; the driver's repair step refills the population.
///
/// Returned items from earlier iterations land in the `old` bucket,
/// duplicates for the current iteration are discarded, and items flagged as
/// unsuccessfully processed are treated as lost.
///
/// Adaptation does not travel over the wire; it runs on a local worker pool
/// like in the multithreaded backend.
pub struct BrokeredExecutor<I: Individual> {
    port: PortHandle<I>,
    adapt_pool: WorkerPoolExecutor,
    wait_factor: f64,
    max_wait: Duration,
}

impl<I: Individual> BrokeredExecutor<I> {
    /// Attaches to the broker, acquiring a buffer pair for the duration of
    /// this executor's life.
    pub fn new(broker: &Broker<I>) -> Self {
        BrokeredExecutor {
            port: broker.get_port(),
            adapt_pool: WorkerPoolExecutor::default(),
            wait_factor: DEFAULT_WAIT_FACTOR,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Sets the multiple of the first-return latency used as the collection
    /// deadline.
    pub fn with_wait_factor(mut self, wait_factor: f64) -> Self {
        self.wait_factor = wait_factor.max(1.0);
        self
    }

    /// Bounds the wait for the first returned item (and thereby the whole
    /// collection window).
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Number of local threads used for the adaptation phase.
    pub fn with_adapt_threads(mut self, n_threads: usize) -> Self {
        self.adapt_pool = WorkerPoolExecutor::new(n_threads);
        self
    }
}

impl<I: Individual> Executor<I> for BrokeredExecutor<I> {
    fn name(&self) -> &'static str {
        "BrokeredExecutor"
    }

    fn adapt_range(&self, population: &mut Population<I>, range: Range<usize>) -> Result<()> {
        self.adapt_pool.adapt_range(population, range)
    }

    fn evaluate_range(
        &self,
        population: &mut Population<I>,
        range: Range<usize>,
        iteration: usize,
    ) -> Result<EvalOutcome<I>> {
        let mut outcome = EvalOutcome::empty();
        let expected = range.len();
        if expected == 0 {
            return Ok(outcome);
        }

        for mut candidate in population.drain_range(range) {
            candidate.set_assigned_iteration(iteration);
            candidate.set_processing_successful(false);
            self.port.push(candidate, iteration)?;
        }

        let started = Instant::now();
        let mut deadline: Option<Instant> = None;
        let mut seen_positions: HashSet<usize> = HashSet::new();
        let mut retained = Vec::with_capacity(expected);

        while outcome.completed < expected {
            let now = Instant::now();
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(now),
                None => self.max_wait.saturating_sub(now.duration_since(started)),
            };
            if remaining.is_zero() {
                break;
            }

            let Some(item) = self.port.pop_result(remaining) else {
                break;
            };

            if deadline.is_none() {
                // The first return calibrates the deadline for the rest of
                // the generation.
                let latency = started.elapsed();
                let window = Duration::from_secs_f64(
                    (latency.as_secs_f64() * self.wait_factor).max(latency.as_secs_f64()),
                );
                deadline = Some(started + window.min(self.max_wait));
            }

            let candidate = item.candidate;
            if candidate.assigned_iteration() != iteration {
                // A straggler from an earlier generation. Its fitness is
                // still a usable datum, so it goes to the old bucket.
                if candidate.processing_successful() {
                    outcome.old.push(candidate);
                }
                continue;
            }

            if !candidate.processing_successful() {
                outcome.errors.push(
                    paragen_err!(Evaluation: "worker returned an unsuccessfully processed candidate at position {}",
                        candidate.traits().population_position()),
                );
                continue;
            }

            let position = candidate.traits().population_position();
            if !seen_positions.insert(position) {
                debug!(position, "duplicate return discarded");
                continue;
            }

            outcome.completed += 1;
            retained.push(candidate);
        }

        if outcome.completed < expected {
            warn!(
                expected,
                returned = outcome.completed,
                old = outcome.old.len(),
                "brokered evaluation incomplete, lost items will be repaired"
            );
        }

        population.extend(retained);
        Ok(outcome)
    }
}
