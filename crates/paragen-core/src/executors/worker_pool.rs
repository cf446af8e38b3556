use super::{EvalOutcome, Executor, resolve_thread_count};
use crate::domain::thread_pool::ThreadPool;
use crate::individual::Individual;
use crate::population::Population;
use paragen_error::{ParagenResult, paragen_err};
use std::fmt::Debug;
use std::ops::Range;
use std::sync::Arc;

/// Runs adaptations and evaluations on a fixed-size thread pool.
///
/// Each candidate is a self-contained task: ownership moves into the job and
/// comes back with the result, so evaluations never share mutable state. The
/// call blocks until the whole range has finished. Task failures are captured
/// per candidate and aggregated into the outcome; the failed candidates are
/// removed so the repair step can refill the population. Never produces old
/// items.
#[derive(Clone)]
pub struct WorkerPoolExecutor {
    pool: Arc<ThreadPool>,
}

impl WorkerPoolExecutor {
    /// Creates an executor with `n_threads` workers; zero means one worker
    /// per available hardware thread.
    pub fn new(n_threads: usize) -> Self {
        Self {
            pool: Arc::new(ThreadPool::new(resolve_thread_count(n_threads))),
        }
    }

    pub fn with_thread_pool(pool: Arc<ThreadPool>) -> Self {
        Self { pool }
    }

    pub fn num_workers(&self) -> usize {
        self.pool.num_workers()
    }
}

impl Default for WorkerPoolExecutor {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Debug for WorkerPoolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPoolExecutor")
            .field("num_threads", &self.pool.num_workers())
            .finish()
    }
}

impl<I: Individual> Executor<I> for WorkerPoolExecutor {
    fn name(&self) -> &'static str {
        "WorkerPoolExecutor"
    }

    fn adapt_range(
        &self,
        population: &mut Population<I>,
        range: Range<usize>,
    ) -> ParagenResult<()> {
        let start = range.start;
        let drained = population.drain_range(range);

        let pending = drained
            .into_iter()
            .map(|mut candidate| {
                self.pool.submit_with_result(move || {
                    candidate.adapt();
                    candidate
                })
            })
            .collect::<Vec<_>>();

        let mut errors = Vec::new();
        let mut adapted = Vec::with_capacity(pending.len());
        for result in pending {
            match result.try_result() {
                Some(candidate) => adapted.push(candidate),
                None => errors.push(
                    paragen_err!(ThreadPool: "adaptation task died before returning its candidate"),
                ),
            }
        }

        population.insert_all(start, adapted);

        match paragen_error::ParagenError::aggregate(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn evaluate_range(
        &self,
        population: &mut Population<I>,
        range: Range<usize>,
        iteration: usize,
    ) -> ParagenResult<EvalOutcome<I>> {
        let start = range.start;
        let drained = population.drain_range(range);

        let pending = drained
            .into_iter()
            .map(|mut candidate| {
                candidate.set_assigned_iteration(iteration);
                self.pool.submit_with_result(move || {
                    let result = candidate.evaluate();
                    (candidate, result)
                })
            })
            .collect::<Vec<_>>();

        let mut outcome = EvalOutcome::empty();
        let mut survivors = Vec::with_capacity(pending.len());
        for (offset, pending) in pending.into_iter().enumerate() {
            match pending.try_result() {
                Some((candidate, Ok(()))) => {
                    outcome.completed += 1;
                    survivors.push(candidate);
                }
                Some((_, Err(e))) => {
                    outcome.errors.push(e.with_context(format!(
                        "evaluating candidate at position {}",
                        start + offset
                    )));
                }
                None => {
                    outcome.errors.push(
                        paragen_err!(ThreadPool: "evaluation task at position {} died before returning", start + offset),
                    );
                }
            }
        }

        population.insert_all(start, survivors);
        Ok(outcome)
    }
}
