mod serial;
mod worker_pool;

pub use serial::SerialExecutor;
pub use worker_pool::WorkerPoolExecutor;

use crate::individual::Individual;
use crate::{candidate::Candidate, population::Population};
use paragen_error::{ParagenError, ParagenResult};
use std::ops::Range;

/// What came back from dispatching a range of evaluations.
///
/// `completed` counts the candidates of the current iteration whose fitness
/// was written; the population itself holds the survivors. `old` holds
/// candidates that completed *late* from earlier iterations (only the
/// brokered backend produces them). `errors` aggregates per-task failures;
/// the driver reports them at generation end and continues.
pub struct EvalOutcome<I: Individual> {
    pub completed: usize,
    pub old: Vec<Candidate<I>>,
    pub errors: Vec<ParagenError>,
}

impl<I: Individual> EvalOutcome<I> {
    pub fn empty() -> Self {
        EvalOutcome {
            completed: 0,
            old: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Runs a batch of adaptations or evaluations under a chosen backend.
///
/// The three backends (serial, worker pool, brokered) share this contract.
/// `evaluate_range` may shrink the population: candidates that neither
/// completed nor are recoverable are removed, and the caller is responsible
/// for refilling to nominal size afterwards.
pub trait Executor<I: Individual>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs each candidate's adaptation over `range`. Dirty flags are set as
    /// a side effect of parameter mutation.
    fn adapt_range(
        &self,
        population: &mut Population<I>,
        range: Range<usize>,
    ) -> ParagenResult<()>;

    /// Triggers fitness computation for every candidate in `range`, stamping
    /// them with `iteration` at dispatch.
    fn evaluate_range(
        &self,
        population: &mut Population<I>,
        range: Range<usize>,
        iteration: usize,
    ) -> ParagenResult<EvalOutcome<I>>;
}

/// Resolves a configured thread count, where zero means one thread per
/// available hardware thread.
pub fn resolve_thread_count(configured: usize) -> usize {
    if configured > 0 {
        configured
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
