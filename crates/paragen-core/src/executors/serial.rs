use super::{EvalOutcome, Executor};
use crate::individual::Individual;
use crate::population::Population;
use paragen_error::ParagenResult;
use std::ops::Range;

/// Runs every adaptation and evaluation inline in the caller's thread.
/// Never produces old items.
#[derive(Debug, Clone, Default)]
pub struct SerialExecutor;

impl SerialExecutor {
    pub fn new() -> Self {
        SerialExecutor
    }
}

impl<I: Individual> Executor<I> for SerialExecutor {
    fn name(&self) -> &'static str {
        "SerialExecutor"
    }

    fn adapt_range(
        &self,
        population: &mut Population<I>,
        range: Range<usize>,
    ) -> ParagenResult<()> {
        for index in range {
            if let Some(candidate) = population.get_mut(index) {
                candidate.adapt();
            }
        }
        Ok(())
    }

    fn evaluate_range(
        &self,
        population: &mut Population<I>,
        range: Range<usize>,
        iteration: usize,
    ) -> ParagenResult<EvalOutcome<I>> {
        let mut outcome = EvalOutcome::empty();
        let mut failed = Vec::new();

        for index in range.clone() {
            let Some(candidate) = population.get_mut(index) else {
                continue;
            };
            candidate.set_assigned_iteration(iteration);

            match candidate.evaluate() {
                Ok(()) => outcome.completed += 1,
                Err(e) => {
                    failed.push(index);
                    outcome
                        .errors
                        .push(e.with_context(format!("evaluating candidate at position {}", index)));
                }
            }
        }

        // Remove failures back to front so earlier indices stay valid. The
        // caller refills to nominal size during repair.
        for index in failed.into_iter().rev() {
            population.drain_range(index..index + 1);
        }

        Ok(outcome)
    }
}
