use paragen_core::Objective;
use std::time::Instant;

/// A termination condition checked after every generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    /// Stop after this many generations.
    Iterations(usize),
    /// Stop once this much wall-clock time has passed.
    Minutes(f64),
    /// Stop once the best primary fitness is at least as good as this value.
    Target(f64),
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    IterationLimit,
    TimeLimit,
    TargetReached,
    Halted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            StopReason::IterationLimit => "iteration cap reached",
            StopReason::TimeLimit => "wall-clock cap reached",
            StopReason::TargetReached => "quality target hit",
            StopReason::Halted => "halted externally",
        };
        f.write_str(reason)
    }
}

/// Returns the first limit hit after a generation, if any. `iterations` is
/// the number of completed generations, `best_primary` the raw primary
/// fitness of the current best.
pub(crate) fn first_hit(
    limits: &[Limit],
    objective: &Objective,
    iterations: usize,
    best_primary: f64,
    started: Instant,
) -> Option<StopReason> {
    for limit in limits {
        match limit {
            Limit::Iterations(cap) => {
                if iterations >= *cap {
                    return Some(StopReason::IterationLimit);
                }
            }
            Limit::Minutes(cap) => {
                if started.elapsed().as_secs_f64() >= cap * 60.0 {
                    return Some(StopReason::TimeLimit);
                }
            }
            Limit::Target(target) => {
                // Reached when the best is no worse than the target.
                if !objective.is_better(*target, best_primary) {
                    return Some(StopReason::TargetReached);
                }
            }
        }
    }
    None
}
