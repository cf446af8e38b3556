pub mod mu_comma;
pub mod mu_plus;
pub mod mu_retain;
pub mod pareto;

pub use mu_comma::MuCommaLambda;
pub use mu_plus::MuPlusLambda;
pub use mu_retain::MuOneRetain;
pub use pareto::{ParetoMuComma, ParetoMuPlus};

use paragen_core::{Candidate, Individual, Objective, ParagenResult, Population, paragen_err};
use std::ops::Range;

/// Reorders a population so that the first µ candidates are the parents of
/// the next generation.
///
/// Every discipline verifies that the candidates it reads are clean before
/// comparing fitness values; observing a dirty candidate at selection time is
/// a population invariant violation, never silently tolerated.
pub trait SortScheme<I: Individual>: Send + Sync {
    fn name(&self) -> &'static str;

    fn sort(
        &self,
        population: &mut Population<I>,
        objective: &Objective,
        first_iteration: bool,
    ) -> ParagenResult<()>;
}

/// The selection discipline names accepted by the engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortingMode {
    #[default]
    MuPlusLambda,
    MuCommaLambda,
    MuOneRetain,
    MuPlusLambdaPareto,
    MuCommaLambdaPareto,
}

impl SortingMode {
    pub fn scheme<I: Individual>(&self) -> Box<dyn SortScheme<I>> {
        match self {
            SortingMode::MuPlusLambda => Box::new(MuPlusLambda),
            SortingMode::MuCommaLambda => Box::new(MuCommaLambda),
            SortingMode::MuOneRetain => Box::new(MuOneRetain),
            SortingMode::MuPlusLambdaPareto => Box::new(ParetoMuPlus),
            SortingMode::MuCommaLambdaPareto => Box::new(ParetoMuComma),
        }
    }

    pub fn is_pareto(&self) -> bool {
        matches!(
            self,
            SortingMode::MuPlusLambdaPareto | SortingMode::MuCommaLambdaPareto
        )
    }

    /// Whether the mode requires at least as many children as parents.
    pub fn requires_full_child_set(&self) -> bool {
        matches!(
            self,
            SortingMode::MuCommaLambda | SortingMode::MuOneRetain | SortingMode::MuCommaLambdaPareto
        )
    }
}

/// Fails with a population error if any candidate in `range` is dirty.
/// Exposed for engines that implement their own acceptance rules.
pub fn ensure_clean<I: Individual>(
    population: &Population<I>,
    range: Range<usize>,
    scheme: &str,
) -> ParagenResult<()> {
    if let Some(position) = population.first_dirty_in(range) {
        return Err(
            paragen_err!(Population: "{}: candidate at position {} is dirty at selection time", scheme, position),
        );
    }
    Ok(())
}

/// Whether `a` dominates `b`: not worse in every fitness criterion, compared
/// in smaller-is-better space.
pub(crate) fn a_dominates_b<I: Individual>(
    a: &Candidate<I>,
    b: &Candidate<I>,
    objective: &Objective,
) -> bool {
    let n = a.n_criteria().min(b.n_criteria());
    for criterion in 0..n {
        if a.transformed_fitness(criterion, objective) > b.transformed_fitness(criterion, objective)
        {
            return false;
        }
    }
    true
}

/// Sorts `range` ascending by the min-only scalarization of the primary
/// fitness, i.e. best first under the configured direction.
pub fn sort_range_by_primary<I: Individual>(
    population: &mut Population<I>,
    range: Range<usize>,
    objective: &Objective,
) {
    let objective = objective.clone();
    population.sort_range_by(range, move |a, b| {
        a.min_only_fitness(&objective)
            .partial_cmp(&b.min_only_fitness(&objective))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
