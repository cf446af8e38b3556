use crate::{MuPlusLambda, SortScheme, ensure_clean, sort_range_by_primary};
use paragen_core::{Individual, Objective, ParagenResult, Population};

/// µ,λ selection: new parents are chosen from the children only, and the
/// previous generation's parents are discarded. The population quality may
/// decrease occasionally, but the optimization is less likely to stall.
///
/// In the first iteration there are no prior parents to discard, so the
/// scheme degrades to µ+λ.
#[derive(Debug, Default)]
pub struct MuCommaLambda;

impl<I: Individual> SortScheme<I> for MuCommaLambda {
    fn name(&self) -> &'static str {
        "MuCommaLambda"
    }

    fn sort(
        &self,
        population: &mut Population<I>,
        objective: &Objective,
        first_iteration: bool,
    ) -> ParagenResult<()> {
        if first_iteration {
            return MuPlusLambda.sort(population, objective, first_iteration);
        }

        let n_parents = population.n_parents();
        let len = population.len();
        ensure_clean(population, n_parents..len, <Self as SortScheme<I>>::name(self))?;

        // Sort the children only, then swap the best µ children into the
        // parent positions.
        sort_range_by_primary(population, n_parents..len, objective);
        population.swap_ranges(0, n_parents, n_parents);
        Ok(())
    }
}
