use crate::{MuPlusLambda, SortScheme, ensure_clean, sort_range_by_primary};
use paragen_core::{Individual, Objective, ParagenResult, Population};

/// µ,1-retain selection: a hybrid between µ+λ and µ,λ. If a better child was
/// found than the best parent of the last generation, all former parents are
/// replaced. Otherwise the best parent stays in place and the remaining
/// parent positions take the best µ−1 children.
///
/// Falls back to µ+λ if only one parent is available or in the first
/// iteration.
#[derive(Debug, Default)]
pub struct MuOneRetain;

impl<I: Individual> SortScheme<I> for MuOneRetain {
    fn name(&self) -> &'static str {
        "MuOneRetain"
    }

    fn sort(
        &self,
        population: &mut Population<I>,
        objective: &Objective,
        first_iteration: bool,
    ) -> ParagenResult<()> {
        let n_parents = population.n_parents();
        if n_parents == 1 || first_iteration {
            return MuPlusLambda.sort(population, objective, first_iteration);
        }

        let len = population.len();
        ensure_clean(population, 0..len, <Self as SortScheme<I>>::name(self))?;
        sort_range_by_primary(population, n_parents..len, objective);

        let best_child = population[n_parents].fitness(0)?;
        let best_parent = population[0].fitness(0)?;

        if objective.is_better(best_child, best_parent) {
            // A better child was found. Overwrite all parents.
            population.swap_ranges(0, n_parents, n_parents);
        } else {
            // Leave the best parent in place.
            population.swap_ranges(1, n_parents, n_parents - 1);
        }
        Ok(())
    }
}
