use crate::{SortScheme, ensure_clean, sort_range_by_primary};
use paragen_core::{Individual, Objective, ParagenResult, Population};

/// µ+λ selection: the whole population is sorted by primary fitness and the
/// µ best candidates become the parents, whether they were parents or
/// children before. The quality of the population can only increase, but the
/// optimization stalls more easily than in µ,λ mode.
#[derive(Debug, Default)]
pub struct MuPlusLambda;

impl<I: Individual> SortScheme<I> for MuPlusLambda {
    fn name(&self) -> &'static str {
        "MuPlusLambda"
    }

    fn sort(
        &self,
        population: &mut Population<I>,
        objective: &Objective,
        _first_iteration: bool,
    ) -> ParagenResult<()> {
        let len = population.len();
        ensure_clean(population, 0..len, <Self as SortScheme<I>>::name(self))?;
        sort_range_by_primary(population, 0..len, objective);
        Ok(())
    }
}
