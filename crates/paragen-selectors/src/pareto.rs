use crate::{
    MuCommaLambda, MuPlusLambda, SortScheme, a_dominates_b, ensure_clean, sort_range_by_primary,
};
use paragen_core::{Individual, Objective, ParagenResult, Population, random_provider};

/// Tags every candidate in `range` according to whether it is dominated by
/// another candidate in that range. Candidates enter with their tag reset to
/// "on the front"; dominated ones are cleared.
fn tag_pareto_front<I: Individual>(
    population: &mut Population<I>,
    range: std::ops::Range<usize>,
    objective: &Objective,
) {
    for index in range.clone() {
        population[index].traits_mut().reset_pareto_tag();
    }

    for i in range.clone() {
        for j in (i + 1)..range.end {
            // If we already know this candidate is *not* on the front we do
            // not have to run any tests against it.
            if !population[j].traits().is_on_pareto_front() {
                continue;
            }

            if a_dominates_b(&population[i], &population[j], objective) {
                population[j].traits_mut().set_not_on_pareto_front();
            }
            if a_dominates_b(&population[j], &population[i], objective) {
                population[i].traits_mut().set_not_on_pareto_front();
                break;
            }
        }
    }
}

/// Shared tail of both pareto schemes: bring front members to the head of
/// the population, then resolve the parent section.
///
/// If more candidates are on the front than there are parent slots, the
/// front is shuffled uniformly so the cut does not favor earlier positions.
/// If fewer, the remaining slots are filled with the best non-front
/// candidates by min-only fitness. Finally the parents are sorted by min-only
/// fitness so value recombination has a meaningful order to work with.
fn resolve_parent_section<I: Individual>(
    population: &mut Population<I>,
    objective: &Objective,
) {
    // Stable partition: front members first, relative order preserved.
    population
        .as_mut_slice()
        .sort_by_key(|candidate| !candidate.traits().is_on_pareto_front());

    let n_parents = population.n_parents();
    let n_on_front = population
        .iter()
        .filter(|candidate| candidate.traits().is_on_pareto_front())
        .count();

    if n_on_front > n_parents {
        random_provider::shuffle(&mut population.as_mut_slice()[..n_on_front]);
    } else if n_on_front < n_parents {
        let len = population.len();
        sort_range_by_primary(population, n_on_front..len, objective);
    }

    sort_range_by_primary(population, 0..n_parents, objective);
}

/// µ+λ pareto selection for multi-objective runs: parents are drawn from the
/// pareto front over the whole population, previous parents included.
///
/// Falls back to single-criterion µ+λ if the individuals expose only one
/// fitness criterion.
#[derive(Debug, Default)]
pub struct ParetoMuPlus;

impl<I: Individual> SortScheme<I> for ParetoMuPlus {
    fn name(&self) -> &'static str {
        "ParetoMuPlus"
    }

    fn sort(
        &self,
        population: &mut Population<I>,
        objective: &Objective,
        first_iteration: bool,
    ) -> ParagenResult<()> {
        if population
            .get(0)
            .map(|c| c.n_criteria() < 2)
            .unwrap_or(true)
        {
            return MuPlusLambda.sort(population, objective, first_iteration);
        }

        let len = population.len();
        ensure_clean(population, 0..len, <Self as SortScheme<I>>::name(self))?;
        tag_pareto_front(population, 0..len, objective);
        resolve_parent_section(population, objective);
        Ok(())
    }
}

/// µ,λ pareto selection: the previous generation's parents are pre-tagged as
/// off the front so they cannot survive; the front is computed over the
/// children only.
///
/// Falls back to single-criterion µ,λ for one fitness criterion and to µ+λ
/// pareto in the first iteration.
#[derive(Debug, Default)]
pub struct ParetoMuComma;

impl<I: Individual> SortScheme<I> for ParetoMuComma {
    fn name(&self) -> &'static str {
        "ParetoMuComma"
    }

    fn sort(
        &self,
        population: &mut Population<I>,
        objective: &Objective,
        first_iteration: bool,
    ) -> ParagenResult<()> {
        if population
            .get(0)
            .map(|c| c.n_criteria() < 2)
            .unwrap_or(true)
        {
            return MuCommaLambda.sort(population, objective, first_iteration);
        }
        if first_iteration {
            return ParetoMuPlus.sort(population, objective, first_iteration);
        }

        let n_parents = population.n_parents();
        let len = population.len();
        ensure_clean(population, n_parents..len, <Self as SortScheme<I>>::name(self))?;

        tag_pareto_front(population, n_parents..len, objective);
        for index in 0..n_parents {
            population[index].traits_mut().set_not_on_pareto_front();
        }

        resolve_parent_section(population, objective);
        Ok(())
    }
}
