use crate::candidate::Candidate;
use crate::individual::Individual;
use paragen_error::{ParagenResult, paragen_bail};
use std::ops::{Index, IndexMut, Range};

/// The ordered, owning collection of [Candidate]s being evolved.
///
/// A population carries two distinguished sizes next to its actual length:
/// the *nominal size* µ+λ it is expected to have at the start of every
/// generation, and the *parent count* µ. The actual length may drop below the
/// nominal size while work items are in flight; the repair step restores it
/// before selection.
#[derive(Clone, Default, Debug)]
pub struct Population<I: Individual> {
    candidates: Vec<Candidate<I>>,
    nominal_size: usize,
    n_parents: usize,
}

impl<I: Individual> Population<I> {
    pub fn new(candidates: Vec<Candidate<I>>) -> Self {
        Population {
            candidates,
            nominal_size: 0,
            n_parents: 0,
        }
    }

    /// Sets the nominal population size µ+λ and the parent count µ.
    pub fn set_sizes(&mut self, nominal_size: usize, n_parents: usize) {
        self.nominal_size = nominal_size;
        self.n_parents = n_parents;
    }

    pub fn nominal_size(&self) -> usize {
        self.nominal_size
    }

    pub fn n_parents(&self) -> usize {
        self.n_parents
    }

    pub fn n_children(&self) -> usize {
        self.nominal_size.saturating_sub(self.n_parents)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate<I>> {
        self.candidates.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Candidate<I>> {
        self.candidates.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate<I>> {
        self.candidates.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Candidate<I>> {
        self.candidates.iter_mut()
    }

    pub fn as_slice(&self) -> &[Candidate<I>] {
        &self.candidates
    }

    pub fn as_mut_slice(&mut self) -> &mut [Candidate<I>] {
        &mut self.candidates
    }

    pub fn push(&mut self, candidate: impl Into<Candidate<I>>) {
        self.candidates.push(candidate.into());
    }

    pub fn extend(&mut self, candidates: impl IntoIterator<Item = Candidate<I>>) {
        self.candidates.extend(candidates);
    }

    /// Removes and returns the candidates in `range`, preserving order.
    pub fn drain_range(&mut self, range: Range<usize>) -> Vec<Candidate<I>> {
        self.candidates.drain(range).collect()
    }

    /// Re-inserts candidates at `at`, preserving their order.
    pub fn insert_all(&mut self, at: usize, candidates: Vec<Candidate<I>>) {
        self.candidates.splice(at..at, candidates);
    }

    /// Discards everything beyond the first `len` candidates.
    pub fn truncate(&mut self, len: usize) {
        self.candidates.truncate(len);
    }

    /// Lets parents know they are parents.
    pub fn mark_parents(&mut self) {
        let n = self.n_parents.min(self.candidates.len());
        for candidate in self.candidates[..n].iter_mut() {
            candidate.traits_mut().set_is_parent();
        }
    }

    /// Lets children know they are children.
    pub fn mark_children(&mut self) {
        let n = self.n_parents.min(self.candidates.len());
        for candidate in self.candidates[n..].iter_mut() {
            candidate.traits_mut().set_is_child();
        }
    }

    /// Tells every candidate about its position in the population.
    pub fn mark_positions(&mut self) {
        for (pos, candidate) in self.candidates.iter_mut().enumerate() {
            candidate.traits_mut().set_population_position(pos);
        }
    }

    /// Stably moves candidates flagged as parents to the front.
    pub fn partition_parents_first(&mut self) {
        self.candidates
            .sort_by_key(|candidate| !candidate.traits().is_parent());
    }

    /// Appends clones of the last candidate until the population reaches its
    /// nominal size. Fails on an empty population.
    pub fn fill_to_nominal(&mut self) -> ParagenResult<usize> {
        if self.candidates.is_empty() {
            paragen_bail!(Population: "cannot fill an empty population");
        }

        let mut appended = 0;
        while self.candidates.len() < self.nominal_size {
            let clone = self.candidates[self.candidates.len() - 1].clone();
            self.candidates.push(clone);
            appended += 1;
        }
        Ok(appended)
    }

    /// Swaps the `len`-sized ranges starting at `first` and `second`. The
    /// ranges must not overlap.
    pub fn swap_ranges(&mut self, first: usize, second: usize, len: usize) {
        let (lo, hi) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        debug_assert!(lo + len <= hi, "swap_ranges called with overlapping ranges");

        let (head, tail) = self.candidates.split_at_mut(hi);
        head[lo..lo + len].swap_with_slice(&mut tail[..len]);
    }

    /// Sorts the subrange `range` in place with the given comparator, leaving
    /// the rest of the population untouched.
    pub fn sort_range_by<F>(&mut self, range: Range<usize>, cmp: F)
    where
        F: FnMut(&Candidate<I>, &Candidate<I>) -> std::cmp::Ordering,
    {
        self.candidates[range].sort_by(cmp);
    }

    /// The position of the first dirty candidate in `range`, if any.
    pub fn first_dirty_in(&self, range: Range<usize>) -> Option<usize> {
        self.candidates[range.clone()]
            .iter()
            .position(|c| c.is_dirty())
            .map(|offset| range.start + offset)
    }
}

impl<I: Individual> Index<usize> for Population<I> {
    type Output = Candidate<I>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.candidates[index]
    }
}

impl<I: Individual> IndexMut<usize> for Population<I> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.candidates[index]
    }
}

impl<I: Individual> IntoIterator for Population<I> {
    type Item = Candidate<I>;
    type IntoIter = std::vec::IntoIter<Candidate<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<I: Individual> From<Vec<Candidate<I>>> for Population<I> {
    fn from(candidates: Vec<Candidate<I>>) -> Self {
        Population::new(candidates)
    }
}

impl<I: Individual> FromIterator<Candidate<I>> for Population<I> {
    fn from_iter<T: IntoIterator<Item = Candidate<I>>>(iter: T) -> Self {
        Population::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{BenchmarkFunction, FunctionIndividual};

    fn population(n: usize) -> Population<FunctionIndividual> {
        let candidates = (0..n)
            .map(|i| {
                Candidate::new(FunctionIndividual::with_params(
                    vec![i as f64],
                    -10.0..10.0,
                    1.0,
                    BenchmarkFunction::Sphere,
                ))
            })
            .collect();
        let mut population = Population::new(candidates);
        population.set_sizes(n, 2);
        population
    }

    #[test]
    fn test_mark_parents_and_children() {
        let mut population = population(5);
        population.mark_parents();
        population.mark_children();

        for (i, candidate) in population.iter().enumerate() {
            assert_eq!(candidate.traits().is_parent(), i < 2);
        }
    }

    #[test]
    fn test_partition_parents_first_is_stable() {
        let mut population = population(6);
        // Flag positions 2 and 4 as parents, then partition.
        population[2].traits_mut().set_is_parent();
        population[4].traits_mut().set_is_parent();
        population.partition_parents_first();

        assert_eq!(population[0].individual().params(), &[2.0]);
        assert_eq!(population[1].individual().params(), &[4.0]);
        // Children keep their relative order.
        assert_eq!(population[2].individual().params(), &[0.0]);
        assert_eq!(population[3].individual().params(), &[1.0]);
        assert_eq!(population[4].individual().params(), &[3.0]);
        assert_eq!(population[5].individual().params(), &[5.0]);
    }

    #[test]
    fn test_fill_to_nominal_clones_last() {
        let mut population = population(5);
        population.truncate(3);
        let appended = population.fill_to_nominal().unwrap();

        assert_eq!(appended, 2);
        assert_eq!(population.len(), 5);
        assert_eq!(population[3].individual().params(), &[2.0]);
        assert_eq!(population[4].individual().params(), &[2.0]);
    }

    #[test]
    fn test_fill_empty_population_fails() {
        let mut population = population(3);
        population.truncate(0);
        assert!(population.fill_to_nominal().is_err());
    }

    #[test]
    fn test_swap_ranges() {
        let mut population = population(6);
        population.swap_ranges(0, 2, 2);

        assert_eq!(population[0].individual().params(), &[2.0]);
        assert_eq!(population[1].individual().params(), &[3.0]);
        assert_eq!(population[2].individual().params(), &[0.0]);
        assert_eq!(population[3].individual().params(), &[1.0]);
    }

    #[test]
    fn test_drain_and_insert_roundtrip() {
        let mut population = population(5);
        let drained = population.drain_range(2..5);
        assert_eq!(population.len(), 2);
        assert_eq!(drained.len(), 3);

        population.insert_all(2, drained);
        assert_eq!(population.len(), 5);
        assert_eq!(population[4].individual().params(), &[4.0]);
    }
}
