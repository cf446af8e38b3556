use crate::candidate::Candidate;
use crate::individual::Individual;
use crate::objectives::Objective;

/// A bounded best-N collector keyed by primary fitness.
///
/// Entries are cloned on the way in and kept sorted best-first under the
/// configured objective. When the collector is over capacity the worst entry
/// is dropped; ties are broken by insertion order. The engine keeps one of
/// these for the best candidates ever seen and one for the per-iteration
/// bests.
#[derive(Clone, Debug)]
pub struct BestSet<I: Individual> {
    capacity: usize,
    objective: Objective,
    entries: Vec<Candidate<I>>,
}

impl<I: Individual> BestSet<I> {
    pub fn new(capacity: usize, objective: Objective) -> Self {
        BestSet {
            capacity: capacity.max(1),
            objective,
            entries: Vec::with_capacity(capacity.max(1)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a clone of `candidate`, dropping the worst entry when the
    /// collector exceeds its capacity. Returns whether the candidate was
    /// retained.
    pub fn add(&mut self, candidate: &Candidate<I>) -> bool {
        let key = candidate.min_only_fitness(&self.objective);

        // Insert after all entries that are at least as good, so that equal
        // keys keep their insertion order.
        let at = self
            .entries
            .partition_point(|entry| entry.min_only_fitness(&self.objective) <= key);

        if at >= self.capacity {
            return false;
        }

        self.entries.insert(at, candidate.clone());
        self.entries.truncate(self.capacity);
        true
    }

    /// Clears the collector and refills it from `candidates`.
    pub fn add_all_with_replace<'a>(
        &mut self,
        candidates: impl IntoIterator<Item = &'a Candidate<I>>,
    ) where
        I: 'a,
    {
        self.entries.clear();
        for candidate in candidates {
            self.add(candidate);
        }
    }

    /// The retained candidates, best first.
    pub fn snapshot(&self) -> &[Candidate<I>] {
        &self.entries
    }

    pub fn best(&self) -> Option<&Candidate<I>> {
        self.entries.first()
    }
}
