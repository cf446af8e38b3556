use crate::individual::Individual;
use crate::objectives::{Objective, Score, Scored};
use crate::traits::PersonalityTraits;
use paragen_error::{ParagenResult, paragen_bail, paragen_err};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The engine-owned wrapper around a user [Individual].
///
/// A [Candidate] adds everything the parent-child algorithm needs to know
/// about an individual beyond its parameters: the cached fitness vector, the
/// dirty flag, the [PersonalityTraits] record, the generation it was
/// dispatched in and whether its last evaluation succeeded.
///
/// The dirty flag is set whenever the parameters change ([Candidate::adapt],
/// [Candidate::individual_mut]) and cleared by [Candidate::evaluate]. No
/// operation that depends on fitness may observe a dirty candidate; the
/// accessors enforce this by returning a `Population` error.
#[derive(Clone, Serialize, Deserialize)]
pub struct Candidate<I> {
    individual: I,
    score: Option<Score>,
    dirty: bool,
    traits: PersonalityTraits,
    assigned_iteration: usize,
    processing_successful: bool,
}

impl<I: Individual> Candidate<I> {
    pub fn new(individual: I) -> Self {
        Candidate {
            individual,
            score: None,
            dirty: true,
            traits: PersonalityTraits::default(),
            assigned_iteration: 0,
            processing_successful: false,
        }
    }

    pub fn individual(&self) -> &I {
        &self.individual
    }

    /// Mutable access to the parameters. Marks the candidate dirty, since the
    /// cached fitness can no longer be trusted.
    pub fn individual_mut(&mut self) -> &mut I {
        self.dirty = true;
        &mut self.individual
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn traits(&self) -> &PersonalityTraits {
        &self.traits
    }

    pub fn traits_mut(&mut self) -> &mut PersonalityTraits {
        &mut self.traits
    }

    pub fn assigned_iteration(&self) -> usize {
        self.assigned_iteration
    }

    pub fn set_assigned_iteration(&mut self, iteration: usize) {
        self.assigned_iteration = iteration;
    }

    pub fn processing_successful(&self) -> bool {
        self.processing_successful
    }

    pub fn set_processing_successful(&mut self, successful: bool) {
        self.processing_successful = successful;
    }

    /// Mutates the parameters through the individual's own adaptation and
    /// marks the candidate dirty.
    pub fn adapt(&mut self) {
        self.individual.adapt();
        self.dirty = true;
    }

    /// Runs the fitness function, caches the resulting score and clears the
    /// dirty flag. A fitness vector must hold at least one finite criterion.
    pub fn evaluate(&mut self) -> ParagenResult<()> {
        let score = self.individual.evaluate()?;
        if score.is_empty() {
            self.processing_successful = false;
            paragen_bail!(Evaluation: "fitness function returned an empty score");
        }
        if score.as_ref().iter().any(|v| v.is_nan()) {
            self.processing_successful = false;
            paragen_bail!(Evaluation: "fitness function returned NaN");
        }

        self.score = Some(score);
        self.dirty = false;
        self.processing_successful = true;
        Ok(())
    }

    /// The cached fitness for the given criterion. Fails if the candidate is
    /// dirty, because that would silently serve a stale value.
    pub fn fitness(&self, criterion: usize) -> ParagenResult<f64> {
        if self.dirty {
            paragen_bail!(Population: "fitness requested from a dirty candidate");
        }
        self.score
            .as_ref()
            .and_then(|s| s.get(criterion))
            .ok_or_else(|| paragen_err!(Population: "no fitness cached for criterion {}", criterion))
    }

    /// The cached primary fitness.
    pub fn primary_fitness(&self) -> ParagenResult<f64> {
        self.fitness(0)
    }

    /// Smaller-is-better scalarization of the primary fitness. Dirty or
    /// unscored candidates sort last; callers that must not tolerate them
    /// check cleanliness beforehand.
    pub fn min_only_fitness(&self, objective: &Objective) -> f64 {
        if self.dirty {
            return f64::INFINITY;
        }
        self.score
            .as_ref()
            .map(|s| objective.min_only(s))
            .unwrap_or(f64::INFINITY)
    }

    /// Smaller-is-better view of an arbitrary criterion, used by domination
    /// checks.
    pub fn transformed_fitness(&self, criterion: usize, objective: &Objective) -> f64 {
        if self.dirty {
            return f64::INFINITY;
        }
        self.score
            .as_ref()
            .map(|s| objective.transformed(s, criterion))
            .unwrap_or(f64::INFINITY)
    }

    pub fn n_criteria(&self) -> usize {
        self.individual.n_criteria()
    }

    /// Deep in-place overwrite from another candidate: parameters, score,
    /// dirty flag and traits all follow the source. Both candidates keep
    /// independent lifetimes afterwards.
    pub fn load_from(&mut self, other: &Candidate<I>) {
        self.individual = other.individual.clone();
        self.score = other.score.clone();
        self.dirty = other.dirty;
        self.traits = other.traits;
        self.assigned_iteration = other.assigned_iteration;
        self.processing_successful = other.processing_successful;
    }

    pub fn amalgamate(&self, other: &Candidate<I>) -> I {
        self.individual.amalgamate(&other.individual)
    }

    pub fn set_processing_cycles(&mut self, cycles: usize) {
        self.individual.set_processing_cycles(cycles);
    }
}

impl<I: Individual> Scored for Candidate<I> {
    fn score(&self) -> Option<&Score> {
        if self.dirty { None } else { self.score.as_ref() }
    }
}

impl<I: Individual> From<I> for Candidate<I> {
    fn from(individual: I) -> Self {
        Candidate::new(individual)
    }
}

impl<I: Individual + Debug> Debug for Candidate<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("individual", &self.individual)
            .field("score", &self.score)
            .field("dirty", &self.dirty)
            .field("traits", &self.traits)
            .field("assigned_iteration", &self.assigned_iteration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{BenchmarkFunction, FunctionIndividual};
    use crate::objectives::Optimize;

    fn sphere(params: Vec<f64>) -> Candidate<FunctionIndividual> {
        Candidate::new(FunctionIndividual::with_params(
            params,
            -10.0..10.0,
            1.0,
            BenchmarkFunction::Sphere,
        ))
    }

    #[test]
    fn test_new_candidate_is_dirty() {
        let candidate = sphere(vec![1.0, 2.0]);
        assert!(candidate.is_dirty());
        assert!(candidate.fitness(0).is_err());
    }

    #[test]
    fn test_evaluate_clears_dirty() {
        let mut candidate = sphere(vec![3.0, 4.0]);
        candidate.evaluate().unwrap();

        assert!(!candidate.is_dirty());
        assert!(candidate.processing_successful());
        assert_eq!(candidate.primary_fitness().unwrap(), 25.0);
    }

    #[test]
    fn test_adapt_marks_dirty() {
        let mut candidate = sphere(vec![0.0, 0.0]);
        candidate.evaluate().unwrap();
        candidate.adapt();

        assert!(candidate.is_dirty());
        assert!(candidate.primary_fitness().is_err());
    }

    #[test]
    fn test_min_only_fitness_respects_direction() {
        let mut candidate = sphere(vec![3.0, 4.0]);
        candidate.evaluate().unwrap();

        let min = Objective::Single(Optimize::Minimize);
        let max = Objective::Single(Optimize::Maximize);
        assert_eq!(candidate.min_only_fitness(&min), 25.0);
        assert_eq!(candidate.min_only_fitness(&max), -25.0);
    }

    #[test]
    fn test_clone_then_load_from_is_identity() {
        let mut original = sphere(vec![1.0, -2.0]);
        original.evaluate().unwrap();
        original.traits_mut().set_is_parent();
        original.set_assigned_iteration(7);

        let cloned = original.clone();
        let mut target = sphere(vec![9.0, 9.0]);
        target.load_from(&cloned);

        assert_eq!(target.individual(), original.individual());
        assert_eq!(
            target.primary_fitness().unwrap(),
            original.primary_fitness().unwrap()
        );
        assert_eq!(target.traits(), original.traits());
        assert_eq!(target.assigned_iteration(), 7);
        assert_eq!(target.is_dirty(), original.is_dirty());
    }
}
