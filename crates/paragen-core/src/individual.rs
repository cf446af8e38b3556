use crate::Result;
use crate::objectives::Score;

/// The capability set the engine assumes of a candidate solution.
///
/// An individual carries its own parameters and knows how to mutate them and
/// how to score them. Everything else (fitness caching, dirty tracking,
/// parent/child bookkeeping) is handled by the engine through the
/// [Candidate](crate::Candidate) wrapper, so implementors only describe the
/// problem itself.
///
/// Brokered execution and checkpointing additionally require the individual
/// to be serde-serializable, because candidates travel to remote workers and
/// to checkpoint files in full.
pub trait Individual: Clone + Send + Sync + 'static {
    /// Mutates the parameters in place. Called once per child per generation.
    fn adapt(&mut self);

    /// Computes the fitness vector for the current parameters. Must return at
    /// least one criterion; criterion zero is the primary fitness.
    fn evaluate(&mut self) -> Result<Score>;

    /// The number of fitness criteria [Individual::evaluate] returns.
    /// Multi-objective individuals report values greater than one.
    fn n_criteria(&self) -> usize {
        1
    }

    /// Produces a new individual combining the parameters of `self` and
    /// `other`. Individuals without a crossover concept keep the default,
    /// which is a plain copy of `self`.
    fn amalgamate(&self, _other: &Self) -> Self {
        self.clone()
    }

    /// Advisory hint for how many internal refinement passes to run per
    /// evaluation. Opaque to the engine.
    fn set_processing_cycles(&mut self, _cycles: usize) {}
}
