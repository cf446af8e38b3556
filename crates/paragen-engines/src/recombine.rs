use crate::Result;
use crate::base::ParChildBase;
use paragen_core::{Individual, paragen_bail, random_provider};
use tracing::warn;

/// How a child's source parent is chosen during recombination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RecombinationMethod {
    /// Library default, currently the same as [RecombinationMethod::Random].
    #[default]
    Default,
    /// Each child's source parent is chosen uniformly at random.
    Random,
    /// Parents are weighted by their rank, so better parents are duplicated
    /// more often.
    Value,
}

impl<I: Individual> ParChildBase<I> {
    /// Assigns a new value to each child according to the chosen
    /// recombination scheme, then re-tags children and positions.
    ///
    /// With probability `amalgamation_likelihood` (and at least two parents)
    /// a child is instead produced by crossing the best parent with a
    /// uniformly random other parent through the individual's own
    /// `amalgamate` capability.
    pub(crate) fn recombine(&mut self) -> Result<()> {
        let n_parents = self.population.n_parents();
        let first_iteration = self.first_iteration();

        // Value recombination has nothing reliable to weigh by in the first
        // iteration, because parents have never been scored. Fall back to
        // random duplication there.
        let value_mode = matches!(self.recombination, RecombinationMethod::Value);
        let value_usable = value_mode && n_parents > 1 && !first_iteration;
        if value_mode && n_parents > 1 && first_iteration {
            warn!("value recombination falls back to random duplication in generation 0");
        }

        let thresholds = if value_usable {
            value_thresholds(n_parents)
        } else {
            Vec::new()
        };

        let amalgamation = self.amalgamation_likelihood;
        let (parents, children) = self.population.as_mut_slice().split_at_mut(n_parents);

        for child in children.iter_mut() {
            if n_parents > 1 && random_provider::bool(amalgamation) {
                // Cross the best parent with a random other parent.
                let combiner = if n_parents > 2 {
                    random_provider::range(1..n_parents)
                } else {
                    1
                };
                let combined = parents[0].amalgamate(&parents[combiner]);

                child.load_from(&parents[0]);
                *child.individual_mut() = combined;
                child.traits_mut().set_parent_id(0);
                continue;
            }

            let parent_pos = if n_parents == 1 {
                0
            } else if value_usable {
                value_parent(&thresholds)?
            } else {
                random_provider::range(0..n_parents)
            };

            child.load_from(&parents[parent_pos]);
            child.traits_mut().set_parent_id(parent_pos);
        }

        self.population.mark_children();
        self.population.mark_positions();
        Ok(())
    }
}

/// Cumulative recombination likelihoods for value duplication. Parent `i`
/// receives weight `(1/(i+2)) / Σ 1/(j+2)`; the last cumulative entry is
/// forced to 1.0 to absorb rounding.
pub(crate) fn value_thresholds(n_parents: usize) -> Vec<f64> {
    let mut thresholds = vec![0.0; n_parents];

    let sum: f64 = (0..n_parents).map(|i| 1.0 / (i as f64 + 2.0)).sum();
    for i in 0..n_parents.saturating_sub(1) {
        thresholds[i] = (1.0 / (i as f64 + 2.0)) / sum;
        if i > 0 {
            thresholds[i] += thresholds[i - 1];
        }
    }
    thresholds[n_parents - 1] = 1.0;

    thresholds
}

/// Draws a parent index according to the cumulative thresholds.
fn value_parent(thresholds: &[f64]) -> Result<usize> {
    let draw = random_provider::random::<f64>();
    for (parent, threshold) in thresholds.iter().enumerate() {
        if draw < *threshold {
            return Ok(parent);
        }
    }
    // Unreachable: the last threshold is exactly 1.0 and draws lie in [0, 1).
    paragen_bail!(Population: "value recombination could not choose a parent for draw {}", draw)
}
