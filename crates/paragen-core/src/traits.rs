use serde::{Deserialize, Serialize};

/// Per-candidate bookkeeping for the parent-child algorithm.
///
/// Invariants maintained by the engine:
/// * after selection, the first µ candidates in population order are parents
///   and carry `is_parent == true`, the rest carry `is_parent == false`
/// * `parent_counter` is strictly positive iff `is_parent` is true
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    is_parent: bool,
    /// Number of consecutive generations this candidate has been a parent.
    /// Zero means child.
    parent_counter: usize,
    population_position: usize,
    /// The parent a child was derived from during recombination, if any.
    parent_id: Option<usize>,
    /// Multi-objective tag, rewritten by every pareto selection pass.
    on_pareto_front: bool,
}

impl PersonalityTraits {
    pub fn is_parent(&self) -> bool {
        self.is_parent
    }

    pub fn parent_counter(&self) -> usize {
        self.parent_counter
    }

    pub fn population_position(&self) -> usize {
        self.population_position
    }

    pub fn parent_id(&self) -> Option<usize> {
        self.parent_id
    }

    pub fn is_on_pareto_front(&self) -> bool {
        self.on_pareto_front
    }

    /// Marks the candidate as a parent, extending its streak.
    pub fn set_is_parent(&mut self) {
        self.is_parent = true;
        self.parent_counter += 1;
    }

    /// Marks the candidate as a child, resetting the parent streak.
    pub fn set_is_child(&mut self) {
        self.is_parent = false;
        self.parent_counter = 0;
    }

    pub fn set_population_position(&mut self, position: usize) {
        self.population_position = position;
    }

    pub fn set_parent_id(&mut self, parent: usize) {
        self.parent_id = Some(parent);
    }

    pub fn clear_parent_id(&mut self) {
        self.parent_id = None;
    }

    pub fn reset_pareto_tag(&mut self) {
        self.on_pareto_front = true;
    }

    pub fn set_not_on_pareto_front(&mut self) {
        self.on_pareto_front = false;
    }
}
