use super::Score;

/// The optimization direction of a single fitness criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Optimize {
    Minimize,
    Maximize,
}

impl Optimize {
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            Optimize::Minimize => a < b,
            Optimize::Maximize => a > b,
        }
    }

    /// Maps a raw fitness value into "smaller is better" space.
    pub fn transformed(&self, value: f64) -> f64 {
        match self {
            Optimize::Minimize => value,
            Optimize::Maximize => -value,
        }
    }
}

/// The objective of a run: one optimization direction per fitness criterion.
/// Single-objective runs carry one direction, multi-objective runs carry one
/// per criterion.
#[derive(Clone, Debug, PartialEq)]
pub enum Objective {
    Single(Optimize),
    Multi(Vec<Optimize>),
}

impl Objective {
    pub fn n_criteria(&self) -> usize {
        match self {
            Objective::Single(_) => 1,
            Objective::Multi(opts) => opts.len(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Objective::Multi(_))
    }

    /// The direction of the given criterion. For [Objective::Single] every
    /// criterion shares the one direction.
    pub fn direction(&self, criterion: usize) -> Optimize {
        match self {
            Objective::Single(opt) => *opt,
            Objective::Multi(opts) => opts
                .get(criterion)
                .copied()
                .unwrap_or_else(|| opts.last().copied().unwrap_or(Optimize::Minimize)),
        }
    }

    /// Compares two primary fitness values in the primary direction.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        self.direction(0).is_better(a, b)
    }

    /// The given criterion of a score, transformed so that smaller is better
    /// regardless of the configured direction.
    pub fn transformed(&self, score: &Score, criterion: usize) -> f64 {
        self.direction(criterion)
            .transformed(score.get(criterion).unwrap_or(f64::INFINITY))
    }

    /// A monotone scalarization of the primary fitness, such that smaller is
    /// better. Used for sorting and as a tiebreaker in pareto modes.
    pub fn min_only(&self, score: &Score) -> f64 {
        self.transformed(score, 0)
    }

    /// Whether `a` dominates `b`: for every criterion, `a`'s transformed
    /// fitness is not worse than `b`'s. The relation is reflexive.
    pub fn dominates(&self, a: &Score, b: &Score) -> bool {
        let n = a.len().min(b.len());
        for i in 0..n {
            if self.transformed(a, i) > self.transformed(b, i) {
                return false;
            }
        }
        true
    }
}

impl From<Optimize> for Objective {
    fn from(opt: Optimize) -> Self {
        Objective::Single(opt)
    }
}

impl From<Vec<Optimize>> for Objective {
    fn from(opts: Vec<Optimize>) -> Self {
        Objective::Multi(opts)
    }
}
