use crate::Result;
use crate::domain::random_provider;
use crate::individual::Individual;
use crate::objectives::Score;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The analytic test functions shipped with the library. Carried inside the
/// individual so a remote worker can reconstruct the fitness function from
/// the serialized payload alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchmarkFunction {
    /// f(x) = Σ xᵢ²
    Sphere,
    /// Sphere plus gaussian noise, useful for testing noisy evaluation.
    NoisySphere,
    /// f(x) = Σ 100·(xᵢ₊₁ − xᵢ²)² + (1 − xᵢ)²
    Rosenbrock,
    /// f(x) = 10·n + Σ xᵢ² − 10·cos(2π·xᵢ)
    Rastrigin,
    /// Two-objective pair f₁ = x₀², f₂ = (x₀ − 1)².
    TwoParabolas,
}

impl BenchmarkFunction {
    pub fn n_criteria(&self) -> usize {
        match self {
            BenchmarkFunction::TwoParabolas => 2,
            _ => 1,
        }
    }

    fn evaluate(&self, params: &[f64]) -> Vec<f64> {
        match self {
            BenchmarkFunction::Sphere => {
                vec![params.iter().map(|x| x * x).sum()]
            }
            BenchmarkFunction::NoisySphere => {
                let base: f64 = params.iter().map(|x| x * x).sum();
                vec![base * (1.0 + 0.01 * random_provider::gaussian(0.0, 1.0)).abs()]
            }
            BenchmarkFunction::Rosenbrock => {
                let mut sum = 0.0;
                for w in params.windows(2) {
                    sum += 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2);
                }
                vec![sum]
            }
            BenchmarkFunction::Rastrigin => {
                let n = params.len() as f64;
                let sum: f64 = params
                    .iter()
                    .map(|x| x * x - 10.0 * (2.0 * std::f64::consts::PI * x).cos())
                    .sum();
                vec![10.0 * n + sum]
            }
            BenchmarkFunction::TwoParabolas => {
                let x = params.first().copied().unwrap_or(0.0);
                vec![x * x, (x - 1.0) * (x - 1.0)]
            }
        }
    }
}

/// A real-valued parameter vector with box bounds and gaussian adaptation,
/// scored by a [BenchmarkFunction]. The standard individual for demos, tests
/// and wire-interop checks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionIndividual {
    params: Vec<f64>,
    lower: f64,
    upper: f64,
    sigma: f64,
    function: BenchmarkFunction,
    processing_cycles: usize,
}

impl FunctionIndividual {
    /// Creates an individual with uniformly random parameters inside the box.
    pub fn new(dimension: usize, bounds: Range<f64>, sigma: f64, function: BenchmarkFunction) -> Self {
        let params = (0..dimension)
            .map(|_| random_provider::range(bounds.clone()))
            .collect();

        FunctionIndividual {
            params,
            lower: bounds.start,
            upper: bounds.end,
            sigma,
            function,
            processing_cycles: 1,
        }
    }

    pub fn with_params(
        params: Vec<f64>,
        bounds: Range<f64>,
        sigma: f64,
        function: BenchmarkFunction,
    ) -> Self {
        FunctionIndividual {
            params,
            lower: bounds.start,
            upper: bounds.end,
            sigma,
            function,
            processing_cycles: 1,
        }
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    pub fn function(&self) -> BenchmarkFunction {
        self.function
    }
}

impl Individual for FunctionIndividual {
    fn adapt(&mut self) {
        // Log-normal step size control before the parameter step, so the
        // mutation width itself is subject to selection.
        let factor = (0.2 * random_provider::gaussian(0.0, 1.0)).exp();
        self.sigma = (self.sigma * factor).clamp(1e-9, self.upper - self.lower);

        for param in self.params.iter_mut() {
            *param += random_provider::gaussian(0.0, self.sigma);
            *param = param.clamp(self.lower, self.upper);
        }
    }

    fn evaluate(&mut self) -> Result<Score> {
        // The processing-cycles hint maps onto repeated refinement passes for
        // stochastic functions; deterministic ones are unaffected.
        let mut values = self.function.evaluate(&self.params);
        for _ in 1..self.processing_cycles {
            let next = self.function.evaluate(&self.params);
            for (acc, v) in values.iter_mut().zip(next) {
                *acc = acc.min(v);
            }
        }

        Ok(Score::from(values))
    }

    fn n_criteria(&self) -> usize {
        self.function.n_criteria()
    }

    fn amalgamate(&self, other: &Self) -> Self {
        let mut child = self.clone();
        for (i, param) in child.params.iter_mut().enumerate() {
            if let Some(theirs) = other.params.get(i) {
                *param = 0.5 * (*param + theirs);
            }
        }
        child
    }

    fn set_processing_cycles(&mut self, cycles: usize) {
        self.processing_cycles = cycles.max(1);
    }
}
