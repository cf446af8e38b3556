use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

pub trait Scored {
    fn score(&self) -> Option<&Score>;
}

/// A score is the fitness of an individual as returned by its fitness
/// function. Score zero is the *primary* fitness.
///
/// Note: The reason it is a Vec is for multi-objective optimization problems.
/// This allows for multiple fitness values to be returned from the fitness
/// function.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Score {
    pub values: Arc<[f64]>,
}

impl Score {
    /// Builds a score from a list of criteria values. NaN values are rejected
    /// because a NaN fitness would poison every comparison downstream.
    pub fn from_vec(values: Vec<f64>) -> Self {
        for value in &values {
            if value.is_nan() {
                panic!("Score value cannot be NaN")
            }
        }

        Score {
            values: Arc::from(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The primary fitness.
    pub fn as_f64(&self) -> f64 {
        self.values.first().cloned().unwrap_or(f64::NAN)
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).cloned()
    }
}

impl AsRef<[f64]> for Score {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.values.partial_cmp(&other.values)
    }
}

impl Debug for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.values)
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score::from_vec(vec![value])
    }
}

impl From<Vec<f64>> for Score {
    fn from(value: Vec<f64>) -> Self {
        Score::from_vec(value)
    }
}

impl From<&[f64]> for Score {
    fn from(value: &[f64]) -> Self {
        Score::from_vec(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_primary() {
        let score = Score::from(vec![3.0, 7.0]);
        assert_eq!(score.as_f64(), 3.0);
        assert_eq!(score.get(1), Some(7.0));
        assert_eq!(score.get(2), None);
        assert_eq!(score.len(), 2);
    }

    #[test]
    #[should_panic]
    fn test_score_rejects_nan() {
        let _ = Score::from(f64::NAN);
    }

    #[test]
    fn test_score_roundtrips_through_json() {
        let score = Score::from(vec![1.5, -2.25]);
        let encoded = serde_json::to_string(&score).unwrap();
        let decoded: Score = serde_json::from_str(&encoded).unwrap();
        assert_eq!(score, decoded);
    }
}
