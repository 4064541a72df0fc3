//! Reduction of per-repetition samples into a reference-relative summary.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
    /// `average / reference`, or 0.0 when no usable reference exists.
    pub index: f64,
}

impl Aggregate {
    pub const ZERO: Aggregate = Aggregate {
        average: 0.0,
        minimum: 0.0,
        maximum: 0.0,
        index: 0.0,
    };
}

/// Ratio of `average` to `reference`; 0.0 when `reference <= 0`.
pub fn index(average: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        average / reference
    } else {
        0.0
    }
}

/// Every sample participates, zero-valued failures included.
/// An empty slice yields [`Aggregate::ZERO`].
pub fn aggregate(samples: &[f64], reference: f64) -> Aggregate {
    if samples.is_empty() {
        return Aggregate::ZERO;
    }

    let sum: f64 = samples.iter().sum();
    let minimum = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let maximum = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = sum / samples.len() as f64;

    Aggregate {
        average,
        minimum,
        maximum,
        index: index(average, reference),
    }
}

/// Mean of the indices, 0.0 for none.
pub fn grade(indices: &[f64]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().sum::<f64>() / indices.len() as f64
}
