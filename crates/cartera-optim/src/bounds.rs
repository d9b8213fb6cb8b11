//! Staged box constraints on portfolio weights.

use serde::{Deserialize, Serialize};

/// Inclusive `[lower, upper]` bound on one weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBound {
    /// Minimum weight
    pub lower: f64,
    /// Maximum weight
    pub upper: f64,
}

impl WeightBound {
    /// Creates a bound.
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Whether the bound pins the weight to a single value.
    pub fn is_fixed(&self) -> bool {
        self.upper - self.lower <= f64::EPSILON
    }

    /// Clamps `value` into the bound.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }
}

/// Which set of bounds applies to a candidate portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundStage {
    /// One asset, pinned to full allocation
    Singleton,
    /// Intermediate search step, weights free in `[0, 1]`
    Growth,
    /// Target size reached, diversification floor and concentration cap apply
    Final,
}

/// Maps the candidate-portfolio size to per-asset weight bounds.
///
/// - a single asset is pinned to `(1, 1)`;
/// - a portfolio at the target size gets `(final_lower, final_upper)`;
/// - anything in between is left free in `(0, 1)`.
///
/// The singleton rule wins when the target size is one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundPolicy {
    /// Per-position floor once the target size is reached
    pub final_lower: f64,
    /// Per-position cap once the target size is reached
    pub final_upper: f64,
}

impl Default for BoundPolicy {
    fn default() -> Self {
        Self {
            final_lower: 0.02,
            final_upper: 0.15,
        }
    }
}

impl BoundPolicy {
    /// Stage of a candidate portfolio of `current_size` assets.
    pub const fn stage(&self, current_size: usize, target_size: usize) -> BoundStage {
        if current_size == 1 {
            BoundStage::Singleton
        } else if current_size == target_size {
            BoundStage::Final
        } else {
            BoundStage::Growth
        }
    }

    /// Bounds for every asset of a candidate portfolio of `current_size` assets.
    pub fn bounds(&self, current_size: usize, target_size: usize) -> Vec<WeightBound> {
        let bound = match self.stage(current_size, target_size) {
            BoundStage::Singleton => WeightBound::new(1.0, 1.0),
            BoundStage::Final => self.final_bound(),
            BoundStage::Growth => WeightBound::new(0.0, 1.0),
        };
        vec![bound; current_size]
    }

    /// Final-stage bounds for `size` assets, regardless of size.
    ///
    /// Used by the refinement pass, which always runs under the final stage.
    pub fn final_bounds(&self, size: usize) -> Vec<WeightBound> {
        vec![self.final_bound(); size]
    }

    const fn final_bound(&self) -> WeightBound {
        WeightBound::new(self.final_lower, self.final_upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_stage() {
        let policy = BoundPolicy::default();
        assert_eq!(policy.stage(1, 10), BoundStage::Singleton);
        assert_eq!(policy.bounds(1, 10), vec![WeightBound::new(1.0, 1.0)]);
    }

    #[test]
    fn test_singleton_wins_over_final() {
        let policy = BoundPolicy::default();
        assert_eq!(policy.stage(1, 1), BoundStage::Singleton);
        assert_eq!(policy.bounds(1, 1), vec![WeightBound::new(1.0, 1.0)]);
    }

    #[test]
    fn test_final_stage() {
        let policy = BoundPolicy::default();
        let bounds = policy.bounds(8, 8);
        assert_eq!(bounds.len(), 8);
        assert!(bounds.iter().all(|b| *b == WeightBound::new(0.02, 0.15)));
    }

    #[test]
    fn test_growth_stage() {
        let policy = BoundPolicy::default();
        assert_eq!(policy.stage(3, 8), BoundStage::Growth);
        let bounds = policy.bounds(3, 8);
        assert_eq!(bounds.len(), 3);
        assert!(bounds.iter().all(|b| *b == WeightBound::new(0.0, 1.0)));
    }

    #[test]
    fn test_final_bounds_ignore_stage() {
        let policy = BoundPolicy::default();
        assert_eq!(policy.final_bounds(1), vec![WeightBound::new(0.02, 0.15)]);
    }

    #[test]
    fn test_weight_bound_helpers() {
        let bound = WeightBound::new(0.02, 0.15);
        assert!(!bound.is_fixed());
        assert!(WeightBound::new(1.0, 1.0).is_fixed());
        assert_eq!(bound.clamp(0.5), 0.15);
        assert_eq!(bound.clamp(-1.0), 0.02);
    }
}
