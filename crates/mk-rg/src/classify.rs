//! Fixed-point classification of coarse-grained ensembles.

use serde::{Deserialize, Serialize};

use crate::matrix::TransferMatrix;

/// Elements below this threshold count as renormalised to zero.
const ZERO: f64 = 0.0001;
/// Elements above this threshold count as renormalised to one.
const ONE: f64 = 0.9999;

/// Per-sink bucket counts for one ensemble.
///
/// Buckets are mutually exclusive and sum to the ensemble length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseTally {
    /// Matrices settled at the ferromagnetic fixed point.
    pub ferro: usize,
    /// Matrices settled at the antiferromagnetic fixed point. Tallied, but
    /// never promoted to a terminal verdict by the sink loop.
    pub aferro: usize,
    /// Matrices settled at the disordered (paramagnetic) fixed point.
    pub disorder: usize,
    /// Matrices not yet settled at any fixed point.
    pub out_of_sink: usize,
}

impl PhaseTally {
    /// Total number of matrices tallied.
    pub fn total(&self) -> usize {
        self.ferro + self.aferro + self.disorder + self.out_of_sink
    }
}

/// Buckets every matrix by its diagonal (`t00`) and off-diagonal (`t01`)
/// elements.
pub fn classify(ensemble: &[TransferMatrix]) -> PhaseTally {
    let mut tally = PhaseTally::default();
    for matrix in ensemble {
        let left = matrix.element(0, 0);
        let right = matrix.element(0, 1);
        if left > ONE && right < ZERO {
            tally.ferro += 1;
        } else if left < ZERO && right > ONE {
            tally.aferro += 1;
        } else if left > ONE && right > ONE {
            tally.disorder += 1;
        } else {
            tally.out_of_sink += 1;
        }
    }
    tally
}
