//! Randomised bond-moving and decimation coarse graining.
//!
//! One generation maps an ensemble of `N` transfer matrices onto a new
//! ensemble of the same size. Each output slot fuses 27 randomly drawn
//! matrices: three groups of nine are bond-moved in parallel, then the three
//! bond-moved matrices are decimated in series. The rescaling corresponds to
//! a hierarchical lattice with branching `b = 3` in `d = 3` dimensions.

use mk_core::errors::{ErrorInfo, MkError};
use mk_core::rng::RngHandle;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matrix::TransferMatrix;

/// Matrices fused per bond-moving group (`b^(d-1)` for `b = 3`, `d = 3`).
pub const BOND_MOVING_GROUP: usize = 9;
/// Bond-moved matrices composed per decimation chain (`b = 3`).
pub const DECIMATION_CHAIN: usize = 3;
/// Matrices drawn per output slot.
pub const DRAWS_PER_SLOT: usize = BOND_MOVING_GROUP * DECIMATION_CHAIN;

/// Options controlling the coarse-graining sampler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarseOpts {
    /// Sampling seed. The index stream is reseeded from this value at the top
    /// of every [`renormalize`] call, so every generation replays the same
    /// draw sequence relative to call start.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    19
}

impl Default for CoarseOpts {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

/// Fuses a group of parallel bonds into one bond by iterated element-wise
/// multiplication, renormalising after every pairwise fuse.
pub fn bond_moving(group: &[TransferMatrix]) -> Result<TransferMatrix, MkError> {
    let (first, rest) = group.split_first().ok_or_else(|| {
        MkError::Parameter(ErrorInfo::new(
            "P004",
            "bond moving requires at least one matrix",
        ))
    })?;
    let mut fused = *first;
    for matrix in rest {
        fused = fused.hadamard(matrix).normalized()?;
    }
    fused.normalized()
}

/// Eliminates the interior sites of a three-bond chain by ordinary matrix
/// multiplication, renormalising after each product.
pub fn decimation(chain: &[TransferMatrix; DECIMATION_CHAIN]) -> Result<TransferMatrix, MkError> {
    let head = chain[0].matmul(&chain[1]).normalized()?;
    head.matmul(&chain[2]).normalized()
}

/// Produces the next generation of the ensemble.
///
/// All `27 * N` bond indices are drawn up front from a handle reseeded with
/// `opts.seed`, then the `N` independent output slots are computed in
/// parallel against the fixed input ensemble; the order-preserving collect
/// keeps the result bit-identical to a sequential evaluation. Indices are
/// sampled uniformly from `[1, N)`: slot zero of the input is never drawn, a
/// deliberate asymmetry inherited from the reference trajectories. Changing
/// it changes every numeric result, so it stays.
pub fn renormalize(
    ensemble: &[TransferMatrix],
    opts: &CoarseOpts,
) -> Result<Vec<TransferMatrix>, MkError> {
    let n = ensemble.len();
    if n < 2 {
        return Err(MkError::Parameter(
            ErrorInfo::new("P005", "coarse graining requires at least two matrices")
                .with_context("ensemble_len", n.to_string())
                .with_hint("use a lattice size of at least 2"),
        ));
    }

    let mut rng = RngHandle::from_seed(opts.seed);
    let indices: Vec<usize> = (0..n * DRAWS_PER_SLOT)
        .map(|_| rng.gen_range(1..n))
        .collect();

    indices
        .par_chunks(DRAWS_PER_SLOT)
        .map(|draws| {
            let fetch = |slot: &[usize]| -> [TransferMatrix; BOND_MOVING_GROUP] {
                std::array::from_fn(|k| ensemble[slot[k]])
            };
            let bm1 = bond_moving(&fetch(&draws[..BOND_MOVING_GROUP]))?;
            let bm2 = bond_moving(&fetch(&draws[BOND_MOVING_GROUP..2 * BOND_MOVING_GROUP]))?;
            let bm3 = bond_moving(&fetch(&draws[2 * BOND_MOVING_GROUP..]))?;
            decimation(&[bm1, bm2, bm3])
        })
        .collect()
}
