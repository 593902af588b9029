//! Boltzmann transfer-matrix construction and disordered bond ensembles.

use mk_core::errors::{ErrorInfo, MkError};

use crate::matrix::TransferMatrix;

/// Builds the normalised Boltzmann transfer matrix for a single bond.
///
/// The matrix is `normalize([[e^j, e^-j], [e^-j, e^j]])`; the sign of the
/// coupling decides whether the diagonal (ferromagnetic) or the off-diagonal
/// (antiferromagnetic) carries the unit weight.
pub fn transfer_matrix(coupling: f64) -> Result<TransferMatrix, MkError> {
    if !coupling.is_finite() {
        return Err(MkError::Parameter(
            ErrorInfo::new("P001", "coupling must be finite")
                .with_context("coupling", coupling.to_string()),
        ));
    }
    TransferMatrix::from_log_weights([[coupling, -coupling], [-coupling, coupling]]).normalized()
}

/// Builds the initial bond ensemble for one phase-sink probe.
///
/// The first `floor((1 - p) * N)` entries repeat the ferromagnetic matrix and
/// the remaining `floor(p * N)` entries repeat the antiferromagnetic one. Both
/// counts truncate, so the total may fall short of `lattice_size` by one; the
/// shortfall is accepted rather than corrected.
pub fn build_ensemble(
    lattice_size: usize,
    coupling: f64,
    aferro_fraction: f64,
) -> Result<Vec<TransferMatrix>, MkError> {
    if lattice_size < 2 {
        return Err(MkError::Parameter(
            ErrorInfo::new("P002", "lattice size must be at least two")
                .with_context("lattice_size", lattice_size.to_string())
                .with_hint("coarse graining samples bond indices from [1, N)"),
        ));
    }
    if !(0.0..=1.0).contains(&aferro_fraction) {
        return Err(MkError::Parameter(
            ErrorInfo::new(
                "P003",
                "antiferromagnetic fraction must lie within [0, 1]",
            )
            .with_context("aferro_fraction", aferro_fraction.to_string()),
        ));
    }

    let ferro = transfer_matrix(coupling)?;
    let aferro = transfer_matrix(-coupling)?;
    let ferro_count = ((1.0 - aferro_fraction) * lattice_size as f64) as usize;
    let aferro_count = (aferro_fraction * lattice_size as f64) as usize;

    let mut ensemble = Vec::with_capacity(ferro_count + aferro_count);
    ensemble.resize(ferro_count, ferro);
    ensemble.extend(std::iter::repeat(aferro).take(aferro_count));
    Ok(ensemble)
}
