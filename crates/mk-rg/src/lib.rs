#![deny(missing_docs)]
#![doc = "Migdal-Kadanoff real-space renormalisation engine for a disordered Ising system on a hierarchical lattice."]

pub mod classify;
pub mod coarse;
pub mod ensemble;
pub mod matrix;
pub mod sink;

pub use classify::{classify, PhaseTally};
pub use coarse::{bond_moving, decimation, renormalize, CoarseOpts};
pub use ensemble::{build_ensemble, transfer_matrix};
pub use matrix::TransferMatrix;
pub use sink::{phase_sink, Phase, SinkOpts, SinkReport};
