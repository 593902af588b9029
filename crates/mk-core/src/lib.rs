#![deny(missing_docs)]
#![doc = "Shared error surface and deterministic RNG handle for the Migdal-Kadanoff phase-diagram engine."]

pub mod errors;
pub mod rng;

pub use errors::{ErrorInfo, MkError};
pub use rng::RngHandle;
