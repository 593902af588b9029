//! Phase-sink oracle: repeated coarse graining until an ensemble settles.

use std::fmt;

use mk_core::errors::{ErrorInfo, MkError};
use serde::{Deserialize, Serialize};

use crate::classify::{classify, PhaseTally};
use crate::coarse::{renormalize, CoarseOpts};
use crate::ensemble::build_ensemble;

/// Fraction of the ensemble that must settle at a sink for a verdict.
const SINK_FRACTION: f64 = 0.95;
/// Fraction of unsettled matrices still tolerated alongside a verdict.
const STRAGGLER_FRACTION: f64 = 0.05;

/// Terminal classification of a renormalisation-group trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// No sink threshold was crossed within the generation budget.
    Undetermined,
    /// Ferromagnetic sink.
    Ferro,
    /// Disordered (paramagnetic) sink.
    Disorder,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Undetermined => "undetermined",
            Phase::Ferro => "ferro",
            Phase::Disorder => "disorder",
        };
        f.write_str(label)
    }
}

/// Options for one phase-sink probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkOpts {
    /// Number of independent bonds modelled per generation.
    #[serde(default = "default_lattice_size")]
    pub lattice_size: usize,
    /// Maximum number of coarse-graining generations per probe.
    #[serde(default = "default_generations")]
    pub max_generations: usize,
    /// Coarse-graining sampler options.
    #[serde(default)]
    pub coarse: CoarseOpts,
}

fn default_lattice_size() -> usize {
    1000
}

fn default_generations() -> usize {
    29
}

impl Default for SinkOpts {
    fn default() -> Self {
        Self {
            lattice_size: default_lattice_size(),
            max_generations: default_generations(),
            coarse: CoarseOpts::default(),
        }
    }
}

/// Outcome of one phase-sink probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkReport {
    /// Generations executed before returning.
    pub generations: usize,
    /// Verdict carried out of the loop. A later generation may overwrite the
    /// verdict of an earlier one; only a match with the requested target
    /// stops the loop early.
    pub verdict: Phase,
    /// Tally of the last generation inspected.
    pub tally: PhaseTally,
}

/// Coarse-grains a fresh ensemble until it crosses the sink threshold for
/// `target` or the generation budget runs out.
///
/// The verdict is an explicit state variable: crossing the threshold of a
/// phase other than the target records the verdict and keeps iterating, so a
/// later generation may overwrite it. Budget exhaustion returns the last
/// verdict as-is, possibly [`Phase::Undetermined`].
pub fn phase_sink(
    coupling: f64,
    aferro_fraction: f64,
    target: Phase,
    opts: &SinkOpts,
) -> Result<SinkReport, MkError> {
    if target == Phase::Undetermined {
        return Err(MkError::Parameter(
            ErrorInfo::new("P006", "target phase must be ferro or disorder")
                .with_hint("undetermined is an outcome, not a search target"),
        ));
    }
    if opts.max_generations == 0 {
        return Err(MkError::Parameter(ErrorInfo::new(
            "P007",
            "generation budget must be at least one",
        )));
    }

    let mut ensemble = build_ensemble(opts.lattice_size, coupling, aferro_fraction)?;
    let settled = SINK_FRACTION * opts.lattice_size as f64;
    let stragglers = STRAGGLER_FRACTION * opts.lattice_size as f64;

    let mut verdict = Phase::Undetermined;
    let mut tally = PhaseTally::default();
    let mut generations = 0;
    for generation in 1..=opts.max_generations {
        ensemble = renormalize(&ensemble, &opts.coarse)?;
        tally = classify(&ensemble);
        generations = generation;

        if (tally.disorder as f64) > settled && (tally.out_of_sink as f64) < stragglers {
            verdict = Phase::Disorder;
            if target == Phase::Disorder {
                break;
            }
        } else if (tally.ferro as f64) > settled && (tally.out_of_sink as f64) < stragglers {
            verdict = Phase::Ferro;
            if target == Phase::Ferro {
                break;
            }
        }
    }

    Ok(SinkReport {
        generations,
        verdict,
        tally,
    })
}
