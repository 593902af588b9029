#![deny(missing_docs)]
#![doc = "Bracket-then-bisect critical-point searches driving the phase-sink oracle."]

use mk_core::errors::{ErrorInfo, MkError};
use mk_rg::{phase_sink, Phase, SinkOpts};
use serde::{Deserialize, Serialize};

/// Which parameter axis the search bisects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Temperature search at fixed bond concentration.
    Vertical,
    /// Concentration search at fixed temperature.
    Horizontal,
}

/// Options shared by both searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOpts {
    /// Bisection stops once the bracket is narrower than this.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Maximum bracketing steps before the search is abandoned.
    #[serde(default = "default_step_cap")]
    pub max_bracket_steps: usize,
    /// Maximum bisection steps before the search is abandoned.
    #[serde(default = "default_step_cap")]
    pub max_bisection_steps: usize,
    /// Oracle configuration used for every probe.
    #[serde(default)]
    pub sink: SinkOpts,
}

fn default_tolerance() -> f64 {
    0.01
}

fn default_step_cap() -> usize {
    64
}

impl Default for SearchOpts {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_bracket_steps: default_step_cap(),
            max_bisection_steps: default_step_cap(),
            sink: SinkOpts::default(),
        }
    }
}

/// Which stage of the search issued a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStage {
    /// Fixed-step walk looking for the far side of the boundary.
    Bracket,
    /// Interval halving between the bracket bounds.
    Bisect,
}

/// One oracle probe recorded in the search trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchStep {
    /// Stage that issued the probe.
    pub stage: SearchStage,
    /// Trial parameter value probed (temperature or concentration).
    pub trial: f64,
    /// Verdict the oracle returned for the trial.
    pub verdict: Phase,
    /// Generations the oracle spent on the trial.
    pub generations: usize,
    /// Lower bracket bound after this probe, `None` until one is found.
    pub low: Option<f64>,
    /// Upper bracket bound after this probe, `None` until one is found.
    pub high: Option<f64>,
}

/// Completed critical-point search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Axis the search bisected.
    pub direction: Direction,
    /// Midpoint of the final bracket: the critical-point estimate.
    pub critical: f64,
    /// Final bracket bounds.
    pub bracket: (f64, f64),
    /// Number of phase-sink probes issued.
    pub oracle_calls: usize,
    /// Every probe in issue order; the CLI replays it as narration.
    pub steps: Vec<SearchStep>,
}

/// Locates the critical boundary along `direction` and returns the report.
///
/// `temperature` is the starting temperature for vertical searches and the
/// fixed temperature for horizontal ones; `aferro_fraction` is the fixed
/// concentration for vertical searches and the starting concentration for
/// horizontal ones.
pub fn critical_point(
    temperature: f64,
    aferro_fraction: f64,
    direction: Direction,
    opts: &SearchOpts,
) -> Result<SearchReport, MkError> {
    match direction {
        Direction::Vertical => critical_temperature(temperature, aferro_fraction, opts),
        Direction::Horizontal => critical_concentration(temperature, aferro_fraction, opts),
    }
}

/// Temperature-direction search at fixed bond concentration.
///
/// Assumes the starting temperature lies inside the disordered phase; walks
/// down in unit steps until the oracle stops reporting disorder, then bisects
/// the bracket. Probes couple to the oracle through `1 / T`.
pub fn critical_temperature(
    start_temperature: f64,
    aferro_fraction: f64,
    opts: &SearchOpts,
) -> Result<SearchReport, MkError> {
    validate_opts(opts)?;
    if !start_temperature.is_finite() || start_temperature <= 0.0 {
        return Err(MkError::Parameter(
            ErrorInfo::new("P010", "starting temperature must be positive and finite")
                .with_context("temperature", start_temperature.to_string()),
        ));
    }

    let mut steps = Vec::new();
    let mut oracle_calls = 0usize;
    let mut target_seen = false;

    // Bracketing: the last temperature still reported as disorder becomes the
    // upper bound, the first that is not becomes the lower bound.
    let mut high = start_temperature;
    let mut trial = start_temperature;
    let mut low = None;
    for _ in 0..opts.max_bracket_steps {
        trial -= 1.0;
        if trial <= 0.0 {
            return Err(MkError::Search(
                ErrorInfo::new(
                    "S001",
                    "temperature bracketing reached the zero-temperature boundary",
                )
                .with_context("start_temperature", start_temperature.to_string())
                .with_hint("the disordered phase may not extend below the starting point"),
            ));
        }
        let report = phase_sink(1.0 / trial, aferro_fraction, Phase::Disorder, &opts.sink)?;
        oracle_calls += 1;
        if report.verdict == Phase::Disorder {
            target_seen = true;
            high = trial;
        } else {
            low = Some(trial);
        }
        steps.push(SearchStep {
            stage: SearchStage::Bracket,
            trial,
            verdict: report.verdict,
            generations: report.generations,
            low,
            high: Some(high),
        });
        if low.is_some() {
            break;
        }
    }
    let Some(mut low) = low else {
        return Err(MkError::Search(
            ErrorInfo::new("S002", "bracketing exhausted its step cap")
                .with_context("max_bracket_steps", opts.max_bracket_steps.to_string()),
        ));
    };

    // Bisection.
    let mut bisections = 0usize;
    while (high - low).abs() > opts.tolerance {
        if bisections >= opts.max_bisection_steps {
            return Err(MkError::Search(
                ErrorInfo::new(
                    "S003",
                    "bisection exceeded its step cap without meeting tolerance",
                )
                .with_context("tolerance", opts.tolerance.to_string())
                .with_context("bracket_width", (high - low).abs().to_string()),
            ));
        }
        let mid = (low + high) / 2.0;
        let report = phase_sink(1.0 / mid, aferro_fraction, Phase::Disorder, &opts.sink)?;
        oracle_calls += 1;
        if report.verdict == Phase::Disorder {
            target_seen = true;
            high = mid;
        } else {
            low = mid;
        }
        steps.push(SearchStep {
            stage: SearchStage::Bisect,
            trial: mid,
            verdict: report.verdict,
            generations: report.generations,
            low: Some(low),
            high: Some(high),
        });
        bisections += 1;
    }

    if !target_seen {
        return Err(MkError::Oracle(
            ErrorInfo::new(
                "O001",
                "no probe ever reached the disorder sink; the bracket never held the boundary",
            )
            .with_hint("raise the starting temperature or the generation budget"),
        ));
    }

    Ok(SearchReport {
        direction: Direction::Vertical,
        critical: (low + high) / 2.0,
        bracket: (low, high),
        oracle_calls,
        steps,
    })
}

/// Concentration-direction search at fixed temperature.
///
/// Assumes the starting concentration lies inside the ferromagnetic phase;
/// walks up in steps of 0.1 until the oracle stops reporting ferro, then
/// bisects the bracket. Every probe couples at `1 / T`.
pub fn critical_concentration(
    temperature: f64,
    start_fraction: f64,
    opts: &SearchOpts,
) -> Result<SearchReport, MkError> {
    validate_opts(opts)?;
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(MkError::Parameter(
            ErrorInfo::new("P011", "temperature must be positive and finite")
                .with_context("temperature", temperature.to_string()),
        ));
    }
    if !(0.0..=1.0).contains(&start_fraction) {
        return Err(MkError::Parameter(
            ErrorInfo::new(
                "P012",
                "starting concentration must lie within [0, 1]",
            )
            .with_context("aferro_fraction", start_fraction.to_string()),
        ));
    }
    let coupling = 1.0 / temperature;

    let mut steps = Vec::new();
    let mut oracle_calls = 0usize;
    let mut target_seen = false;

    let mut low = start_fraction;
    let mut trial = start_fraction;
    let mut high = None;
    for _ in 0..opts.max_bracket_steps {
        if trial >= 1.0 {
            return Err(MkError::Search(
                ErrorInfo::new(
                    "S004",
                    "concentration bracketing reached full antiferromagnetic dilution",
                )
                .with_context("start_fraction", start_fraction.to_string())
                .with_hint("the ferromagnetic phase may not extend above the starting point"),
            ));
        }
        trial = (trial + 0.1).min(1.0);
        let report = phase_sink(coupling, trial, Phase::Ferro, &opts.sink)?;
        oracle_calls += 1;
        if report.verdict == Phase::Ferro {
            target_seen = true;
            low = trial;
        } else {
            high = Some(trial);
        }
        steps.push(SearchStep {
            stage: SearchStage::Bracket,
            trial,
            verdict: report.verdict,
            generations: report.generations,
            low: Some(low),
            high,
        });
        if high.is_some() {
            break;
        }
    }
    let Some(mut high) = high else {
        return Err(MkError::Search(
            ErrorInfo::new("S002", "bracketing exhausted its step cap")
                .with_context("max_bracket_steps", opts.max_bracket_steps.to_string()),
        ));
    };

    let mut bisections = 0usize;
    while (high - low).abs() > opts.tolerance {
        if bisections >= opts.max_bisection_steps {
            return Err(MkError::Search(
                ErrorInfo::new(
                    "S003",
                    "bisection exceeded its step cap without meeting tolerance",
                )
                .with_context("tolerance", opts.tolerance.to_string())
                .with_context("bracket_width", (high - low).abs().to_string()),
            ));
        }
        let mid = (low + high) / 2.0;
        let report = phase_sink(coupling, mid, Phase::Ferro, &opts.sink)?;
        oracle_calls += 1;
        if report.verdict == Phase::Ferro {
            target_seen = true;
            low = mid;
        } else {
            high = mid;
        }
        steps.push(SearchStep {
            stage: SearchStage::Bisect,
            trial: mid,
            verdict: report.verdict,
            generations: report.generations,
            low: Some(low),
            high: Some(high),
        });
        bisections += 1;
    }

    if !target_seen {
        return Err(MkError::Oracle(
            ErrorInfo::new(
                "O001",
                "no probe ever reached the ferro sink; the bracket never held the boundary",
            )
            .with_hint("lower the temperature or the starting concentration"),
        ));
    }

    Ok(SearchReport {
        direction: Direction::Horizontal,
        critical: (low + high) / 2.0,
        bracket: (low, high),
        oracle_calls,
        steps,
    })
}

fn validate_opts(opts: &SearchOpts) -> Result<(), MkError> {
    if !opts.tolerance.is_finite() || opts.tolerance <= 0.0 {
        return Err(MkError::Parameter(
            ErrorInfo::new("P013", "tolerance must be positive and finite")
                .with_context("tolerance", opts.tolerance.to_string()),
        ));
    }
    if opts.max_bracket_steps == 0 || opts.max_bisection_steps == 0 {
        return Err(MkError::Parameter(ErrorInfo::new(
            "P014",
            "search step caps must be at least one",
        )));
    }
    Ok(())
}
