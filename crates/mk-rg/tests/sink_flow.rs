use mk_core::errors::MkError;
use mk_rg::{phase_sink, Phase, SinkOpts, SinkReport};

fn small_lattice() -> SinkOpts {
    SinkOpts {
        lattice_size: 100,
        ..SinkOpts::default()
    }
}

#[test]
fn strong_ferro_coupling_sinks_to_ferro_immediately() {
    let report = phase_sink(5.0, 0.0, Phase::Ferro, &small_lattice()).unwrap();
    assert_eq!(report.verdict, Phase::Ferro);
    assert_eq!(report.generations, 1);
    assert_eq!(report.tally.ferro, report.tally.total());
}

#[test]
fn ferro_favoring_regime_never_reports_disorder() {
    // Searching for disorder in a strongly ferromagnetic system records the
    // ferro verdict along the way and runs out the full budget.
    let opts = small_lattice();
    let report = phase_sink(5.0, 0.0, Phase::Disorder, &opts).unwrap();
    assert_ne!(report.verdict, Phase::Disorder);
    assert_eq!(report.verdict, Phase::Ferro);
    assert_eq!(report.generations, opts.max_generations);
}

#[test]
fn weak_coupling_sinks_to_disorder() {
    let report = phase_sink(0.02, 0.0, Phase::Disorder, &small_lattice()).unwrap();
    assert_eq!(report.verdict, Phase::Disorder);
    assert!(report.generations <= 10);
}

#[test]
fn symmetric_mixture_stays_undetermined() {
    // At half antiferromagnetic dilution and strong coupling the flow freezes
    // into a mixture of ferro and aferro matrices; neither sink threshold is
    // crossed, which is the spin-glass-like signature of this recursion.
    let report = phase_sink(2.0, 0.5, Phase::Ferro, &small_lattice()).unwrap();
    assert_eq!(report.verdict, Phase::Undetermined);
    assert_eq!(report.generations, small_lattice().max_generations);
}

#[test]
fn verdicts_and_tallies_are_reproducible() {
    let opts = small_lattice();
    let first = phase_sink(0.5, 0.3, Phase::Ferro, &opts).unwrap();
    let second = phase_sink(0.5, 0.3, Phase::Ferro, &opts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn sink_report_round_trips_through_json() {
    let report = phase_sink(5.0, 0.0, Phase::Ferro, &small_lattice()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: SinkReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn undetermined_target_is_rejected() {
    let err = phase_sink(1.0, 0.0, Phase::Undetermined, &small_lattice()).unwrap_err();
    assert!(matches!(err, MkError::Parameter(_)));
    assert_eq!(err.info().code, "P006");
}

#[test]
fn zero_generation_budget_is_rejected() {
    let opts = SinkOpts {
        max_generations: 0,
        ..small_lattice()
    };
    let err = phase_sink(1.0, 0.0, Phase::Disorder, &opts).unwrap_err();
    assert!(matches!(err, MkError::Parameter(_)));
}

#[test]
fn invalid_lattice_parameters_propagate() {
    let opts = SinkOpts {
        lattice_size: 1,
        ..SinkOpts::default()
    };
    assert!(phase_sink(1.0, 0.0, Phase::Disorder, &opts).is_err());
    assert!(phase_sink(1.0, 2.0, Phase::Disorder, &small_lattice()).is_err());
}
