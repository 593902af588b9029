use mk_core::errors::MkError;
use mk_rg::SinkOpts;
use mk_search::{
    critical_concentration, critical_point, critical_temperature, Direction, SearchOpts,
    SearchReport, SearchStage,
};

fn fast_opts(tolerance: f64) -> SearchOpts {
    SearchOpts {
        tolerance,
        sink: SinkOpts {
            lattice_size: 100,
            ..SinkOpts::default()
        },
        ..SearchOpts::default()
    }
}

#[test]
fn vertical_search_brackets_and_bisects() {
    let report = critical_temperature(40.0, 0.0, &fast_opts(0.1)).unwrap();
    assert_eq!(report.direction, Direction::Vertical);
    assert!(report.critical.is_finite());
    assert!(report.critical > 20.0 && report.critical < 30.0);
    assert!((report.bracket.1 - report.bracket.0).abs() <= 0.1);
    assert!(report.oracle_calls < 64);
    assert_eq!(report.steps.len(), report.oracle_calls);
    assert_eq!(report.steps[0].stage, SearchStage::Bracket);
    assert_eq!(report.steps.last().unwrap().stage, SearchStage::Bisect);
}

#[test]
fn vertical_search_is_reproducible() {
    let opts = SearchOpts {
        tolerance: 0.5,
        sink: SinkOpts {
            lattice_size: 100,
            ..SinkOpts::default()
        },
        ..SearchOpts::default()
    };
    let first = critical_temperature(30.0, 0.0, &opts).unwrap();
    let second = critical_temperature(30.0, 0.0, &opts).unwrap();
    assert_eq!(first, second);
}

#[test]
fn bracket_trace_leaves_the_unfound_bound_open() {
    // While the walk is still descending, no lower bound exists yet; the
    // trace must say so instead of echoing the unprobed trial.
    let report = critical_temperature(40.0, 0.0, &fast_opts(0.1)).unwrap();
    let bracket: Vec<_> = report
        .steps
        .iter()
        .filter(|step| step.stage == SearchStage::Bracket)
        .collect();
    let (closing, walking) = bracket.split_last().unwrap();
    for step in walking {
        assert_eq!(step.low, None);
        assert_eq!(step.high, Some(step.trial));
    }
    assert_eq!(closing.low, Some(closing.trial));
    assert!(closing.high.is_some());
    for step in report
        .steps
        .iter()
        .filter(|step| step.stage == SearchStage::Bisect)
    {
        assert!(step.low.is_some() && step.high.is_some());
    }
}

#[test]
fn search_report_round_trips_through_json() {
    let report = critical_temperature(30.0, 0.0, &fast_opts(0.5)).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: SearchReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn horizontal_search_finds_a_concentration_boundary() {
    let opts = SearchOpts {
        tolerance: 0.05,
        sink: SinkOpts {
            lattice_size: 200,
            ..SinkOpts::default()
        },
        ..SearchOpts::default()
    };
    let report = critical_concentration(2.0, 0.0, &opts).unwrap();
    assert_eq!(report.direction, Direction::Horizontal);
    assert!(report.critical > 0.05 && report.critical < 0.95);
    assert!((report.bracket.1 - report.bracket.0).abs() <= 0.05);
    // The climb has no upper bound until the first non-ferro verdict.
    assert_eq!(report.steps[0].high, None);
    assert_eq!(report.steps[0].low, Some(report.steps[0].trial));
}

#[test]
fn dispatcher_routes_by_direction() {
    let vertical = critical_point(30.0, 0.0, Direction::Vertical, &fast_opts(0.5)).unwrap();
    assert_eq!(vertical.direction, Direction::Vertical);
    let same = critical_temperature(30.0, 0.0, &fast_opts(0.5)).unwrap();
    assert_eq!(vertical, same);
}

#[test]
fn search_without_a_disorder_start_reports_oracle_ambiguity() {
    // T = 5 at zero dilution lies deep in the ferromagnetic phase: no probe
    // can ever return disorder, so the bracket never held the boundary.
    let err = critical_temperature(5.0, 0.0, &fast_opts(0.25)).unwrap_err();
    assert!(matches!(err, MkError::Oracle(_)));
    assert_eq!(err.info().code, "O001");
}

#[test]
fn bracketing_below_one_kelvin_fails_cleanly() {
    let err = critical_temperature(0.5, 0.0, &fast_opts(0.1)).unwrap_err();
    assert!(matches!(err, MkError::Search(_)));
    assert_eq!(err.info().code, "S001");
}

#[test]
fn full_dilution_start_fails_cleanly() {
    let err = critical_concentration(2.0, 1.0, &fast_opts(0.05)).unwrap_err();
    assert!(matches!(err, MkError::Search(_)));
    assert_eq!(err.info().code, "S004");
}

#[test]
fn invalid_search_parameters_are_rejected() {
    let mut opts = fast_opts(0.1);
    opts.tolerance = -1.0;
    assert!(matches!(
        critical_temperature(40.0, 0.0, &opts).unwrap_err(),
        MkError::Parameter(_)
    ));

    let mut opts = fast_opts(0.1);
    opts.max_bracket_steps = 0;
    assert!(matches!(
        critical_temperature(40.0, 0.0, &opts).unwrap_err(),
        MkError::Parameter(_)
    ));

    assert!(matches!(
        critical_temperature(-5.0, 0.0, &fast_opts(0.1)).unwrap_err(),
        MkError::Parameter(_)
    ));
    assert!(matches!(
        critical_concentration(2.0, 1.5, &fast_opts(0.1)).unwrap_err(),
        MkError::Parameter(_)
    ));
}
