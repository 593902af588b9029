use mk_rg::{classify, transfer_matrix, TransferMatrix};
use proptest::prelude::*;

#[test]
fn frozen_ferro_matrix_counts_as_ferro() {
    let tally = classify(&[transfer_matrix(10.0).unwrap()]);
    assert_eq!(tally.ferro, 1);
    assert_eq!(tally.total(), 1);
}

#[test]
fn frozen_aferro_matrix_counts_as_aferro() {
    let tally = classify(&[transfer_matrix(-10.0).unwrap()]);
    assert_eq!(tally.aferro, 1);
    assert_eq!(tally.total(), 1);
}

#[test]
fn flat_matrix_counts_as_disorder() {
    let flat = TransferMatrix::from_elements([[1.0, 1.0], [1.0, 1.0]]);
    let tally = classify(&[flat]);
    assert_eq!(tally.disorder, 1);
}

#[test]
fn intermediate_matrix_is_out_of_sink() {
    let tally = classify(&[transfer_matrix(0.5).unwrap()]);
    assert_eq!(tally.out_of_sink, 1);
}

#[test]
fn empty_ensemble_tallies_to_zero() {
    let tally = classify(&[]);
    assert_eq!(tally.total(), 0);
}

proptest! {
    #[test]
    fn buckets_partition_any_ensemble(couplings in prop::collection::vec(-12.0f64..12.0, 1..64)) {
        let ensemble: Vec<_> = couplings
            .iter()
            .map(|&j| transfer_matrix(j).unwrap())
            .collect();
        let tally = classify(&ensemble);
        prop_assert_eq!(tally.total(), ensemble.len());
    }
}
