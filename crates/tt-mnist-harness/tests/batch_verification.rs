//! Batch verification against on-disk vectors and the software device

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tt_mnist_driver::{FaultMode, ProtocolDriver, ProtocolTiming, SoftwareDevice};
use tt_mnist_harness::{
    BatchVerifier, CaseVerifier, FailureKind, HarnessConfig, HarnessError, Observed,
};
use tt_mnist_vectors::VectorStore;

/// Pixels whose first two values encode `digit` for [`digit_reader`].
fn encoded_frame(digit: u8) -> Vec<u8> {
    let mut pixels = vec![1u8; 64];
    pixels[0] = digit % 4;
    pixels[1] = digit / 4;
    pixels
}

fn digit_reader(frame: &[u8; 64]) -> u8 {
    frame[0] + 4 * frame[1]
}

fn write_vector(dir: &Path, index: usize, pixels: &[u8], expected: u8) {
    let input: String = pixels.iter().map(|p| format!("{p}\n")).collect();
    fs::write(dir.join(format!("test_{index:03}_input.txt")), input).unwrap();
    fs::write(
        dir.join(format!("test_{index:03}_output.txt")),
        format!("# expected\n{expected}\n"),
    )
    .unwrap();
    fs::write(
        dir.join(format!("test_{index:03}_metadata.txt")),
        format!("True label: {expected}\nSource: synthetic\n"),
    )
    .unwrap();
}

/// Ten vectors 0..=9 labelled with their own digit, except `wrong`.
fn ten_vectors(wrong: Option<(usize, u8)>) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..10u8 {
        let index = usize::from(i);
        let expected = match wrong {
            Some((w, label)) if w == index => label,
            _ => i,
        };
        write_vector(dir.path(), index, &encoded_frame(i), expected);
    }
    dir
}

fn verifier(dir: &Path, device: SoftwareDevice) -> BatchVerifier<SoftwareDevice> {
    let config = HarnessConfig::default().with_vector_dir(dir);
    BatchVerifier::from_config(&config, device)
}

fn fast_device() -> SoftwareDevice {
    SoftwareDevice::with_classifier(digit_reader).with_compute_latency(50)
}

#[test]
fn clean_batch_passes() {
    let dir = ten_vectors(None);
    let mut batch = verifier(dir.path(), fast_device());

    let summary = batch.run_range(0, 10).unwrap();
    assert_eq!((summary.total, summary.passed, summary.failed), (10, 10, 0));
    assert!(summary.failures.is_empty());
    assert_eq!(summary.cycle_stats.min(), Some(67));
    assert_eq!(summary.cycle_stats.max(), Some(67));
    assert_eq!(summary.simulated_ns(10), 10 * 67 * 10);
}

#[test]
fn one_mismatch_fails_the_batch_with_that_case() {
    let dir = ten_vectors(Some((6, 3)));
    let mut batch = verifier(dir.path(), fast_device());

    let (failed, total, summary) = match batch.run_range(0, 10) {
        Err(HarnessError::BatchFailure {
            failed,
            total,
            summary,
        }) => (failed, total, summary),
        other => panic!("expected batch failure, got {other:?}"),
    };
    assert_eq!((failed, total), (1, 10));
    assert_eq!(summary.passed, 9);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures.len(), 1);

    let case = &summary.failures[0];
    assert_eq!(case.index, 6);
    assert_eq!(case.expected, 3);
    assert_eq!(case.observed, Observed::Prediction(6));
    assert_eq!(case.failure(), Some(FailureKind::Mismatch));
    assert_eq!(case.true_label.as_deref(), Some("3"));

    // Mismatches still count towards cycle statistics
    assert_eq!(summary.cycle_stats.samples(), 10);
}

#[test]
fn timeouts_are_recorded_and_the_batch_continues() {
    let dir = ten_vectors(None);
    let device = fast_device().with_fault(FaultMode::NeverDone);
    let config = HarnessConfig::default()
        .with_vector_dir(dir.path())
        .with_timing(ProtocolTiming::default().with_cycle_budget(120));
    let mut batch = BatchVerifier::from_config(&config, device);

    let err = batch.run_range(2, 3).unwrap_err();
    let summary = err.summary().expect("summary");
    assert_eq!((summary.total, summary.failed), (3, 3));
    assert_eq!(summary.timeouts(), 3);
    assert!(summary
        .failures
        .iter()
        .all(|r| r.observed == Observed::Timeout && r.cycles_used == 120));
    assert_eq!(summary.cycle_stats.samples(), 0);
    assert_eq!(
        summary.failures.iter().map(|r| r.index).collect::<Vec<_>>(),
        [2, 3, 4]
    );

    // The device recovers on the next run once the fault is cleared
    batch
        .case_mut()
        .driver_mut()
        .device_mut()
        .set_fault(FaultMode::Healthy);
    assert!(batch.run_range(2, 3).is_ok());
}

#[test]
fn missing_vector_aborts_without_summary() {
    let dir = TempDir::new().unwrap();
    for i in 0..3u8 {
        write_vector(dir.path(), usize::from(i), &encoded_frame(i), i);
    }
    let mut batch = verifier(dir.path(), fast_device());

    let err = batch.run_range(0, 5).unwrap_err();
    match &err {
        HarnessError::Vector(e) => assert!(e.is_not_found(), "{e}"),
        other => panic!("expected vector error, got {other:?}"),
    }
    assert!(err.summary().is_none());
    // Vectors before the missing one were still run
    assert_eq!(batch.case().driver().runs(), 3);
}

#[test]
fn malformed_vector_aborts_the_batch() {
    let dir = ten_vectors(None);
    let mut pixels = encoded_frame(4);
    pixels.push(0);
    write_vector(dir.path(), 4, &pixels, 4);

    let mut batch = verifier(dir.path(), fast_device());
    let err = batch.run_range(0, 10).unwrap_err();
    match err {
        HarnessError::Vector(e) => assert!(e.is_malformed(), "{e}"),
        other => panic!("expected malformed vector, got {other:?}"),
    }
}

#[test]
fn run_all_follows_store_indices() {
    let dir = TempDir::new().unwrap();
    for i in [0u8, 2, 5] {
        write_vector(dir.path(), usize::from(i), &encoded_frame(i), i);
    }
    let mut batch = verifier(dir.path(), fast_device());
    let summary = batch.run_all().unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(batch.case().driver().runs(), 3);
}

#[test]
fn empty_range_is_a_pass() {
    let dir = TempDir::new().unwrap();
    let mut batch = verifier(dir.path(), fast_device());
    let summary = batch.run_range(0, 0).unwrap();
    assert_eq!(summary.total, 0);
    assert!(summary.all_passed());
}

#[test]
fn single_case_is_repeatable() {
    let dir = ten_vectors(None);
    let store = VectorStore::new(dir.path());
    let driver = ProtocolDriver::new(SoftwareDevice::with_classifier(digit_reader));
    let mut case = CaseVerifier::new(store, driver);

    let first = case.run(7).unwrap();
    let second = case.run(7).unwrap();
    assert_eq!(first, second);
    assert!(first.passed);
    assert_eq!(first.observed, Observed::Prediction(7));
    assert_eq!(first.cycles_used, 3940);
}

#[test]
fn all_zero_vector_zero_predicts_zero() {
    let dir = TempDir::new().unwrap();
    write_vector(dir.path(), 0, &[0u8; 64], 0);
    let store = VectorStore::new(dir.path());
    let driver = ProtocolDriver::new(SoftwareDevice::with_classifier(|f: &[u8; 64]| f[0]));
    let mut case = CaseVerifier::new(store, driver);

    let result = case.run(0).unwrap();
    assert!(result.passed);
    assert_eq!(result.observed, Observed::Prediction(0));
    assert!(result.cycles_used < 5000);
}

#[test]
fn stuck_device_case_times_out_at_the_default_budget() {
    let dir = TempDir::new().unwrap();
    write_vector(dir.path(), 0, &[0u8; 64], 0);
    let device = SoftwareDevice::default().with_fault(FaultMode::NeverDone);
    let mut case = CaseVerifier::new(VectorStore::new(dir.path()), ProtocolDriver::new(device));

    let result = case.run(0).unwrap();
    assert!(!result.passed);
    assert_eq!(result.observed, Observed::Timeout);
    assert_eq!(result.cycles_used, 5000);
    assert_eq!(result.failure(), Some(FailureKind::Timeout));
}

#[test]
fn loaded_vector_verifies_with_final_status() {
    let dir = ten_vectors(None);
    let store = VectorStore::new(dir.path());
    let vector = store.load(2).unwrap();
    let driver = ProtocolDriver::new(SoftwareDevice::with_classifier(digit_reader));
    let mut case = CaseVerifier::new(store, driver);

    let result = case.verify(&vector).unwrap();
    assert!(result.passed);
    let status = result.status.expect("completed run carries its status");
    assert!(status.done());
    assert!(!status.busy());
    assert_eq!(status.prediction(), 2);
}
