extern crate bvr_dimensions;

use bvr_dimensions::common::CalibrationState;
use bvr_dimensions::data::REFERENCE_WIDTH_CM;

#[test]
fn starts_unset() {
    let calibration = CalibrationState::new(REFERENCE_WIDTH_CM);
    assert!(!calibration.is_set());
    assert_eq!(calibration.reference_pixel_width(), None);
    assert_eq!(calibration.scale(), None);
    assert_eq!(calibration.measure(100, 100), None);
    assert_eq!(calibration.epoch(), 0);
}

#[test]
fn captures_only_once() {
    let mut calibration = CalibrationState::new(REFERENCE_WIDTH_CM);

    assert!(calibration.capture(120));
    assert!(!calibration.capture(300));
    assert!(!calibration.capture(1));

    assert_eq!(calibration.reference_pixel_width(), Some(120));
}

#[test]
fn zero_width_is_never_captured() {
    let mut calibration = CalibrationState::new(REFERENCE_WIDTH_CM);

    assert!(!calibration.capture(0));
    assert!(!calibration.is_set());

    assert!(calibration.capture(40));
    assert_eq!(calibration.reference_pixel_width(), Some(40));
}

#[test]
fn measures_against_reference() {
    let mut calibration = CalibrationState::new(5.0);
    calibration.capture(100);

    assert_eq!(calibration.scale(), Some(0.05));
    let (w, h) = calibration.measure(200, 50).unwrap();
    assert!((w - 10.0).abs() < 1e-9);
    assert!((h - 2.5).abs() < 1e-9);
}

#[test]
fn reset_clears_and_is_idempotent() {
    let mut calibration = CalibrationState::new(REFERENCE_WIDTH_CM);
    calibration.capture(80);

    calibration.reset();
    assert!(!calibration.is_set());
    assert_eq!(calibration.epoch(), 1);

    calibration.reset();
    assert!(!calibration.is_set());
    assert_eq!(calibration.epoch(), 2);
    assert_eq!(calibration.reference_physical_width(), REFERENCE_WIDTH_CM);

    assert!(calibration.capture(64));
    assert_eq!(calibration.reference_pixel_width(), Some(64));
}
