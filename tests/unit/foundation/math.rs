use super::*;
use approx::assert_relative_eq;

const AXIS: f64 = 67.5;
const THRESH: f64 = 0.8;

#[test]
fn zero_maps_to_zero() {
    assert_eq!(capped_offset(0.0, AXIS, THRESH), 0.0);
}

#[test]
fn just_below_threshold_stays_on_the_curve() {
    let ratio = saturating_ratio(80.0, THRESH);
    assert_relative_eq!(ratio, 1.0 - (-1.6f64).exp());
    assert!(ratio < THRESH);
    assert_relative_eq!(capped_offset(80.0, AXIS, THRESH), 53.87, epsilon = 0.01);
}

#[test]
fn above_threshold_snaps_to_axis_length() {
    assert!(1.0 - (-2.0f64).exp() > THRESH);
    assert_eq!(capped_offset(100.0, AXIS, THRESH), AXIS);
}

#[test]
fn offsets_are_monotonic() {
    let mut prev = 0.0;
    for n in 0..=100 {
        let off = capped_offset(f64::from(n), AXIS, THRESH);
        assert!(off >= prev, "offset({n}) = {off} < {prev}");
        assert!(off <= AXIS);
        prev = off;
    }
}

#[test]
fn negative_input_is_clamped_to_zero() {
    assert_eq!(saturating_ratio(-10.0, THRESH), 0.0);
}

#[test]
fn curve_defaults_match_free_functions() {
    let curve = OffsetCurve::default();
    assert_eq!(curve.threshold, 0.8);
    assert_eq!(curve.offset(42.0, AXIS), capped_offset(42.0, AXIS, 0.8));
    assert_eq!(curve.ratio(100.0), 1.0);
}
