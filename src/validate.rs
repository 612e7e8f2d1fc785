//! Fixture-comparison harness.
//!
//! Runs inference on each bundled reference input and checks the result
//! against the bundled reference output. Any disagreement is fatal; there is
//! no partial-success notion.

use ndarray::ArrayD;
use tracing::info;

use crate::engine::Engine;
use crate::error::{ClassifyError, Result};
use crate::fixtures::FixtureSet;

/// Decimal places the reference comparison is performed at.
pub const DECIMAL_PLACES: u32 = 4;

/// Run every fixture input through the engine and compare against the
/// reference outputs at [`DECIMAL_PLACES`] decimal places.
///
/// Returns the computed outputs on success so the caller can report how many
/// predictions were made.
pub fn validate(engine: &mut Engine, fixtures: &FixtureSet) -> Result<Vec<ArrayD<f32>>> {
    let outputs = fixtures
        .inputs
        .iter()
        .map(|input| engine.run(input.clone()))
        .collect::<Result<Vec<_>>>()?;

    for (index, (expected, actual)) in fixtures.reference_outputs.iter().zip(&outputs).enumerate() {
        assert_outputs_close(expected, actual, index, DECIMAL_PLACES)?;
    }
    info!(count = outputs.len(), "All fixture outputs match their references");

    Ok(outputs)
}

/// Elementwise closeness check at `decimal_places` decimal places.
///
/// Tolerance matches `numpy.testing.assert_almost_equal`: a pair is close when
/// `|expected - actual| < 1.5 * 10^-decimal_places`. The first offending
/// element (or a shape disagreement) aborts the check.
pub fn assert_outputs_close(
    expected: &ArrayD<f32>,
    actual: &ArrayD<f32>,
    fixture: usize,
    decimal_places: u32,
) -> Result<()> {
    if expected.shape() != actual.shape() {
        return Err(ClassifyError::ValidationShapeMismatch {
            fixture,
            expected: expected.shape().to_vec(),
            actual: actual.shape().to_vec(),
        });
    }

    let tolerance = 1.5 * 10f32.powi(-(decimal_places as i32));
    for (index, (&e, &a)) in expected.iter().zip(actual.iter()).enumerate() {
        if (e - a).abs() >= tolerance {
            return Err(ClassifyError::ValidationMismatch {
                fixture,
                index,
                expected: e,
                actual: a,
                decimal_places,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    fn tensor(values: &[f32]) -> ArrayD<f32> {
        ArrayD::from_shape_vec(vec![values.len()], values.to_vec()).unwrap()
    }

    #[test]
    fn identical_outputs_pass() {
        let reference = tensor(&[0.125, -3.5, 7.25]);
        assert!(assert_outputs_close(&reference, &reference.clone(), 0, DECIMAL_PLACES).is_ok());
    }

    #[test]
    fn small_deviations_within_tolerance_pass() {
        let expected = tensor(&[1.0, 2.0, 3.0]);
        let actual = tensor(&[1.0001, 1.9999, 3.0001]);
        assert!(assert_outputs_close(&expected, &actual, 0, DECIMAL_PLACES).is_ok());
    }

    #[test]
    fn deviations_beyond_tolerance_fail() {
        let expected = tensor(&[1.0, 2.0, 3.0]);
        let actual = tensor(&[1.0, 2.0002, 3.0]);

        let err = assert_outputs_close(&expected, &actual, 2, DECIMAL_PLACES).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::ValidationMismatch {
                fixture: 2,
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn corrupted_reference_fails() {
        let actual = tensor(&[0.1, 0.9, -2.0, 4.5]);
        let corrupted = actual.mapv(|v| v + 1.0);

        let err = assert_outputs_close(&corrupted, &actual, 0, DECIMAL_PLACES).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::ValidationMismatch { fixture: 0, index: 0, .. }
        ));
    }

    #[test]
    fn shape_mismatch_fails() {
        let expected = ArrayD::from_shape_vec(vec![1, 4], vec![0.0; 4]).unwrap();
        let actual = ArrayD::from_shape_vec(vec![4], vec![0.0; 4]).unwrap();

        let err = assert_outputs_close(&expected, &actual, 1, DECIMAL_PLACES).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::ValidationShapeMismatch { fixture: 1, .. }
        ));
    }
}
