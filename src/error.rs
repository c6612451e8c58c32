//! Error types for summary statistics computation.
//!
//! Every failure here is an invalid-argument condition: the input sequences
//! have inconsistent lengths. Errors always carry the offending lengths.

use thiserror::Error;

/// Errors that can occur when computing summary statistics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// `times` and `charges` of a single sensor differ in length.
    #[error("times and charges must have the same length, got {times} and {charges}")]
    LengthMismatch {
        /// Number of pulse times.
        times: usize,
        /// Number of pulse charges.
        charges: usize,
    },

    /// The outer lists of a batch differ in length.
    #[error(
        "times_list and charges_list must have the same length, got {times_list} and {charges_list}"
    )]
    BatchLengthMismatch {
        /// Number of per-sensor time sequences.
        times_list: usize,
        /// Number of per-sensor charge sequences.
        charges_list: usize,
    },

    /// A column of a photon table does not match the length of `t`.
    #[error("photon column '{column}' has length {actual}, expected {expected}")]
    ColumnLengthMismatch {
        /// Name of the offending column.
        column: &'static str,
        /// Length of the `t` column.
        expected: usize,
        /// Length of the offending column.
        actual: usize,
    },
}

impl SummaryError {
    /// Creates a per-sensor length mismatch error.
    #[must_use]
    pub const fn length_mismatch(times: usize, charges: usize) -> Self {
        Self::LengthMismatch { times, charges }
    }

    /// Creates a batch length mismatch error.
    #[must_use]
    pub const fn batch_mismatch(times_list: usize, charges_list: usize) -> Self {
        Self::BatchLengthMismatch {
            times_list,
            charges_list,
        }
    }

    /// Whether this is an invalid-argument error. Always true: malformed
    /// input is the only way the computation fails.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. }
                | Self::BatchLengthMismatch { .. }
                | Self::ColumnLengthMismatch { .. }
        )
    }
}

/// Result type for summary statistics operations.
pub type SummaryResult<T> = Result<T, SummaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = SummaryError::length_mismatch(1, 2);
        assert_eq!(
            err.to_string(),
            "times and charges must have the same length, got 1 and 2"
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_batch_mismatch_message() {
        let err = SummaryError::batch_mismatch(1, 2);
        assert!(err.to_string().contains("got 1 and 2"));
    }

    #[test]
    fn test_column_mismatch_message() {
        let err = SummaryError::ColumnLengthMismatch {
            column: "sensor_id",
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "photon column 'sensor_id' has length 2, expected 3"
        );
    }
}
