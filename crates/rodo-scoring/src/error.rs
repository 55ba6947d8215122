//! # Scoring Errors

use thiserror::Error;

/// Errors raised when constructing scoring inputs.
///
/// The aggregation functions themselves never fail; only inputs coming
/// from outside (risk areas, weights, snapshot scores, risk factors) are
/// validated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// A risk area has an out-of-range score or weight.
    #[error("invalid risk area {id}: {reason}")]
    InvalidRiskArea {
        /// Risk area id.
        id: u32,
        /// What is wrong with it.
        reason: String,
    },

    /// A snapshot area score is outside 0..=100.
    #[error("area {id}: score {score} outside 0..=100")]
    InvalidAreaScore {
        /// Area id.
        id: u32,
        /// The rejected score.
        score: f64,
    },

    /// A risk factor is outside 1..=5.
    #[error("{name} must be between 1 and 5, got {value}")]
    InvalidFactor {
        /// Factor name ("likelihood", "impact", "controls").
        name: &'static str,
        /// The rejected value.
        value: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_message() {
        let err = ScoringError::InvalidFactor {
            name: "impact",
            value: 9,
        };
        assert_eq!(err.to_string(), "impact must be between 1 and 5, got 9");
    }

    #[test]
    fn risk_area_message() {
        let err = ScoringError::InvalidRiskArea {
            id: 3,
            reason: "score 120 outside 0..=100".to_string(),
        };
        assert_eq!(err.to_string(), "invalid risk area 3: score 120 outside 0..=100");
    }
}
