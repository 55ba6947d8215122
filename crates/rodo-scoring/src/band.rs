//! Score bands for 0..=100 scores.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreBand {
    /// 80 and above.
    Good,
    /// 60 up to (not including) 80.
    Fair,
    /// Below 60.
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Good
        } else if score >= 60.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Poor => "POOR",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(ScoreBand::from_score(100.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(79.9), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(59.9), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0.0), ScoreBand::Poor);
    }

    #[test]
    fn nan_is_poor() {
        assert_eq!(ScoreBand::from_score(f64::NAN), ScoreBand::Poor);
    }
}
