//! # Answers and Verdicts
//!
//! `RequirementAnswer` is the value a user gives to a single question;
//! `AreaVerdict` is the assessor's score for a whole area. Both are nullable
//! in the model (`Option<_>`): `None` means "not answered yet".
//!
//! The wire format is SCREAMING_SNAKE_CASE. The Polish labels of the
//! original questionnaire are accepted on input so that exported RODO
//! worksheets can be loaded as-is; output always uses the canonical form.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RodoError;

/// Answer to a single requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementAnswer {
    /// The requirement is met.
    #[serde(alias = "TAK")]
    Yes,
    /// The requirement is not met.
    #[serde(alias = "NIE")]
    No,
    /// Work to meet the requirement is under way.
    #[serde(alias = "W REALIZACJI")]
    InProgress,
    /// The requirement does not apply to the organisation.
    #[serde(alias = "ND")]
    NotApplicable,
}

impl RequirementAnswer {
    /// All answers in canonical order.
    pub fn all() -> &'static [RequirementAnswer] {
        &[Self::Yes, Self::No, Self::InProgress, Self::NotApplicable]
    }

    /// Canonical string identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::InProgress => "IN_PROGRESS",
            Self::NotApplicable => "NOT_APPLICABLE",
        }
    }

    /// Whether the requirement counts towards compliance percentages.
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }
}

impl std::fmt::Display for RequirementAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequirementAnswer {
    type Err = RodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "YES" | "TAK" => Ok(Self::Yes),
            "NO" | "NIE" => Ok(Self::No),
            "IN_PROGRESS" | "W REALIZACJI" => Ok(Self::InProgress),
            "NOT_APPLICABLE" | "ND" => Ok(Self::NotApplicable),
            other => Err(RodoError::InvalidValue {
                field: "requirement answer",
                value: other.to_string(),
            }),
        }
    }
}

/// Assessor's verdict for an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaVerdict {
    /// The area is compliant.
    #[serde(alias = "POZYTYWNA")]
    Positive,
    /// The area is compliant with reservations.
    #[serde(alias = "ZASTRZEŻENIA")]
    Warning,
    /// The area is not compliant.
    #[serde(alias = "NEGATYWNA")]
    Negative,
    /// Remediation of the area is under way.
    #[serde(alias = "W REALIZACJI")]
    InProgress,
    /// The area does not apply.
    #[serde(alias = "NIE DOTYCZY")]
    NotApplicable,
}

impl AreaVerdict {
    /// All verdicts in canonical order.
    pub fn all() -> &'static [AreaVerdict] {
        &[
            Self::Positive,
            Self::Warning,
            Self::Negative,
            Self::InProgress,
            Self::NotApplicable,
        ]
    }

    /// Canonical string identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Warning => "WARNING",
            Self::Negative => "NEGATIVE",
            Self::InProgress => "IN_PROGRESS",
            Self::NotApplicable => "NOT_APPLICABLE",
        }
    }
}

impl std::fmt::Display for AreaVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AreaVerdict {
    type Err = RodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "POSITIVE" | "POZYTYWNA" => Ok(Self::Positive),
            "WARNING" | "ZASTRZEŻENIA" => Ok(Self::Warning),
            "NEGATIVE" | "NEGATYWNA" => Ok(Self::Negative),
            "IN_PROGRESS" | "W REALIZACJI" => Ok(Self::InProgress),
            "NOT_APPLICABLE" | "NIE DOTYCZY" => Ok(Self::NotApplicable),
            other => Err(RodoError::InvalidValue {
                field: "area verdict",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_as_str_roundtrip() {
        for answer in RequirementAnswer::all() {
            let parsed: RequirementAnswer = answer.as_str().parse().unwrap();
            assert_eq!(*answer, parsed);
        }
    }

    #[test]
    fn verdict_as_str_roundtrip() {
        for verdict in AreaVerdict::all() {
            let parsed: AreaVerdict = verdict.as_str().parse().unwrap();
            assert_eq!(*verdict, parsed);
        }
    }

    #[test]
    fn serde_format_matches_as_str() {
        for answer in RequirementAnswer::all() {
            let json = serde_json::to_string(answer).unwrap();
            assert_eq!(json, format!("\"{}\"", answer.as_str()));
        }
        for verdict in AreaVerdict::all() {
            let json = serde_json::to_string(verdict).unwrap();
            assert_eq!(json, format!("\"{}\"", verdict.as_str()));
        }
    }

    #[test]
    fn polish_labels_are_accepted() {
        assert_eq!("TAK".parse::<RequirementAnswer>().unwrap(), RequirementAnswer::Yes);
        assert_eq!("ND".parse::<RequirementAnswer>().unwrap(), RequirementAnswer::NotApplicable);
        assert_eq!("ZASTRZEŻENIA".parse::<AreaVerdict>().unwrap(), AreaVerdict::Warning);

        let answer: RequirementAnswer = serde_json::from_str("\"W REALIZACJI\"").unwrap();
        assert_eq!(answer, RequirementAnswer::InProgress);
        let verdict: AreaVerdict = serde_json::from_str("\"NIE DOTYCZY\"").unwrap();
        assert_eq!(verdict, AreaVerdict::NotApplicable);
    }

    #[test]
    fn unknown_values_rejected() {
        assert!("yes".parse::<RequirementAnswer>().is_err()); // case-sensitive
        assert!("".parse::<RequirementAnswer>().is_err());
        assert!("MAYBE".parse::<AreaVerdict>().is_err());
    }

    #[test]
    fn only_not_applicable_is_excluded() {
        assert!(RequirementAnswer::Yes.is_applicable());
        assert!(RequirementAnswer::No.is_applicable());
        assert!(RequirementAnswer::InProgress.is_applicable());
        assert!(!RequirementAnswer::NotApplicable.is_applicable());
    }
}
