use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Workflow-level status handed to downstream integrations.
///
/// Values outside the well-known set are carried verbatim in [`Outcome::Other`] so a
/// caller-defined status survives resolution unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    #[default]
    Scheduled,
    InProgress,
    Failed,
    Completed,
    Other(String),
}

impl Outcome {
    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Scheduled => "SCHEDULED",
            Outcome::InProgress => "IN_PROGRESS",
            Outcome::Failed => "FAILED",
            Outcome::Completed => "COMPLETED",
            Outcome::Other(value) => value.as_str(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "SCHEDULED" => Outcome::Scheduled,
            "IN_PROGRESS" => Outcome::InProgress,
            "FAILED" => Outcome::Failed,
            "COMPLETED" => Outcome::Completed,
            other => Outcome::Other(other.to_string()),
        })
    }
}

impl From<&str> for Outcome {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Outcome::from(raw.as_str()))
    }
}

/// Maps the prior outcome and the failure signal to the new outcome.
pub struct OutcomeResolver;

impl OutcomeResolver {
    /// - any failure forces `FAILED`;
    /// - otherwise `SCHEDULED` and `IN_PROGRESS` advance to `COMPLETED`;
    /// - every other prior value is returned as is.
    pub fn resolve(prior: &Outcome, any_failed: bool) -> Outcome {
        if any_failed {
            return Outcome::Failed;
        }
        match prior {
            Outcome::Scheduled | Outcome::InProgress => Outcome::Completed,
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_always_wins() {
        assert_eq!(
            OutcomeResolver::resolve(&Outcome::Scheduled, true),
            Outcome::Failed
        );
        assert_eq!(
            OutcomeResolver::resolve(&Outcome::InProgress, true),
            Outcome::Failed
        );
        assert_eq!(
            OutcomeResolver::resolve(&Outcome::Completed, true),
            Outcome::Failed
        );
        assert_eq!(
            OutcomeResolver::resolve(&Outcome::from("CANCELLED"), true),
            Outcome::Failed
        );
    }

    #[test]
    fn pending_states_complete_without_failures() {
        assert_eq!(
            OutcomeResolver::resolve(&Outcome::Scheduled, false),
            Outcome::Completed
        );
        assert_eq!(
            OutcomeResolver::resolve(&Outcome::InProgress, false),
            Outcome::Completed
        );
    }

    #[test]
    fn other_values_pass_through() {
        let cancelled = Outcome::from("CANCELLED");
        assert_eq!(OutcomeResolver::resolve(&cancelled, false), cancelled);
        assert_eq!(
            OutcomeResolver::resolve(&Outcome::Failed, false),
            Outcome::Failed
        );
        let custom = Outcome::from("needs-review");
        assert_eq!(OutcomeResolver::resolve(&custom, false).to_string(), "needs-review");
    }

    #[test]
    fn terminal_values_are_fixed_points() {
        let failed = OutcomeResolver::resolve(&Outcome::Scheduled, true);
        assert_eq!(OutcomeResolver::resolve(&failed, true), failed);
        let completed = OutcomeResolver::resolve(&Outcome::Scheduled, false);
        assert_eq!(OutcomeResolver::resolve(&completed, false), completed);
    }

    #[test]
    fn default_prior_is_scheduled() {
        assert_eq!(Outcome::default(), Outcome::Scheduled);
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(Outcome::from("FAILED"), Outcome::Failed);
        assert_eq!(Outcome::from("failed"), Outcome::Other("failed".into()));
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&Outcome::InProgress).unwrap(),
            r#""IN_PROGRESS""#
        );
        let parsed: Outcome = serde_json::from_str(r#""CANCELLED""#).unwrap();
        assert_eq!(parsed, Outcome::Other("CANCELLED".into()));
    }
}
