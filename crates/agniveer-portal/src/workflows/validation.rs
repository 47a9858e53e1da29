use chrono::NaiveDate;
use serde::Serialize;

/// Recoverable rule violations reported by the leave and assessment engines.
///
/// Each variant carries the numbers a caller needs to render an exact message,
/// so nothing here is fatal and nothing is retried.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("leave of {requested} days exceeds maximum single-application duration of {max} days")]
    DurationExceeded { requested: u32, max: u32 },
    #[error(
        "insufficient leave balance: {requested} days requested, only {remaining} days remaining"
    )]
    InsufficientBalance { requested: u32, remaining: i64 },
    #[error("malformed leave span: end date {end} is before start date {start}")]
    MalformedSpan { start: NaiveDate, end: NaiveDate },
    #[error("score {score} is outside the permitted range 0..={max_marks}")]
    OutOfRangeScore { score: f64, max_marks: f64 },
}

impl ValidationError {
    /// Stable machine-readable discriminator, matching the serialized `kind`.
    pub const fn kind(&self) -> &'static str {
        match self {
            ValidationError::DurationExceeded { .. } => "duration_exceeded",
            ValidationError::InsufficientBalance { .. } => "insufficient_balance",
            ValidationError::MalformedSpan { .. } => "malformed_span",
            ValidationError::OutOfRangeScore { .. } => "out_of_range_score",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_balance_message_reports_exact_remaining() {
        let error = ValidationError::InsufficientBalance {
            requested: 26,
            remaining: 25,
        };
        assert_eq!(
            error.to_string(),
            "insufficient leave balance: 26 days requested, only 25 days remaining"
        );
    }

    #[test]
    fn serialized_kind_matches_discriminator() {
        let error = ValidationError::DurationExceeded {
            requested: 31,
            max: 30,
        };
        let value = serde_json::to_value(&error).expect("serializes");
        assert_eq!(value["kind"], error.kind());
        assert_eq!(value["requested"], 31);
        assert_eq!(value["max"], 30);
    }
}
