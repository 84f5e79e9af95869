use crate::identity::Identifiers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What `aws lambda invoke` prints on stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationSummary {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub executed_version: Option<String>,
    #[serde(default)]
    pub function_error: Option<String>,
}

impl InvocationSummary {
    pub fn try_parse(stdout: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(stdout.trim())
    }

    /// Falls back to an empty summary on output that is not the expected
    /// JSON, logging what was received.
    pub fn parse(stdout: &str) -> Self {
        Self::try_parse(stdout).unwrap_or_else(|e| {
            warn!(
                stdout = %stdout.trim(),
                error = %e,
                "Unexpected invoke output; function errors cannot be detected"
            );
            Self::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionReport {
    pub identifiers: Identifiers,
    pub invocation: InvocationSummary,
    pub readiness_checks: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invoke_output() {
        let summary = InvocationSummary::parse(
            r#"{ "StatusCode": 200, "ExecutedVersion": "$LATEST" }"#,
        );
        assert_eq!(summary.status_code, Some(200));
        assert_eq!(summary.executed_version.as_deref(), Some("$LATEST"));
        assert_eq!(summary.function_error, None);

        let failed = InvocationSummary::parse(
            r#"{"StatusCode":200,"FunctionError":"Unhandled","ExecutedVersion":"$LATEST"}"#,
        );
        assert_eq!(failed.function_error.as_deref(), Some("Unhandled"));
    }

    #[test]
    fn test_try_parse_rejects_text_output() {
        assert!(InvocationSummary::try_parse("$LATEST\tUnhandled\t200\n").is_err());
        assert!(InvocationSummary::try_parse("").is_err());
        let summary = InvocationSummary::try_parse(r#"{"StatusCode":200}"#).unwrap();
        assert_eq!(summary.status_code, Some(200));
    }

    #[test]
    fn test_parse_text_output_is_empty_summary() {
        assert_eq!(
            InvocationSummary::parse("200\t$LATEST"),
            InvocationSummary::default()
        );
        assert_eq!(InvocationSummary::parse(""), InvocationSummary::default());
    }
}
