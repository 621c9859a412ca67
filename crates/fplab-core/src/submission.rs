//! Bodies exchanged with the ingestion service.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::record::FeatureRecord;

/// Settings of the run that produced a record, reported alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub browser: String,
    pub privacy_max: bool,
    pub incognito: bool,
    pub extensions: Vec<String>,
}

/// Body of `POST /api/testing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestingSubmission {
    pub timestamp: String,
    pub config: RunConfig,
    pub features: FeatureRecord,
}

impl TestingSubmission {
    /// Stamp a finished record with the client-side capture time.
    #[must_use]
    pub fn new(config: RunConfig, features: FeatureRecord, captured_at: DateTime<Utc>) -> Self {
        Self {
            timestamp: captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            config,
            features,
        }
    }
}

/// Body of `POST /api/fingerprint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourSubmission {
    #[serde(rename = "fingerprintId")]
    pub fingerprint_id: String,
    pub behaviour: i64,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::value::SignalValue;

    #[test]
    fn testing_submission_has_expected_shape() {
        let captured_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let submission = TestingSubmission::new(
            RunConfig {
                browser: "firefox".to_string(),
                privacy_max: true,
                incognito: false,
                extensions: vec!["noscript".to_string()],
            },
            FeatureRecord::from_fn(|_| SignalValue::text("x")),
            captured_at,
        );

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["timestamp"], "2026-03-01T12:00:00.000Z");
        assert_eq!(json["config"]["browser"], "firefox");
        assert_eq!(json["config"]["privacy_max"], true);
        assert_eq!(json["config"]["extensions"][0], "noscript");
        assert_eq!(json["features"]["Canvas Fingerprint"], "x");
        assert_eq!(json["features"].as_object().unwrap().len(), 31);
    }

    #[test]
    fn behaviour_submission_uses_camel_case_id() {
        let body = BehaviourSubmission {
            fingerprint_id: "abc".to_string(),
            behaviour: 3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"fingerprintId": "abc", "behaviour": 3}));
    }
}
