//! Structured JSON body for error responses.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uplift_spi::{Arm, UpliftError};

/// Wire form of an [`UpliftError`].
///
/// `error` is a stable kind string for programmatic handling, `detail` is for
/// humans. The remaining fields are present only for the kinds that carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arm: Option<Arm>,
}

impl ErrorBody {
    fn bare(kind: &str, detail: String) -> Self {
        Self {
            error: kind.to_string(),
            detail,
            index: None,
            field: None,
            missing: None,
            key: None,
            value: None,
            limit: None,
            actual: None,
            arm: None,
        }
    }
}

/// An explicit `"value": null` reads back as `Some(Value::Null)`; only an
/// absent field is `None`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<&UpliftError> for ErrorBody {
    fn from(err: &UpliftError) -> Self {
        let mut body = Self::bare(err.kind(), err.to_string());
        body.index = err.index();
        match err {
            UpliftError::MissingField { field } => body.field = Some(field.clone()),
            UpliftError::MissingFeature { missing, .. } => body.missing = Some(missing.clone()),
            UpliftError::InvalidFeatureValue { key, value, .. } => {
                body.key = Some(key.clone());
                // Some(Null) still serializes as "value": null
                body.value = Some(value.clone());
            }
            UpliftError::BatchTooLarge { limit, actual } => {
                body.limit = Some(*limit);
                body.actual = Some(*actual);
            }
            UpliftError::PayloadTooLarge { limit } => body.limit = Some(*limit),
            UpliftError::ScoringFailure { arm, .. } => body.arm = Some(*arm),
            _ => {}
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_feature_body() {
        let err = UpliftError::MissingFeature {
            index: 2,
            missing: vec!["f7".to_string()],
        };
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["error"], "MissingFeature");
        assert_eq!(body["index"], 2);
        assert_eq!(body["missing"], json!(["f7"]));
        assert!(body.get("key").is_none());
        assert!(body["detail"].as_str().unwrap().contains("f7"));
    }

    #[test]
    fn test_empty_batch_body_has_only_kind_and_detail() {
        let body = serde_json::to_value(ErrorBody::from(&UpliftError::EmptyBatch)).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(body["error"], "EmptyBatch");
    }

    #[test]
    fn test_invalid_value_null_is_reported() {
        let err = UpliftError::InvalidFeatureValue {
            index: 0,
            key: "f3".to_string(),
            value: Value::Null,
        };
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["key"], "f3");
        assert!(body.as_object().unwrap().contains_key("value"));
        assert!(body["value"].is_null());
    }

    #[test]
    fn test_null_value_survives_deserialization() {
        let err = UpliftError::InvalidFeatureValue {
            index: 0,
            key: "f3".to_string(),
            value: Value::Null,
        };
        let body = ErrorBody::from(&err);
        let text = serde_json::to_string(&body).unwrap();
        let parsed: ErrorBody = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.value, Some(Value::Null));
        assert_eq!(parsed, body);
    }

    #[test]
    fn test_absent_value_deserializes_to_none() {
        let parsed: ErrorBody =
            serde_json::from_str(r#"{"error": "EmptyBatch", "detail": "empty"}"#).unwrap();
        assert_eq!(parsed.value, None);
    }

    #[test]
    fn test_payload_too_large_body_carries_limit() {
        let err = UpliftError::PayloadTooLarge { limit: 4096 };
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["error"], "PayloadTooLarge");
        assert_eq!(body["limit"], 4096);
        assert!(body.get("actual").is_none());
    }

    #[test]
    fn test_scoring_failure_body_names_arm() {
        let err = UpliftError::ScoringFailure {
            index: 1,
            arm: Arm::Control,
            source: uplift_spi::ScoringError::NonFinite { value: f64::NAN },
        };
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["error"], "ScoringFailure");
        assert_eq!(body["arm"], "control");
        assert_eq!(body["index"], 1);
    }
}
