//! Prediction request/response

use serde::{Deserialize, Serialize};

use crate::features::{FeatureRecord, FeatureValue};

/// A JSON scalar as sent by clients (browsers often send form values as strings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    fn as_feature(&self) -> FeatureValue<'_> {
        match self {
            RawValue::Bool(b) => FeatureValue::Bool(*b),
            RawValue::Number(n) => FeatureValue::Number(*n),
            RawValue::Text(s) => FeatureValue::Text(s),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// Body of `POST /predict`.
///
/// Every field is optional at the serde level so that an absent field is
/// reported as `missing_field` instead of a generic JSON error. Unknown keys
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat: Option<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_status: Option<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surrounding_noise_level: Option<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companion_presence: Option<RawValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_in_safe_zone: Option<RawValue>,
}

impl FeatureRecord for PredictionRequest {
    fn feature(&self, name: &str) -> Option<FeatureValue<'_>> {
        let value = match name {
            "heartbeat" => &self.heartbeat,
            "position" => &self.position,
            "time_of_day" => &self.time_of_day,
            "phone_status" => &self.phone_status,
            "surrounding_noise_level" => &self.surrounding_noise_level,
            "companion_presence" => &self.companion_presence,
            "is_in_safe_zone" => &self.is_in_safe_zone,
            _ => return None,
        };
        value.as_ref().map(RawValue::as_feature)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_activity: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_LAYOUT;

    #[test]
    fn test_deserialize_browser_payload() {
        let json = serde_json::json!({
            "heartbeat": "72",
            "position": "pocket",
            "time_of_day": "morning",
            "phone_status": "locked",
            "surrounding_noise_level": 30,
            "companion_presence": false,
            "is_in_safe_zone": 1,
            "panic_button_pressed": false,
            "latitude": 12.97,
            "longitude": 77.59
        });

        let request: PredictionRequest = serde_json::from_value(json).unwrap();

        assert_eq!(request.heartbeat, Some(RawValue::Text("72".into())));
        assert_eq!(request.surrounding_noise_level, Some(RawValue::Number(30.0)));
        assert_eq!(request.companion_presence, Some(RawValue::Bool(false)));
        for column in FEATURE_LAYOUT {
            assert!(request.feature(column.name).is_some(), "{} should be present", column.name);
        }
    }

    #[test]
    fn test_null_and_absent_are_missing() {
        let json = serde_json::json!({ "heartbeat": null });
        let request: PredictionRequest = serde_json::from_value(json).unwrap();

        assert_eq!(request.feature("heartbeat"), None);
        assert_eq!(request.feature("position"), None);
    }
}
