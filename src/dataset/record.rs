use serde::{de, Deserialize, Deserializer, Serialize};

use crate::features::{parse_flag, FeatureRecord, FeatureValue};

/// One labeled row of the training dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub heartbeat: f64,
    pub position: String,
    pub activity: String,
    pub time_of_day: String,
    pub phone_status: String,
    pub surrounding_noise_level: f64,
    #[serde(deserialize_with = "flag")]
    pub companion_presence: bool,
    #[serde(deserialize_with = "flag")]
    pub is_in_safe_zone: bool,

    // Read but never used as features
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub panic_button_pressed: Option<bool>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub alert_triggered: Option<bool>,
}

impl FeatureRecord for DatasetRecord {
    fn feature(&self, name: &str) -> Option<FeatureValue<'_>> {
        let value = match name {
            "heartbeat" => FeatureValue::Number(self.heartbeat),
            "position" => FeatureValue::Text(&self.position),
            "time_of_day" => FeatureValue::Text(&self.time_of_day),
            "phone_status" => FeatureValue::Text(&self.phone_status),
            "surrounding_noise_level" => FeatureValue::Number(self.surrounding_noise_level),
            "companion_presence" => FeatureValue::Bool(self.companion_presence),
            "is_in_safe_zone" => FeatureValue::Bool(self.is_in_safe_zone),
            _ => return None,
        };
        Some(value)
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("expected boolean-like value, got '{}'", raw)))
}

fn optional_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_flag(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected boolean-like value, got '{}'", raw))),
        _ => Ok(None),
    }
}
