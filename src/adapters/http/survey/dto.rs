//! HTTP DTOs for the survey protocol endpoints.
//!
//! Survey platforms post embedded-data fields as strings, so every numeric
//! request field also accepts its string form.

use serde::{Deserialize, Serialize};

use crate::application::NewProfile;

/// Marker value that switches an operation into test mode.
const TEST_FLAG: &str = "test";

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a respondent profile.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(default, deserialize_with = "flex::opt_int")]
    pub survey_id: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_float")]
    pub sample_percentage_theta: Option<f64>,
    #[serde(default)]
    pub test: Option<String>,
}

impl CreateProfileRequest {
    pub fn is_test(&self) -> bool {
        self.test.as_deref() == Some(TEST_FLAG)
    }
}

/// Request for the first design of a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ChooseFirstDesignRequest {
    #[serde(default, deserialize_with = "flex::opt_int")]
    pub profile_id: Option<i64>,
    /// Accepted for protocol compatibility; survey frontends echo it back
    /// from profile creation but no operation reads it.
    #[serde(default, deserialize_with = "flex::opt_bool")]
    pub monthly_payment: Option<bool>,
    #[serde(default, deserialize_with = "flex::opt_float")]
    pub base_earnings: Option<f64>,
    #[serde(default)]
    pub characteristic_a: Option<String>,
    #[serde(default)]
    pub characteristic_b: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_float")]
    pub sample_percentage_designs: Option<f64>,
    #[serde(default)]
    pub test: Option<String>,
}

impl ChooseFirstDesignRequest {
    pub fn is_test(&self) -> bool {
        self.test.as_deref() == Some(TEST_FLAG)
    }
}

/// Request to record an answer and fetch the next design.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAndChooseDesignRequest {
    #[serde(default, deserialize_with = "flex::opt_int")]
    pub qnumber: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_int")]
    pub profile_id: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_int")]
    pub answer: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_float")]
    pub base_earnings: Option<f64>,
    #[serde(default)]
    pub characteristic_a: Option<String>,
    #[serde(default)]
    pub characteristic_b: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_float")]
    pub sample_percentage_designs: Option<f64>,
    #[serde(default)]
    pub test: Option<String>,
}

impl UpdateAndChooseDesignRequest {
    pub fn is_test(&self) -> bool {
        self.test.as_deref() == Some(TEST_FLAG)
    }
}

/// Request to record the final answer and return posterior estimates.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAndReturnEstimatesRequest {
    #[serde(default, deserialize_with = "flex::opt_int")]
    pub profile_id: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_int")]
    pub answer: Option<i64>,
    #[serde(default)]
    pub test: Option<String>,
}

impl UpdateAndReturnEstimatesRequest {
    pub fn is_test(&self) -> bool {
        self.test.as_deref() == Some(TEST_FLAG)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response to profile creation: the engine id plus the scenario metadata
/// the caller must echo back on later calls.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProfileResponse {
    pub profile_id: i64,
    pub characteristic_a: String,
    pub characteristic_b: String,
    pub monthly_payment: bool,
    pub base_earnings: f64,
}

impl From<NewProfile> for CreateProfileResponse {
    fn from(profile: NewProfile) -> Self {
        Self {
            profile_id: profile.profile_id,
            characteristic_a: profile.characteristic_a,
            characteristic_b: profile.characteristic_b,
            monthly_payment: profile.monthly_payment,
            base_earnings: profile.base_earnings,
        }
    }
}

/// Posterior estimates, passed through from the engine unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct EstimatesResponse {
    pub estimates: Vec<f64>,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tolerant field deserializers
// ════════════════════════════════════════════════════════════════════════════

mod flex {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Bool(bool),
        Text(String),
    }

    fn to_int<E: serde::de::Error>(raw: Raw) -> Result<i64, E> {
        match raw {
            Raw::Int(v) => Ok(v),
            Raw::Float(v) if v.fract() == 0.0 => Ok(v as i64),
            Raw::Float(v) => Err(E::custom(format!("expected an integer, got {v}"))),
            Raw::Bool(_) => Err(E::custom("expected an integer, got a boolean")),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected an integer, got '{s}'"))),
        }
    }

    fn to_float<E: serde::de::Error>(raw: Raw) -> Result<f64, E> {
        match raw {
            Raw::Int(v) => Ok(v as f64),
            Raw::Float(v) => Ok(v),
            Raw::Bool(_) => Err(E::custom("expected a number, got a boolean")),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got '{s}'"))),
        }
    }

    fn to_bool<E: serde::de::Error>(raw: Raw) -> Result<bool, E> {
        match raw {
            Raw::Bool(v) => Ok(v),
            Raw::Int(v) => Ok(v != 0),
            Raw::Float(v) => Ok(v != 0.0),
            Raw::Text(s) => match s.trim() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(E::custom(format!("expected a boolean, got '{other}'"))),
            },
        }
    }

    pub fn opt_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Option::<Raw>::deserialize(deserializer)?
            .map(to_int)
            .transpose()
    }

    pub fn opt_float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Option::<Raw>::deserialize(deserializer)?
            .map(to_float)
            .transpose()
    }

    pub fn opt_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Option::<Raw>::deserialize(deserializer)?
            .map(to_bool)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_profile_request_accepts_numeric_fields() {
        let req: CreateProfileRequest =
            serde_json::from_str(r#"{"survey_id": 7, "sample_percentage_theta": 50}"#).unwrap();
        assert_eq!(req.survey_id, Some(7));
        assert_eq!(req.sample_percentage_theta, Some(50.0));
        assert!(!req.is_test());
    }

    #[test]
    fn create_profile_request_accepts_string_typed_numbers() {
        let req: CreateProfileRequest =
            serde_json::from_str(r#"{"survey_id": "7", "sample_percentage_theta": "50.5"}"#)
                .unwrap();
        assert_eq!(req.survey_id, Some(7));
        assert_eq!(req.sample_percentage_theta, Some(50.5));
    }

    #[test]
    fn create_profile_request_rejects_non_numeric_survey_id() {
        assert!(serde_json::from_str::<CreateProfileRequest>(r#"{"survey_id": "seven"}"#).is_err());
    }

    #[test]
    fn test_flag_requires_exact_marker() {
        let req: CreateProfileRequest =
            serde_json::from_str(r#"{"survey_id": 1, "test": "test"}"#).unwrap();
        assert!(req.is_test());
        let req: CreateProfileRequest =
            serde_json::from_str(r#"{"survey_id": 1, "test": "yes"}"#).unwrap();
        assert!(!req.is_test());
    }

    #[test]
    fn first_design_request_accepts_qualtrics_strings() {
        let req: ChooseFirstDesignRequest = serde_json::from_str(
            r#"{
                "profile_id": "42",
                "monthly_payment": "1",
                "base_earnings": "100",
                "characteristic_a": "characteristic_x",
                "characteristic_b": "characteristic_y"
            }"#,
        )
        .unwrap();
        assert_eq!(req.profile_id, Some(42));
        assert_eq!(req.monthly_payment, Some(true));
        assert_eq!(req.base_earnings, Some(100.0));
    }

    #[test]
    fn update_request_parses_answer_and_qnumber() {
        let req: UpdateAndChooseDesignRequest = serde_json::from_str(
            r#"{"qnumber": "3", "profile_id": 42, "answer": "2", "base_earnings": 100,
                "characteristic_a": "characteristic_x", "characteristic_b": "characteristic_y"}"#,
        )
        .unwrap();
        assert_eq!(req.qnumber, Some(3));
        assert_eq!(req.answer, Some(2));
    }

    #[test]
    fn estimates_response_serializes_as_named_array() {
        let response = EstimatesResponse {
            estimates: vec![0.25, 1.5],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["estimates"][0], 0.25);
        assert_eq!(json["estimates"][1], 1.5);
    }
}
