//! Integration tests for the survey HTTP endpoints.
//!
//! A mock engine stands in for the stored procedures so the tests can drive
//! the full request path: routing, DTO parsing, protocol orchestration,
//! decoding, and error mapping.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bace_backend::adapters::http::{survey_routes, SurveyState};
use bace_backend::application::SurveyController;
use bace_backend::config::ExperimentConfig;
use bace_backend::domain::{CharacteristicRegistry, ChosenDesign, DesignVector};
use bace_backend::ports::{DesignEngine, EngineError};

// =============================================================================
// Test infrastructure
// =============================================================================

/// Mock design engine with scripted responses and call recording.
struct MockEngine {
    profile_id: i64,
    design: [f64; 4],
    estimates: Vec<f64>,
    profile_exists: bool,
    last_answer: Mutex<Option<i32>>,
    last_allow_repeats: Mutex<Option<bool>>,
    random_calls: Mutex<u32>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            profile_id: 42,
            design: [5.0, 2.0, 1.0, 1.0],
            estimates: vec![0.1, 0.2, 0.3],
            profile_exists: true,
            last_answer: Mutex::new(None),
            last_allow_repeats: Mutex::new(None),
            random_calls: Mutex::new(0),
        }
    }
}

impl MockEngine {
    fn chosen(&self) -> ChosenDesign {
        ChosenDesign {
            index_d: Some(3),
            design: DesignVector::new(self.design),
        }
    }

    fn check_profile(&self, profile_id: i64) -> Result<(), EngineError> {
        if self.profile_exists {
            Ok(())
        } else {
            Err(EngineError::ProfileNotFound { profile_id })
        }
    }
}

#[async_trait]
impl DesignEngine for MockEngine {
    async fn create_profile(
        &self,
        _survey_id: i64,
        _sample_percentage_theta: f64,
    ) -> Result<i64, EngineError> {
        Ok(self.profile_id)
    }

    async fn choose_design(
        &self,
        profile_id: i64,
        _sample_percentage_designs: f64,
    ) -> Result<ChosenDesign, EngineError> {
        self.check_profile(profile_id)?;
        Ok(self.chosen())
    }

    async fn update_and_choose_design(
        &self,
        profile_id: i64,
        answer: i32,
        _sample_percentage_designs: f64,
        allow_repeats: bool,
    ) -> Result<ChosenDesign, EngineError> {
        self.check_profile(profile_id)?;
        *self.last_answer.lock().unwrap() = Some(answer);
        *self.last_allow_repeats.lock().unwrap() = Some(allow_repeats);
        Ok(self.chosen())
    }

    async fn update_and_return_estimates(
        &self,
        profile_id: i64,
        answer: i32,
    ) -> Result<Vec<f64>, EngineError> {
        self.check_profile(profile_id)?;
        *self.last_answer.lock().unwrap() = Some(answer);
        Ok(self.estimates.clone())
    }

    async fn random_design(&self) -> Result<ChosenDesign, EngineError> {
        *self.random_calls.lock().unwrap() += 1;
        Ok(ChosenDesign {
            index_d: None,
            design: DesignVector::new(self.design),
        })
    }
}

fn app(engine: Arc<MockEngine>, settings: ExperimentConfig) -> Router {
    let registry = Arc::new(CharacteristicRegistry::for_version(
        settings.registry_version,
    ));
    let controller = Arc::new(SurveyController::new(engine, registry, settings));
    survey_routes(SurveyState::new(controller))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// =============================================================================
// Protocol scenarios
// =============================================================================

#[tokio::test]
async fn create_profile_returns_engine_id_and_scenario_metadata() {
    let app = app(Arc::new(MockEngine::default()), ExperimentConfig::default());

    let response = app
        .oneshot(json_request("POST", "/create_profile", json!({"survey_id": 7})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["profile_id"], 42);
    assert_eq!(body["base_earnings"], 100.0);
    let a = body["characteristic_a"].as_str().unwrap();
    let b = body["characteristic_b"].as_str().unwrap();
    assert_ne!(a, b);
    for key in [a, b] {
        assert!(["characteristic_x", "characteristic_y"].contains(&key));
    }
    assert!(body["monthly_payment"].is_boolean());
}

#[tokio::test]
async fn first_design_decodes_the_engine_vector() {
    let app = app(Arc::new(MockEngine::default()), ExperimentConfig::default());

    // Qualtrics-style string-typed numerics.
    let response = app
        .oneshot(json_request(
            "PUT",
            "/choose_first_design",
            json!({
                "profile_id": "42",
                "monthly_payment": "1",
                "base_earnings": "100",
                "characteristic_a": "characteristic_x",
                "characteristic_b": "characteristic_y"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["base_earnings_0"], 100.0);
    assert_eq!(body["treat_earnings_0"], 105.0);
    assert_eq!(body["base_a_0"], 0.0);
    assert_eq!(body["base_b_0"], 0.0);
    assert_eq!(body["treat_a_0"], 2.0);
    assert_eq!(body["treat_b_0"], 1.0);
    assert_eq!(body["diff_earnings_0"], 5.0);
    assert!(body["treat_img_0"]
        .as_str()
        .unwrap()
        .contains("IM_8qqRVOS6rtEqN2m"));
    assert_eq!(body["label_a"], "Characteristic X - Tree Size");
}

#[tokio::test]
async fn update_decodes_at_the_given_question_number() {
    let engine = Arc::new(MockEngine::default());
    let app = app(engine.clone(), ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/update_and_choose_design",
            json!({
                "qnumber": "4",
                "profile_id": 42,
                "answer": 1,
                "base_earnings": 100,
                "characteristic_a": "characteristic_x",
                "characteristic_b": "characteristic_y"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["base_earnings_4"], 100.0);
    assert_eq!(body["treat_earnings_4"], 105.0);
    assert!(body.get("base_earnings_0").is_none());
    assert_eq!(*engine.last_answer.lock().unwrap(), Some(1));
    assert_eq!(*engine.last_allow_repeats.lock().unwrap(), Some(false));
}

#[tokio::test]
async fn answers_normalize_against_the_treated_sentinel() {
    // Default sentinel 1: raw answer 1 is the treated option.
    let engine = Arc::new(MockEngine::default());
    let router = app(engine.clone(), ExperimentConfig::default());
    let response = router
        .oneshot(json_request(
            "PUT",
            "/update_and_return_estimates",
            json!({"profile_id": 42, "answer": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["estimates"], json!([0.1, 0.2, 0.3]));
    assert_eq!(*engine.last_answer.lock().unwrap(), Some(1));

    // Sentinel 2: the same raw answer is no longer treated.
    let engine = Arc::new(MockEngine::default());
    let settings = ExperimentConfig {
        treated_answer_value: 2,
        ..Default::default()
    };
    let router = app(engine.clone(), settings);
    let response = router
        .oneshot(json_request(
            "PUT",
            "/update_and_return_estimates",
            json!({"profile_id": 42, "answer": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(*engine.last_answer.lock().unwrap(), Some(0));
}

#[tokio::test]
async fn random_design_returns_the_raw_vector() {
    let app = app(Arc::new(MockEngine::default()), ExperimentConfig::default());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/random_design")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["design"], json!([5.0, 2.0, 1.0, 1.0]));
    assert_eq!(body["index_d"], Value::Null);
}

// =============================================================================
// Test mode
// =============================================================================

#[tokio::test]
async fn test_mode_profile_is_canned_and_engine_free() {
    let engine = Arc::new(MockEngine::default());
    let app = app(engine.clone(), ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "POST",
            "/create_profile",
            json!({"test": "test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["profile_id"], 0);
    assert_eq!(body["characteristic_a"], "TEST");
    assert_eq!(body["characteristic_b"], "TEST");
    assert_eq!(*engine.random_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_mode_design_uses_random_fallback_with_sentinel_labels() {
    let engine = Arc::new(MockEngine::default());
    let app = app(engine.clone(), ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/choose_first_design",
            json!({"test": "test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["label_a"], "TEST");
    assert_eq!(body["label_b"], "TEST");
    assert_eq!(body["base_earnings_0"], 100.0);
    assert_eq!(*engine.random_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_mode_update_keeps_the_question_number_suffix() {
    let engine = Arc::new(MockEngine::default());
    let app = app(engine.clone(), ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/update_and_choose_design",
            json!({"qnumber": 1, "test": "test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["label_a"], "TEST");
    assert_eq!(body["label_b"], "TEST");
    assert_eq!(body["base_earnings_1"], 100.0);
    assert!(body.get("base_earnings_0").is_none());
    assert_eq!(*engine.random_calls.lock().unwrap(), 1);
    assert!(engine.last_answer.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_mode_estimates_mark_each_element() {
    let app = app(Arc::new(MockEngine::default()), ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/update_and_return_estimates",
            json!({"test": "test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["estimates"], json!(["test", "test", "test", "test"]));
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn missing_required_field_is_a_validation_error() {
    let app = app(Arc::new(MockEngine::default()), ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/choose_first_design",
            json!({"base_earnings": 100}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["message"].as_str().unwrap().contains("profile_id"));
}

#[tokio::test]
async fn unknown_characteristic_is_a_validation_error() {
    let app = app(Arc::new(MockEngine::default()), ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/choose_first_design",
            json!({
                "profile_id": 42,
                "base_earnings": 100,
                "characteristic_a": "characteristic_q",
                "characteristic_b": "characteristic_y"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn unknown_design_pattern_is_a_decode_error() {
    let engine = Arc::new(MockEngine {
        design: [1.0, 9.0, 9.0, 9.0],
        ..Default::default()
    });
    let app = app(engine, ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/choose_first_design",
            json!({
                "profile_id": 42,
                "base_earnings": 100,
                "characteristic_a": "characteristic_x",
                "characteristic_b": "characteristic_y"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["code"], "DECODE_ERROR");
}

#[tokio::test]
async fn missing_profile_maps_to_not_found() {
    let engine = Arc::new(MockEngine {
        profile_exists: false,
        ..Default::default()
    });
    let app = app(engine, ExperimentConfig::default());

    let response = app
        .oneshot(json_request(
            "PUT",
            "/choose_first_design",
            json!({
                "profile_id": 42,
                "base_earnings": 100,
                "characteristic_a": "characteristic_x",
                "characteristic_b": "characteristic_y"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["code"], "PROFILE_NOT_FOUND");
}
