//! HTTP handlers for the survey protocol endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::{SurveyController, SurveyError};
use crate::domain::DecodeError;
use crate::ports::EngineError;

use super::dto::{
    ChooseFirstDesignRequest, CreateProfileRequest, CreateProfileResponse, ErrorResponse,
    EstimatesResponse, UpdateAndChooseDesignRequest, UpdateAndReturnEstimatesRequest,
};

/// Shared handler state.
#[derive(Clone)]
pub struct SurveyState {
    pub controller: Arc<SurveyController>,
}

impl SurveyState {
    pub fn new(controller: Arc<SurveyController>) -> Self {
        Self { controller }
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("VALIDATION_FAILED", message)),
    )
        .into_response()
}

/// Unwraps a required request field, or answers 400 for its absence.
fn require<T>(field: &'static str, value: Option<T>) -> Result<T, Response> {
    value.ok_or_else(|| bad_request(format!("missing required field '{field}'")))
}

/// Maps protocol failures onto a small closed set of client-facing errors.
///
/// Raw engine errors are never echoed; the status code distinguishes
/// "not found" from transient engine failure.
fn error_response(err: SurveyError) -> Response {
    let (status, code) = match &err {
        SurveyError::Decode(DecodeError::UnknownCharacteristic { .. }) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
        }
        SurveyError::Decode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DECODE_ERROR"),
        SurveyError::Engine(EngineError::ProfileNotFound { .. }) => {
            (StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND")
        }
        SurveyError::Engine(_) => (StatusCode::BAD_GATEWAY, "ENGINE_ERROR"),
    };
    tracing::warn!(%err, code, "survey operation failed");
    (status, Json(ErrorResponse::new(code, err.to_string()))).into_response()
}

/// GET / - deployment banner.
pub async fn home(State(state): State<SurveyState>) -> Html<String> {
    Html(format!(
        "<h1>Bayesian Adaptive Choice Experiment (BACE)</h1>\
         <br>Author: {}<br>\
         Your application is up and running.",
        state.controller.author_name()
    ))
}

/// POST /create_profile
pub async fn create_profile(
    State(state): State<SurveyState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Response, Response> {
    if req.is_test() {
        let stub = state.controller.test_profile();
        return Ok(Json(json!({
            "profile_id": stub.profile_id,
            "characteristic_a": stub.characteristic_a,
            "characteristic_b": stub.characteristic_b,
        }))
        .into_response());
    }

    let survey_id = require("survey_id", req.survey_id)?;
    let profile = state
        .controller
        .create_profile(survey_id, req.sample_percentage_theta)
        .await
        .map_err(error_response)?;
    Ok(Json(CreateProfileResponse::from(profile)).into_response())
}

/// PUT /choose_first_design
pub async fn choose_first_design(
    State(state): State<SurveyState>,
    Json(req): Json<ChooseFirstDesignRequest>,
) -> Result<Response, Response> {
    if req.is_test() {
        let presentation = state.controller.test_design(0).await.map_err(error_response)?;
        return Ok(Json(presentation.into_payload()).into_response());
    }

    let profile_id = require("profile_id", req.profile_id)?;
    let base_earnings = require("base_earnings", req.base_earnings)?;
    let characteristic_a = require("characteristic_a", req.characteristic_a)?;
    let characteristic_b = require("characteristic_b", req.characteristic_b)?;

    let presentation = state
        .controller
        .choose_first_design(
            profile_id,
            base_earnings,
            &characteristic_a,
            &characteristic_b,
            req.sample_percentage_designs,
        )
        .await
        .map_err(error_response)?;
    Ok(Json(presentation.into_payload()).into_response())
}

/// PUT /update_and_choose_design
pub async fn update_and_choose_design(
    State(state): State<SurveyState>,
    Json(req): Json<UpdateAndChooseDesignRequest>,
) -> Result<Response, Response> {
    let qnumber = require("qnumber", req.qnumber)?;
    let qnumber =
        u32::try_from(qnumber).map_err(|_| bad_request("qnumber must be non-negative"))?;

    if req.is_test() {
        let presentation = state
            .controller
            .test_design(qnumber)
            .await
            .map_err(error_response)?;
        return Ok(Json(presentation.into_payload()).into_response());
    }

    let profile_id = require("profile_id", req.profile_id)?;
    let answer = require("answer", req.answer)?;
    let base_earnings = require("base_earnings", req.base_earnings)?;
    let characteristic_a = require("characteristic_a", req.characteristic_a)?;
    let characteristic_b = require("characteristic_b", req.characteristic_b)?;

    let presentation = state
        .controller
        .update_and_choose_design(
            profile_id,
            qnumber,
            answer,
            base_earnings,
            &characteristic_a,
            &characteristic_b,
            req.sample_percentage_designs,
        )
        .await
        .map_err(error_response)?;
    Ok(Json(presentation.into_payload()).into_response())
}

/// PUT /update_and_return_estimates
pub async fn update_and_return_estimates(
    State(state): State<SurveyState>,
    Json(req): Json<UpdateAndReturnEstimatesRequest>,
) -> Result<Response, Response> {
    if req.is_test() {
        let markers = state.controller.test_estimates().await.map_err(error_response)?;
        return Ok(Json(json!({ "estimates": markers })).into_response());
    }

    let profile_id = require("profile_id", req.profile_id)?;
    let answer = require("answer", req.answer)?;

    let estimates = state
        .controller
        .update_and_return_estimates(profile_id, answer)
        .await
        .map_err(error_response)?;
    Ok(Json(EstimatesResponse { estimates }).into_response())
}

/// GET /random_design
pub async fn random_design(State(state): State<SurveyState>) -> Result<Response, Response> {
    let chosen = state.controller.random_design().await.map_err(error_response)?;
    Ok(Json(chosen).into_response())
}
