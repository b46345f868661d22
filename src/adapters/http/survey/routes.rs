//! HTTP routes for the survey protocol endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    choose_first_design, create_profile, home, random_design, update_and_choose_design,
    update_and_return_estimates,
};
use super::SurveyState;

/// Creates the survey router with all endpoints.
pub fn survey_routes(state: SurveyState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/create_profile", post(create_profile))
        .route("/choose_first_design", put(choose_first_design))
        .route("/update_and_choose_design", put(update_and_choose_design))
        .route(
            "/update_and_return_estimates",
            put(update_and_return_estimates),
        )
        .route("/random_design", get(random_design))
        .with_state(state)
}
