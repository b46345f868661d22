//! HTTP adapters - REST API implementation.

pub mod survey;

pub use survey::{survey_routes, SurveyState};
