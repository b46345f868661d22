//! HTTP adapter for the survey protocol endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChooseFirstDesignRequest, CreateProfileRequest, CreateProfileResponse, ErrorResponse,
    EstimatesResponse, UpdateAndChooseDesignRequest, UpdateAndReturnEstimatesRequest,
};
pub use handlers::SurveyState;
pub use routes::survey_routes;
