//! Application layer - the session protocol controller.

mod survey;

pub use survey::{NewProfile, SurveyController, SurveyError, TEST_LABEL};
