//! DesignEngine port - the abstract procedure surface of the external
//! optimization engine.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ChosenDesign;

/// Errors surfaced by an engine call.
///
/// The caller needs to distinguish "no such profile" from a transport or
/// procedure failure; raw engine errors are never forwarded to clients.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("profile {profile_id} not found")]
    ProfileNotFound { profile_id: i64 },

    #[error("engine query failed: {0}")]
    Query(String),

    #[error("engine returned a malformed row: {0}")]
    InvalidRow(String),
}

/// Black-box procedure store providing profile creation, adaptive design
/// selection, posterior updating, and a non-adaptive random-design fallback.
///
/// One call per inbound request; all cross-request state (profile identity,
/// posterior beliefs, design history) is owned by the engine.
#[async_trait]
pub trait DesignEngine: Send + Sync {
    /// Creates a respondent profile, returning its opaque id.
    async fn create_profile(
        &self,
        survey_id: i64,
        sample_percentage_theta: f64,
    ) -> Result<i64, EngineError>;

    /// Selects the first design for a profile.
    async fn choose_design(
        &self,
        profile_id: i64,
        sample_percentage_designs: f64,
    ) -> Result<ChosenDesign, EngineError>;

    /// Records a normalized answer (1 = treated option chosen), updates the
    /// posterior, and selects the next design.
    async fn update_and_choose_design(
        &self,
        profile_id: i64,
        answer: i32,
        sample_percentage_designs: f64,
        allow_repeats: bool,
    ) -> Result<ChosenDesign, EngineError>;

    /// Records a normalized answer and returns the posterior estimates.
    async fn update_and_return_estimates(
        &self,
        profile_id: i64,
        answer: i32,
    ) -> Result<Vec<f64>, EngineError>;

    /// Fetches a random, non-adaptive design without touching profile state.
    async fn random_design(&self) -> Result<ChosenDesign, EngineError>;
}
