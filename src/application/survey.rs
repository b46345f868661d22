//! Session protocol controller.
//!
//! Orchestrates the respondent lifecycle: profile creation, first design
//! retrieval, answer-driven design update, and final estimate retrieval.
//! Stateless between requests: every operation issues exactly one engine
//! call, then post-processes the result through the decoder and sampler.
//! The engine's persisted profile state is the sole source of truth for
//! what is a legal next step; callers are expected to invoke the
//! operations in order.

use std::sync::Arc;

use thiserror::Error;

use crate::config::ExperimentConfig;
use crate::domain::{
    check_answer, decode, gen_payment_params, sample_characteristics, CharacteristicRegistry,
    ChosenDesign, DecodeError, Presentation,
};
use crate::ports::{DesignEngine, EngineError};

/// Sentinel label substituted into test-mode output.
pub const TEST_LABEL: &str = "TEST";

/// Errors surfaced by protocol operations.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Result of profile creation: the engine-assigned id plus the
/// client-session metadata drawn here. The scenario draw is not persisted
/// by the engine; the caller must echo these fields on subsequent calls.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub profile_id: i64,
    pub characteristic_a: String,
    pub characteristic_b: String,
    pub monthly_payment: bool,
    pub base_earnings: f64,
}

/// Orchestrates the respondent-facing survey protocol.
pub struct SurveyController {
    engine: Arc<dyn DesignEngine>,
    registry: Arc<CharacteristicRegistry>,
    settings: ExperimentConfig,
}

impl SurveyController {
    pub fn new(
        engine: Arc<dyn DesignEngine>,
        registry: Arc<CharacteristicRegistry>,
        settings: ExperimentConfig,
    ) -> Self {
        Self {
            engine,
            registry,
            settings,
        }
    }

    pub fn author_name(&self) -> &str {
        &self.settings.author_name
    }

    fn normalize_answer(&self, raw_answer: i64) -> i32 {
        check_answer(raw_answer, self.settings.treated_answer_value)
    }

    /// Creates an engine profile and draws fresh scenario metadata.
    #[tracing::instrument(skip(self))]
    pub async fn create_profile(
        &self,
        survey_id: i64,
        sample_percentage_theta: Option<f64>,
    ) -> Result<NewProfile, SurveyError> {
        let theta =
            sample_percentage_theta.unwrap_or(self.settings.default_sample_percentage_theta);
        let profile_id = self.engine.create_profile(survey_id, theta).await?;

        let mut rng = rand::thread_rng();
        let picked = sample_characteristics(
            &self.registry,
            self.registry.characteristics_per_scenario(),
            &mut rng,
        );
        let (monthly_payment, base_earnings) = gen_payment_params(&self.registry, &mut rng);

        Ok(NewProfile {
            profile_id,
            characteristic_a: picked[0].clone(),
            characteristic_b: picked[1].clone(),
            monthly_payment,
            base_earnings,
        })
    }

    /// Fetches and decodes the first design for a profile (question 0).
    #[tracing::instrument(skip(self))]
    pub async fn choose_first_design(
        &self,
        profile_id: i64,
        base_earnings: f64,
        characteristic_a: &str,
        characteristic_b: &str,
        sample_percentage_designs: Option<f64>,
    ) -> Result<Presentation, SurveyError> {
        let pct =
            sample_percentage_designs.unwrap_or(self.settings.default_sample_percentage_designs);
        let chosen = self.engine.choose_design(profile_id, pct).await?;
        let presentation = decode(
            &chosen.design,
            &self.registry,
            0,
            base_earnings,
            characteristic_a,
            characteristic_b,
        )?;
        Ok(presentation)
    }

    /// Records an answer, re-optimizes, and decodes the next design.
    #[tracing::instrument(skip(self))]
    pub async fn update_and_choose_design(
        &self,
        profile_id: i64,
        qnumber: u32,
        raw_answer: i64,
        base_earnings: f64,
        characteristic_a: &str,
        characteristic_b: &str,
        sample_percentage_designs: Option<f64>,
    ) -> Result<Presentation, SurveyError> {
        let answer = self.normalize_answer(raw_answer);
        let pct =
            sample_percentage_designs.unwrap_or(self.settings.default_sample_percentage_designs);
        let chosen = self
            .engine
            .update_and_choose_design(
                profile_id,
                answer,
                pct,
                self.settings.allow_repeated_designs,
            )
            .await?;
        let presentation = decode(
            &chosen.design,
            &self.registry,
            qnumber,
            base_earnings,
            characteristic_a,
            characteristic_b,
        )?;
        Ok(presentation)
    }

    /// Records the final answer and returns the posterior estimates.
    #[tracing::instrument(skip(self))]
    pub async fn update_and_return_estimates(
        &self,
        profile_id: i64,
        raw_answer: i64,
    ) -> Result<Vec<f64>, SurveyError> {
        let answer = self.normalize_answer(raw_answer);
        let estimates = self
            .engine
            .update_and_return_estimates(profile_id, answer)
            .await?;
        Ok(estimates)
    }

    /// Fetches a raw non-adaptive design, bypassing profile state.
    #[tracing::instrument(skip(self))]
    pub async fn random_design(&self) -> Result<ChosenDesign, SurveyError> {
        Ok(self.engine.random_design().await?)
    }

    /// Test-mode profile stub: canned output for scaffolding embedded-data
    /// variables without consuming engine state.
    pub fn test_profile(&self) -> NewProfile {
        NewProfile {
            profile_id: 0,
            characteristic_a: TEST_LABEL.to_string(),
            characteristic_b: TEST_LABEL.to_string(),
            monthly_payment: false,
            base_earnings: self.registry.example_base_earnings(),
        }
    }

    /// Test-mode design: decodes a random design with the registry's first
    /// two characteristics and example earnings, then overwrites both
    /// labels with the test sentinel.
    #[tracing::instrument(skip(self))]
    pub async fn test_design(&self, qnumber: u32) -> Result<Presentation, SurveyError> {
        let chosen = self.engine.random_design().await?;
        let keys: Vec<&str> = self.registry.keys().collect();
        let mut presentation = decode(
            &chosen.design,
            &self.registry,
            qnumber,
            self.registry.example_base_earnings(),
            keys[0],
            keys[1],
        )?;
        presentation.label_a = TEST_LABEL.to_string();
        presentation.label_b = TEST_LABEL.to_string();
        Ok(presentation)
    }

    /// Test-mode estimates: one `"test"` marker per design element, so
    /// scaffolding can discover the response arity.
    #[tracing::instrument(skip(self))]
    pub async fn test_estimates(&self) -> Result<Vec<String>, SurveyError> {
        let chosen = self.engine.random_design().await?;
        Ok(chosen
            .design
            .as_slice()
            .iter()
            .map(|_| "test".to_string())
            .collect())
    }
}
