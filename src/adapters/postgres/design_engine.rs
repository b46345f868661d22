//! PostgreSQL implementation of the DesignEngine port.
//!
//! Every operation is one parameterized call to a stored procedure; the
//! procedures own all profile and posterior state. Numeric arrays are cast
//! to `float8[]` in SQL so rows deserialize as `Vec<f64>` instead of
//! arbitrary-precision numerics.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{ChosenDesign, DesignVector};
use crate::ports::{DesignEngine, EngineError};

/// DesignEngine backed by PostgreSQL stored procedures.
#[derive(Clone)]
pub struct PostgresDesignEngine {
    pool: PgPool,
}

impl PostgresDesignEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_error(profile_id: Option<i64>, err: sqlx::Error) -> EngineError {
    match (profile_id, &err) {
        (Some(profile_id), sqlx::Error::RowNotFound) => EngineError::ProfileNotFound { profile_id },
        _ => EngineError::Query(err.to_string()),
    }
}

fn design_from_row(row: &PgRow, index_d: Option<i64>) -> Result<ChosenDesign, EngineError> {
    let values: Vec<f64> = row
        .try_get("design")
        .map_err(|e| EngineError::InvalidRow(format!("missing design column: {e}")))?;
    let design = DesignVector::from_slice(&values).ok_or_else(|| {
        EngineError::InvalidRow(format!(
            "design array has {} elements, expected {}",
            values.len(),
            DesignVector::LEN
        ))
    })?;
    Ok(ChosenDesign { index_d, design })
}

fn chosen_from_row(row: &PgRow) -> Result<ChosenDesign, EngineError> {
    let index_d: Option<i64> = row
        .try_get("index_d")
        .map_err(|e| EngineError::InvalidRow(format!("missing index_d column: {e}")))?;
    design_from_row(row, index_d)
}

#[async_trait]
impl DesignEngine for PostgresDesignEngine {
    async fn create_profile(
        &self,
        survey_id: i64,
        sample_percentage_theta: f64,
    ) -> Result<i64, EngineError> {
        tracing::debug!(survey_id, sample_percentage_theta, "engine create_profile");
        let row = sqlx::query(
            "SELECT create_profile::bigint AS profile_id \
             FROM create_profile(this_survey_id => $1, sample_percentage_theta => $2)",
        )
        .bind(survey_id)
        .bind(sample_percentage_theta)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error(None, e))?;

        row.try_get("profile_id")
            .map_err(|e| EngineError::InvalidRow(format!("missing profile_id column: {e}")))
    }

    async fn choose_design(
        &self,
        profile_id: i64,
        sample_percentage_designs: f64,
    ) -> Result<ChosenDesign, EngineError> {
        tracing::debug!(profile_id, sample_percentage_designs, "engine choose_design");
        let row = sqlx::query(
            "SELECT index_d::bigint AS index_d, design::float8[] AS design \
             FROM choose_design(this_profile_id => $1, sample_percentage_designs => $2)",
        )
        .bind(profile_id)
        .bind(sample_percentage_designs)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error(Some(profile_id), e))?;

        chosen_from_row(&row)
    }

    async fn update_and_choose_design(
        &self,
        profile_id: i64,
        answer: i32,
        sample_percentage_designs: f64,
        allow_repeats: bool,
    ) -> Result<ChosenDesign, EngineError> {
        tracing::debug!(
            profile_id,
            answer,
            sample_percentage_designs,
            allow_repeats,
            "engine update_and_choose_design"
        );
        let row = sqlx::query(
            "SELECT index_d::bigint AS index_d, design::float8[] AS design \
             FROM update_and_choose_design(this_profile_id => $1, answer => $2, \
                 sample_percentage_designs => $3, allow_repeats => $4)",
        )
        .bind(profile_id)
        .bind(answer)
        .bind(sample_percentage_designs)
        .bind(allow_repeats)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error(Some(profile_id), e))?;

        chosen_from_row(&row)
    }

    async fn update_and_return_estimates(
        &self,
        profile_id: i64,
        answer: i32,
    ) -> Result<Vec<f64>, EngineError> {
        tracing::debug!(profile_id, answer, "engine update_and_return_estimates");
        let row = sqlx::query(
            "SELECT estimates::float8[] AS estimates \
             FROM update_and_return_estimates(this_profile_id => $1, answer => $2)",
        )
        .bind(profile_id)
        .bind(answer)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error(Some(profile_id), e))?;

        row.try_get("estimates")
            .map_err(|e| EngineError::InvalidRow(format!("missing estimates column: {e}")))
    }

    async fn random_design(&self) -> Result<ChosenDesign, EngineError> {
        tracing::debug!("engine random_design");
        let row = sqlx::query("SELECT design::float8[] AS design FROM random_design()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error(None, e))?;

        design_from_row(&row, None)
    }
}
