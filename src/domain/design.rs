//! Design vector - the engine's numeric encoding of one comparison question.

use serde::Serialize;

use super::errors::DecodeError;

/// A raw design vector produced by the engine: `[diff_earnings, d1, d2, d3]`.
///
/// `diff_earnings` is the earnings delta between the two alternatives;
/// `(d1, d2, d3)` jointly encode which levels of the two selected
/// characteristics differ and in which direction. Ephemeral: produced per
/// question, consumed once by the decoder, never persisted by this layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DesignVector([f64; 4]);

impl DesignVector {
    /// Number of elements in a design vector.
    pub const LEN: usize = 4;

    pub fn new(values: [f64; 4]) -> Self {
        Self(values)
    }

    /// Builds a design vector from an engine row, rejecting wrong arity.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let values: [f64; 4] = values.try_into().ok()?;
        Some(Self(values))
    }

    pub fn diff_earnings(&self) -> f64 {
        self.0[0]
    }

    /// Returns `(d1, d2, d3)` as integer pattern codes.
    ///
    /// The engine stores codes as small integers in a numeric array; a
    /// fractional value here means the row is not a valid design.
    pub fn codes(&self) -> Result<(i32, i32, i32), DecodeError> {
        let as_code = |value: f64| {
            if value.fract() == 0.0 {
                Ok(value as i32)
            } else {
                Err(DecodeError::NonIntegralCode { value })
            }
        };
        Ok((as_code(self.0[1])?, as_code(self.0[2])?, as_code(self.0[3])?))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// One engine selection: the row index of the chosen design plus the vector.
///
/// `index_d` is absent for the non-adaptive `random_design` fallback.
#[derive(Debug, Clone, Serialize)]
pub struct ChosenDesign {
    pub index_d: Option<i64>,
    pub design: DesignVector,
}
