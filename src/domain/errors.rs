//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised while translating a design vector into a presentation.
///
/// The original protocol left unmatched patterns undefined and emitted a
/// presentation with missing fields; here every malformed input is rejected
/// with a typed error instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The `(d1, d2, d3)` triple matches no entry of the active decode table.
    #[error("design pattern ({d1}, {d2}, {d3}) matches no decode table entry")]
    UnknownPattern { d1: i32, d2: i32, d3: i32 },

    /// The caller named a characteristic that is not in the registry.
    #[error("unknown characteristic '{key}'")]
    UnknownCharacteristic { key: String },

    /// A design code that should be a small integer arrived as a fraction.
    #[error("design code {value} is not an integer")]
    NonIntegralCode { value: f64 },

    /// A decode table entry indexes past the end of a characteristic's levels.
    ///
    /// Reachable when the shuffled characteristic pair is passed to the
    /// decoder in an order the table was not written for (e.g. a ternary
    /// level index applied to a binary characteristic).
    #[error("level index {index} out of range for characteristic '{key}'")]
    LevelOutOfRange { key: String, index: usize },
}
