//! Ports - interfaces for external dependencies.
//!
//! The design engine is the only collaborator this service talks to; the
//! adaptive-design and posterior-update algorithm lives entirely behind it.

mod design_engine;

pub use design_engine::{DesignEngine, EngineError};
