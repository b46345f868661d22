//! PostgreSQL adapters.

mod design_engine;

pub use design_engine::PostgresDesignEngine;
