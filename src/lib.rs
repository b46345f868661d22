//! BACE Backend - Bayesian Adaptive Choice Experiment API
//!
//! This crate exposes the HTTP surface of an adaptive two-alternative
//! forced-choice survey experiment. The statistical engine that selects
//! designs and updates posteriors lives behind PostgreSQL stored procedures;
//! this service sequences the respondent protocol and decodes the engine's
//! numeric design vectors into labeled, respondent-facing comparisons.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
