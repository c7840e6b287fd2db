//! Kepler Candidate Console
//!
//! Core of an exoplanet-candidate dashboard:
//! - Feature registry of Kepler transit and stellar parameters
//! - Input reconciliation between a form and a JSON document
//! - Client for the remote classification service

pub mod config;
pub mod console;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod features;
pub mod input;
pub mod prediction;
pub mod utils;

// Re-exports for convenience
pub use config::ConsoleConfig;
pub use dashboard::{Dashboard, ResultPanel};
pub use features::FeatureRegistry;
pub use input::InputController;
pub use prediction::{HttpPredictionClient, Prediction, PredictionService};
