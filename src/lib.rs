//! Interaction-driven preference engine.
//!
//! Records user interactions with catalog tracks, folds each one into the user's
//! running taste vector and announces it on an event stream.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{InteractionEngine, PublisherHandle};
