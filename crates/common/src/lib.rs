//! Shared types and helpers for the marketplace server and client.

pub mod types;
pub mod utils;
pub mod env;
pub mod validation;
pub mod media;

pub use types::{ActionOutcome, Weekday, OperatingDays};
