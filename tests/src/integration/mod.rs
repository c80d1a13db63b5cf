//! Cross-module broker scenarios.

pub mod configuration;
