//! Core value types: fixed-point numbers, attribute maps, configuration.
//!
//! These are shared by every other module and know nothing about rule
//! strings, choices, or content.

pub mod attributes;
pub mod config;
pub mod fixed;

pub use attributes::{Attributes, Constants};
pub use config::RulesConfig;
pub use fixed::Fixed;
