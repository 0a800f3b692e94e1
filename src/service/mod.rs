//! Preference service module
//!
//! This module contains the [`PreferenceService`] struct which is the primary
//! entry point: layered reads, scoped writes and change events.

mod builder;
mod core;
mod operations;

pub use self::builder::PreferenceServiceBuilder;
pub use self::core::PreferenceService;
