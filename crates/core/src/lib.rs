//! Core library: archive registry, location store seam, configuration.

pub mod config;
pub mod models;
pub mod registry;
pub mod store;
