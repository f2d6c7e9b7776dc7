//! # Exo Common Library
//!
//! Shared code for the exoplanet classification services:
//! - Error and result types
//! - Layered configuration loading (CLI/ENV → TOML → compiled defaults)
//! - API response envelope types

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
