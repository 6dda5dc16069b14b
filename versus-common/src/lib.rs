//! # Versus Common Library
//!
//! Shared code for the Versus verse-analysis workspace:
//! - Error type shared by every crate (`Error`, `Result`)
//! - Bootstrap configuration loading (TOML)
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
