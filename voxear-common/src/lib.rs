//! # Voxear Common Library
//!
//! Shared code for the Voxear analysis workflow:
//! - Error types
//! - Event types (VoxearEvent enum) and the broadcast EventBus
//! - TOML configuration loading and config file location

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
