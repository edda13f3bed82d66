//! # Memerank Common Library
//!
//! Shared code for the memerank service:
//! - Error types
//! - Database initialization and rating persistence

pub mod db;
pub mod error;

pub use error::{Error, Result};
