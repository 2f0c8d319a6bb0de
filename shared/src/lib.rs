//! Shared types for the catalog workspace
//!
//! Plain records exchanged with the storage layer, the unified error-code
//! system, and small utilities (clock, record ids).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
