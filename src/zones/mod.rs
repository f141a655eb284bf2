//! Zone occupancy.
//!
//! ## Key Types
//!
//! - `Placement`: a logical destination (from `core::placement`)
//! - `ZoneManager`: which cards are where, bottom to top

pub mod manager;

pub use manager::ZoneManager;

// Re-export placement types from core for convenience
pub use crate::core::placement::{Column, Placement};
