//! Crate-level scenario and property tests.
//!
//! - `scenarios.rs`: frame-by-frame walkthroughs of whole characters
//! - `properties.rs`: proptest properties of animation and movement
//! - `helpers.rs`: fake ports and fixture builders shared by every test module

mod helpers;

// Re-export for convenience
pub use helpers::*;
