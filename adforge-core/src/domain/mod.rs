//! Core domain types
//!
//! These types represent what the rest of the workspace reasons about:
//! generation jobs and the ad platforms they produce creative for.
//! Wire formats live in [`crate::dto`].

pub mod job;
pub mod platform;
