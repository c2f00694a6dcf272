//! Data Transfer Objects for the creative service
//!
//! Shapes of the JSON exchanged with the creation and status endpoints.
//! Conversion into domain types enforces the domain invariants.

pub mod job;
