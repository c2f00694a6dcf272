//! AdForge Core
//!
//! Core types shared by the AdForge creative-generation tooling.
//!
//! This crate contains:
//! - Domain types: jobs, snapshots and ad platforms
//! - DTOs: wire representations exchanged with the creative service

pub mod domain;
pub mod dto;
