//! Shared types and models for the Catering Event Management Platform
//!
//! This crate contains types shared between the backend, frontend (via WASM),
//! and other components of the system, together with the pure picking
//! computations (need aggregation, lot availability, allocation planning).

pub mod models;
pub mod planning;
pub mod types;
pub mod validation;

pub use models::*;
pub use planning::*;
pub use types::*;
pub use validation::*;
