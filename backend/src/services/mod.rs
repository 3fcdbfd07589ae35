//! Business logic services for the Catering Event Management Platform

pub mod picking;

pub use picking::PickingService;
