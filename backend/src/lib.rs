//! Catering Event Management Platform - Picking Backend
//!
//! Server-side picking subsystem: for each catering event it derives the
//! outstanding needs per delivery milestone, exposes the eligible production
//! lots (earliest expiry first), and keeps the ledger of quantities
//! allocated from lots into expedition containers. Consumed in-process by
//! the wider platform; there is no network surface here.

pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use config::Config;

/// Initialize tracing for embedding applications and tests
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catering_event_management_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
