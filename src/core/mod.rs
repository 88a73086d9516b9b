//! The core module of the corpus library.
//!
//! This module contains the error types shared by graph construction and
//! rectification, along with re-exports of commonly used types and a helper
//! for initializing logging.

pub mod errors;

pub use errors::{CorpusError, CorpusResult};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
