//! Error types for the Clockface engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during engine startup and the run loop.

/// Top-level error for the Clockface engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: clockface_core::config::ConfigError,
    },

    /// The dial constants are unusable.
    #[error("dial error: {source}")]
    Dial {
        /// The underlying dial error.
        #[from]
        source: clockface_core::dial::DialError,
    },

    /// The driver cadence is unusable.
    #[error("driver error: {source}")]
    Driver {
        /// The underlying driver error.
        #[from]
        source: clockface_core::driver::DriverError,
    },

    /// Loading or saving the clock registry failed.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: clockface_core::registry::RegistryError,
    },

    /// The console reader could not be started.
    #[error("console error: {source}")]
    Console {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
