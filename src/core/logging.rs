//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g.
/// `RUST_LOG=verdant::grass=debug` to trace individual brush strokes.
///
/// Safe to call more than once; later calls are ignored.
///
/// # Example
/// ```
/// verdant::core::logging::init();
/// log::info!("Grass field loaded");
/// ```
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}
