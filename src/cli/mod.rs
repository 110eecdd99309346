//! Command-line layer

pub mod logging;

pub use logging::init_logging;
