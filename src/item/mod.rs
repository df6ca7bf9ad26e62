#[cfg(feature = "logger")]
/// This module provides a logger item writer, useful for debugging readers.
pub mod logger;

/// This module provides the CSV record reader and table writer.
pub mod csv;

#[cfg(feature = "json")]
/// This module provides a JSON table writer.
pub mod json;
