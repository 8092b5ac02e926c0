//! Utility modules.

/// Injectable time source used by request signing.
pub mod clock;

/// Date/time formatting and serde helpers shared by providers.
pub mod datetime;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
