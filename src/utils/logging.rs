//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Usage:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("entered segment {}", index);
//! ```

/// Info logging when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn logging when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error logging when the calling module's `ENABLE_LOGS` is true.
///
/// Each module that uses these macros must define:
/// ```ignore
/// const ENABLE_LOGS: bool = true; // or false
/// ```
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
