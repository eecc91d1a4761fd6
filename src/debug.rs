//! Env-gated debug output.
//!
//! Set `AFEVT_DEBUG` to any value to get `[debug]` lines on stderr.

/// Environment variable that turns debug output on.
pub const DEBUG_ENV: &str = "AFEVT_DEBUG";

/// Whether debug output is enabled.
pub fn enabled() -> bool {
    std::env::var_os(DEBUG_ENV).is_some()
}

/// Print a `[debug]` line to stderr when `AFEVT_DEBUG` is set.
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::debug::enabled() {
            eprintln!("[debug] {}", format_args!($($arg)*));
        }
    };
}
