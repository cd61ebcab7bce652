//! Dispatch tracing
//!
//! Set `NUMERIC_TOWER_TRACE=1` to log which dispatch step answered each
//! operator application. Resolvers read the flag once through
//! [`ResolverOptions::default`](crate::resolver::ResolverOptions).

/// Environment variable that enables tracing.
pub const TRACE_ENV: &str = "NUMERIC_TOWER_TRACE";

/// Check if dispatch tracing is enabled via `NUMERIC_TOWER_TRACE`.
pub fn enabled_from_env() -> bool {
    use std::sync::OnceLock;
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var(TRACE_ENV).is_ok())
}

/// Emit a trace line without relying on `eprintln!`.
pub(crate) fn dispatch_log(args: std::fmt::Arguments<'_>) {
    use std::io::Write;
    let _ = writeln!(std::io::stderr(), "[dispatch] {args}");
}
