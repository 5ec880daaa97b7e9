//! Optional JSONL tracing for hosts and `actool`.

use std::path::Path;

/// File written inside the log directory.
pub const TRACE_FILE: &str = "ac-engine-trace.jsonl";

/// Filter used when `AC_ENGINE_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "ac_session=debug,ac_core=debug,ac_cli=debug";

#[cfg(feature = "trace")]
static WRITER_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

/// Installs the global subscriber writing JSON lines to
/// `<log_dir>/ac-engine-trace.jsonl`. Returns false when tracing is
/// compiled out or a subscriber is already installed.
#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) -> bool {
    use tracing_subscriber::EnvFilter;

    if WRITER_GUARD.get().is_some() {
        return false;
    }
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, TRACE_FILE));
    let filter =
        EnvFilter::try_from_env("AC_ENGINE_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_writer(writer)
        .with_env_filter(filter)
        .try_init()
        .is_ok();
    if installed {
        // Flushes on process exit.
        let _ = WRITER_GUARD.set(guard);
    }
    installed
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &Path) -> bool {
    false
}
