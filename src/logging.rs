use std::path::Path;

use color_eyre::eyre;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "slowsearch.log";
const DEFAULT_FILTER: &str = "slowsearch=info";

/// Sends tracing output to `<log_dir>/slowsearch.log`. The terminal belongs to
/// the UI, so nothing is written to stdout or stderr.
///
/// Keep the returned guard alive until exit, dropping it flushes the writer.
pub fn init(log_dir: &Path) -> eyre::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| eyre::eyre!("failed to install tracing subscriber: {err}"))?;

    Ok(guard)
}
