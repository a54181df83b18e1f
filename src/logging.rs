// SPDX-License-Identifier: MIT
//
// Diagnostics setup.
//
// The terminal is the canvas, so logs never go to stdout or stderr while
// the animation runs. Events go to a file through a non-blocking writer;
// with no file and no filter there is no subscriber at all and every
// `tracing` macro is a cheap no-op.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`warn`, `artloop_art=debug`…).
pub const FILTER_ENV: &str = "ARTLOOP_LOG";

const DEFAULT_FILTER: &str = "warn";
const DEFAULT_FILE: &str = "artloop.log";

/// Install the global subscriber.
///
/// Returns the writer guard, which must live until exit so buffered events
/// are flushed; `None` when logging stays off.
///
/// # Errors
///
/// Fails if the log directory can't be created or the filter is invalid.
pub fn init(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = std::env::var(FILTER_ENV).ok().filter(|f| !f.is_empty());
    let Some(path) = log_path(log_file, filter.is_some()) else {
        return Ok(None);
    };

    let filter = EnvFilter::try_new(filter.as_deref().unwrap_or(DEFAULT_FILTER))
        .with_context(|| format!("invalid {FILTER_ENV} filter"))?;

    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let file_name = path.file_name().map_or_else(|| DEFAULT_FILE.into(), ToOwned::to_owned);

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")?;

    Ok(Some(guard))
}

/// Where logs go: the explicit file, else the state directory when a
/// filter was requested, else nowhere.
fn log_path(explicit: Option<&Path>, filter_set: bool) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_owned());
    }
    if !filter_set {
        return None;
    }
    let state = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(std::env::temp_dir);
    Some(state.join("artloop").join(DEFAULT_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_file_wins() {
        assert_eq!(log_path(Some(Path::new("/tmp/a.log")), false), Some(PathBuf::from("/tmp/a.log")));
    }

    #[test]
    fn silent_without_file_or_filter() {
        assert_eq!(log_path(None, false), None);
    }

    #[test]
    fn filter_alone_picks_a_default_file() {
        let p = log_path(None, true).unwrap();
        assert!(p.ends_with("artloop/artloop.log"));
    }
}
