//! Failure log output
//!
//! The log is rewritten from scratch after every run that had failures and
//! removed after a clean one, so its presence always reflects the last run.

use std::path::Path;

use tracing::{debug, info};

use crate::app::models::FailureRecord;
use crate::errors::{ReportError, ReportResult};

/// Write `failures` to `path`, or remove a stale log when there are none
pub async fn write_failure_log(path: &Path, failures: &[FailureRecord]) -> ReportResult<()> {
    if failures.is_empty() {
        return remove_stale_log(path).await;
    }

    let mut contents = String::new();
    for failure in failures {
        contents.push_str(&failure.to_log_line());
        contents.push('\n');
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ReportError::WriteLog {
                path: path.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ReportError::WriteLog {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Wrote {} failures to {}", failures.len(), path.display());
    Ok(())
}

async fn remove_stale_log(path: &Path) -> ReportResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!("Removed stale failure log {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ReportError::RemoveLog {
            path: path.to_path_buf(),
            source,
        }),
    }
}
