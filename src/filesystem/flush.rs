use std::fs;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::filesystem::{ChangeKind, FileChange};

/// Applies `changes` to the directory at `root`, in order.
///
/// Creations make their parent directories on demand, updates write in
/// place, and deletions remove files or whole directories on a best-effort
/// basis. The first failing write aborts the flush; changes applied before
/// it stay on disk.
pub fn flush_changes(root: &Path, changes: &[FileChange]) -> Result<(), FlushError> {
    debug!(
        "Flushing {} changes into {}",
        changes.len(),
        root.best_effort_path_display()
    );

    for change in changes {
        let host = root.join(&change.path);
        match change.kind {
            ChangeKind::Create => {
                if let Some(parent) = host.parent() {
                    fs::create_dir_all(parent).context(CreateDirSnafu {
                        path: parent.to_path_buf(),
                    })?;
                }
                write_content(&host, change)?;
            }
            ChangeKind::Update => write_content(&host, change)?,
            ChangeKind::Delete => remove_best_effort(&host),
        }
    }

    Ok(())
}

fn write_content(host: &Path, change: &FileChange) -> Result<(), FlushError> {
    fs::write(host, change.content.as_deref().unwrap_or_default())
        .context(WriteSnafu { path: host.to_path_buf() })
}

fn remove_best_effort(host: &Path) {
    let result = match fs::symlink_metadata(host) {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(host),
        Ok(_) => fs::remove_file(host),
        Err(err) => Err(err),
    };
    if let Err(err) = result {
        debug!(
            "Ignoring failed removal of {}: {err}",
            host.best_effort_path_display()
        );
    }
}

#[derive(Debug, Snafu)]
pub enum FlushError {
    #[snafu(display("Failed to create directory {}", path.best_effort_path_display()))]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}
