//! Per-binary advisory install lock

use bine_core::Result;
use fs4::fs_std::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive lock on `<locks dir>/<name>.lock`, released on drop
#[derive(Debug)]
pub struct InstallLock {
    path: PathBuf,
    _file: File,
}

impl InstallLock {
    /// Block (on a worker thread) until the lock for `name` is held
    pub async fn acquire(locks_dir: &Path, name: &str) -> Result<Self> {
        let path = locks_dir.join(format!("{}.lock", name));
        let lock_path = path.clone();

        let file = tokio::task::spawn_blocking(move || -> io::Result<File> {
            if let Some(parent) = lock_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;
            FileExt::lock_exclusive(&file)?;
            Ok(file)
        })
        .await
        .map_err(io::Error::other)??;

        debug!(path = %path.display(), "install lock acquired");
        Ok(Self { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lock_is_exclusive_until_dropped() {
        let tmp = TempDir::new().unwrap();
        let first = InstallLock::acquire(tmp.path(), "tool").await.unwrap();
        assert!(first.path().ends_with("tool.lock"));

        let dir = tmp.path().to_path_buf();
        let waiter = tokio::spawn(async move { InstallLock::acquire(&dir, "tool").await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!waiter.is_finished());

        drop(first);
        let second = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_locks_are_per_name() {
        let tmp = TempDir::new().unwrap();
        let _a = InstallLock::acquire(tmp.path(), "a").await.unwrap();
        let b = tokio::time::timeout(Duration::from_secs(5), InstallLock::acquire(tmp.path(), "b")).await;
        assert!(b.unwrap().is_ok());
    }
}
