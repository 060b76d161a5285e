//! Host-wide lock so two bootstraps never drive apt at the same time.

use anyhow::{bail, Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Held for the lifetime of a run. Released on drop (file close releases flock).
pub struct RunLock {
    _file: File,
}

impl RunLock {
    /// Take the lock without blocking; bail if another run holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("open lock file {}", path.display()))?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { _file: file }),
            Err(ref e) if is_contended(e) => bail!(
                "another yams-bootstrap run is in progress (lock held on {})",
                path.display()
            ),
            Err(e) => Err(e).with_context(|| format!("lock {}", path.display())),
        }
    }
}

fn is_contended(e: &std::io::Error) -> bool {
    // fs2 on Linux may surface EAGAIN as Other instead of WouldBlock
    e.kind() == std::io::ErrorKind::WouldBlock || e.raw_os_error() == Some(11)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_creates_lock_file() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("bootstrap.lock");
        let lock = RunLock::acquire(&lock_path).unwrap();
        assert!(lock_path.exists());
        drop(lock);
    }

    #[test]
    fn test_second_run_refused_while_held() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("bootstrap.lock");
        let _held = RunLock::acquire(&lock_path).unwrap();
        let err = RunLock::acquire(&lock_path).err().unwrap();
        assert!(err.to_string().contains("in progress"));
    }

    #[test]
    fn test_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("bootstrap.lock");
        {
            let _held = RunLock::acquire(&lock_path).unwrap();
        }
        assert!(RunLock::acquire(&lock_path).is_ok());
    }
}
