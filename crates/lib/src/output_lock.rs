//! Transient file lock guarding an output tree against concurrent writers.
//!
//! The lock file sits next to the directory it guards (`.output.lock` for
//! `output/`) so it never ends up inside the package. On unix it is removed
//! again when the lock is released; an acquirer that locked a file unlinked in
//! the meantime notices and retries on the new one.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Who holds the lock. Written into the lock file as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHolder {
  pub pid: u32,
  pub command: String,
  pub target: PathBuf,
  pub started_at_unix: u64,
}

impl LockHolder {
  fn current(command: &str, target: &Path) -> Self {
    Self {
      pid: std::process::id(),
      command: command.to_string(),
      target: target.to_path_buf(),
      started_at_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0),
    }
  }

  /// Start time as an RFC 3339 timestamp.
  pub fn started_at(&self) -> String {
    humantime::format_rfc3339_seconds(UNIX_EPOCH + Duration::from_secs(self.started_at_unix)).to_string()
  }

  fn read_from(path: &Path) -> Option<Self> {
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
  }
}

#[derive(Debug, Error)]
pub enum OutputLockError {
  #[error(
    "{} is in use by `{command}` (PID {pid}, started {started_at}); \
     remove {} if no other build is running",
    target.display(),
    lock_path.display()
  )]
  Contention {
    target: PathBuf,
    command: String,
    pid: u32,
    started_at: String,
    lock_path: PathBuf,
  },

  #[error(
    "{} is in use by another process; remove {} if no other build is running",
    target.display(),
    lock_path.display()
  )]
  ContentionUnknown { target: PathBuf, lock_path: PathBuf },

  #[error("failed to open lock file {}: {source}", path.display())]
  Open { path: PathBuf, source: io::Error },

  #[error("failed to lock {}: {source}", path.display())]
  Lock { path: PathBuf, source: io::Error },

  #[error("failed to record lock holder in {}: {source}", path.display())]
  Record { path: PathBuf, source: io::Error },
}

/// Location of the lock file guarding `target`.
pub fn lock_path_for(target: &Path) -> PathBuf {
  let name = target
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "output".to_string());
  let parent = target.parent().unwrap_or_else(|| Path::new("."));
  parent.join(format!(".{name}.lock"))
}

/// An exclusive lock on an output directory, held until dropped.
#[derive(Debug)]
pub struct OutputLock {
  file: File,
  path: PathBuf,
}

impl OutputLock {
  /// Take the lock for `target` without blocking.
  ///
  /// Fails with `Contention` when another process holds it.
  pub fn acquire(target: &Path, command: &str) -> Result<Self, OutputLockError> {
    let path = lock_path_for(target);

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|source| OutputLockError::Open {
        path: path.clone(),
        source,
      })?;
    }

    loop {
      let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(|source| OutputLockError::Open {
          path: path.clone(),
          source,
        })?;

      match try_lock(&file) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
          return Err(match LockHolder::read_from(&path) {
            Some(holder) => OutputLockError::Contention {
              target: target.to_path_buf(),
              started_at: holder.started_at(),
              command: holder.command,
              pid: holder.pid,
              lock_path: path,
            },
            None => OutputLockError::ContentionUnknown {
              target: target.to_path_buf(),
              lock_path: path,
            },
          });
        }
        Err(source) => return Err(OutputLockError::Lock { path, source }),
      }

      // The previous holder may have unlinked the file between our open and lock
      match is_linked_at(&file, &path) {
        Ok(true) => {}
        Ok(false) => {
          debug!(path = %path.display(), "lock file replaced while locking, retrying");
          continue;
        }
        Err(source) => return Err(OutputLockError::Lock { path, source }),
      }

      let mut lock = OutputLock { file, path };
      lock.record(&LockHolder::current(command, target))?;
      debug!(path = %lock.path.display(), "acquired output lock");
      return Ok(lock);
    }
  }

  /// The holder recorded in the lock file.
  pub fn holder(&self) -> Option<LockHolder> {
    LockHolder::read_from(&self.path)
  }

  pub fn lock_path(&self) -> &Path {
    &self.path
  }

  fn record(&mut self, holder: &LockHolder) -> Result<(), OutputLockError> {
    let record_err = |source| OutputLockError::Record {
      path: self.path.clone(),
      source,
    };
    let json = serde_json::to_vec_pretty(holder).map_err(|e| record_err(io::Error::other(e)))?;
    self.file.set_len(0).map_err(record_err)?;
    self.file.seek(SeekFrom::Start(0)).map_err(record_err)?;
    self.file.write_all(&json).map_err(record_err)?;
    self.file.flush().map_err(record_err)
  }
}

impl Drop for OutputLock {
  fn drop(&mut self) {
    // Only unix acquirers can tell they locked an unlinked file, so Windows
    // leaves it in place
    #[cfg(unix)]
    if let Err(e) = fs::remove_file(&self.path) {
      debug!(path = %self.path.display(), error = %e, "could not remove lock file");
    }
  }
}

/// Whether `file` is still the file found at `path`.
#[cfg(unix)]
fn is_linked_at(file: &File, path: &Path) -> io::Result<bool> {
  use rustix::fs::{fstat, stat};
  use rustix::io::Errno;

  let held = fstat(file)?;
  match stat(path) {
    Ok(current) => Ok(held.st_dev == current.st_dev && held.st_ino == current.st_ino),
    Err(Errno::NOENT) => Ok(false),
    Err(e) => Err(e.into()),
  }
}

#[cfg(windows)]
fn is_linked_at(_file: &File, _path: &Path) -> io::Result<bool> {
  Ok(true)
}

#[cfg(unix)]
fn try_lock(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive).map_err(io::Error::from)
}

#[cfg(windows)]
fn try_lock(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::{ERROR_LOCK_VIOLATION, HANDLE};
  use windows_sys::Win32::Storage::FileSystem::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx};
  use windows_sys::Win32::System::IO::OVERLAPPED;

  // SAFETY: the handle is owned by `file` and outlives the call; a zeroed
  // OVERLAPPED requests a lock on the first byte.
  let locked = unsafe {
    let mut overlapped: OVERLAPPED = std::mem::zeroed();
    LockFileEx(
      file.as_raw_handle() as HANDLE,
      LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY,
      0,
      1,
      0,
      &mut overlapped,
    )
  };

  if locked != 0 {
    return Ok(());
  }
  let err = io::Error::last_os_error();
  if err.raw_os_error() == Some(ERROR_LOCK_VIOLATION as i32) {
    Err(io::ErrorKind::WouldBlock.into())
  } else {
    Err(err)
  }
}
