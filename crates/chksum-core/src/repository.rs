//! The only component that changes anything on disk: renames files to embed
//! or strip a checksum marker.
//!
//! Every change is a single rename that refuses to replace an existing file.
//! On Linux this is `renameat2(RENAME_NOREPLACE)`; elsewhere (or on file
//! systems that reject the flag) an existence check precedes `rename`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::checksum::Checksum;
use crate::error::ChecksumError;
use crate::marker::{self, FileName};

/// What the repository knows about one file without reading its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileState {
    pub path: PathBuf,
    pub name: FileName,
    pub len: u64,
}

impl FileState {
    /// Checksum embedded in the file name, if any.
    pub fn checksum(&self) -> Option<&Checksum> {
        self.name.checksum.as_ref()
    }
}

pub trait ChecksumRepository: Send + Sync {
    /// Decode the file name of an existing regular file.
    fn read_state(&self, path: &Path) -> Result<FileState, ChecksumError>;

    /// Rename `path` so it carries `checksum`, replacing any marker.
    /// Returns the new path, or `path` itself if it already carries `checksum`.
    fn write(&self, path: &Path, checksum: &Checksum) -> Result<PathBuf, ChecksumError>;

    /// Rename `path` without its marker. Returns `path` itself if it has none.
    fn strip(&self, path: &Path) -> Result<PathBuf, ChecksumError>;

    /// Cheap name-only check, no file system access.
    fn has_checksum(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| marker::decode(n).checksum.is_some())
            .unwrap_or(false)
    }
}

/// Repository backed by file names on the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRenamer;

impl ChecksumRepository for FileRenamer {
    fn read_state(&self, path: &Path) -> Result<FileState, ChecksumError> {
        let meta = fs::metadata(path).map_err(|e| ChecksumError::io(path, e))?;
        if !meta.is_file() {
            return Err(ChecksumError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        Ok(FileState {
            path: path.to_path_buf(),
            name: decode_path(path)?,
            len: meta.len(),
        })
    }

    fn write(&self, path: &Path, checksum: &Checksum) -> Result<PathBuf, ChecksumError> {
        let name = decode_path(path)?;
        if name.checksum.as_ref() == Some(checksum) {
            return Ok(path.to_path_buf());
        }
        let target = path.with_file_name(name.with_checksum(checksum));
        rename_no_clobber(path, &target)?;
        tracing::info!(from = %path.display(), to = %target.display(), "checksum written");
        Ok(target)
    }

    fn strip(&self, path: &Path) -> Result<PathBuf, ChecksumError> {
        let name = decode_path(path)?;
        if name.checksum.is_none() {
            return Ok(path.to_path_buf());
        }
        let target = path.with_file_name(name.plain());
        rename_no_clobber(path, &target)?;
        tracing::info!(from = %path.display(), to = %target.display(), "checksum deleted");
        Ok(target)
    }
}

fn decode_path(path: &Path) -> Result<FileName, ChecksumError> {
    let name = path.file_name().ok_or_else(|| {
        ChecksumError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let name = name.to_str().ok_or_else(|| {
        ChecksumError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
        )
    })?;
    Ok(marker::decode(name))
}

#[cfg(target_os = "linux")]
fn rename_no_clobber(from: &Path, to: &Path) -> Result<(), ChecksumError> {
    match renameat2_noreplace(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(libc::EEXIST) => Err(ChecksumError::Conflict {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        }),
        Err(e) if matches!(e.raw_os_error(), Some(libc::EINVAL) | Some(libc::ENOSYS)) => {
            tracing::debug!(errno = ?e.raw_os_error(), "renameat2 unsupported, falling back to checked rename");
            checked_rename(from, to)
        }
        Err(e) => Err(ChecksumError::io(from, e)),
    }
}

#[cfg(not(target_os = "linux"))]
fn rename_no_clobber(from: &Path, to: &Path) -> Result<(), ChecksumError> {
    checked_rename(from, to)
}

#[cfg(target_os = "linux")]
fn renameat2_noreplace(from: &Path, to: &Path) -> io::Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    const RENAME_NOREPLACE: libc::c_uint = 1;

    let from_c = CString::new(from.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let to_c = CString::new(to.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let r = unsafe {
        libc::syscall(
            libc::SYS_renameat2,
            libc::AT_FDCWD,
            from_c.as_ptr(),
            libc::AT_FDCWD,
            to_c.as_ptr(),
            RENAME_NOREPLACE,
        )
    };
    if r == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Not atomic with respect to the existence check; used only where the kernel
/// cannot refuse to clobber for us.
fn checked_rename(from: &Path, to: &Path) -> Result<(), ChecksumError> {
    if to.try_exists().map_err(|e| ChecksumError::io(to, e))? {
        return Err(ChecksumError::Conflict {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }
    fs::rename(from, to).map_err(|e| ChecksumError::io(from, e))
}
