use crate::DirError;
use std::ffi::{CString, OsStr, OsString};
use std::os::unix::ffi::{OsStrExt as _, OsStringExt as _};
use std::path::{Path, PathBuf};

/// Path used whenever a directory was created without one.
pub(crate) const CURRENT_DIR: &str = ".";

#[cfg(not(any(
    target_os = "linux",
    target_os = "hurd",
    target_os = "emscripten",
    target_os = "android",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "solaris",
    target_os = "illumos"
)))]
compile_error!("no errno accessor for this target, end of directory cannot be told apart from a read error");

/**
 Resets `errno` to zero.

 `readdir` reports both end of stream and failure with a null pointer, the only way to
 tell them apart is to clear `errno` before the call and inspect it afterwards.
*/
#[inline]
pub(crate) fn clear_errno() {
    #[cfg(any(target_os = "linux", target_os = "hurd", target_os = "emscripten"))]
    // SAFETY: errno is thread local, writing it is always sound
    unsafe {
        *libc::__errno_location() = 0;
    }
    #[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
    // SAFETY: as above
    unsafe {
        *libc::__errno() = 0;
    }
    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly"
    ))]
    // SAFETY: as above
    unsafe {
        *libc::__error() = 0;
    }
    #[cfg(any(target_os = "solaris", target_os = "illumos"))]
    // SAFETY: as above
    unsafe {
        *libc::___errno() = 0;
    }
}

/// Reads `errno` without consuming it.
#[inline]
pub(crate) fn errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// Converts a path into a C string, rejecting interior NUL bytes with `EINVAL`.
pub(crate) fn to_cstring(path: &Path) -> Result<CString, DirError> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| DirError::from_raw_os_error(libc::EINVAL, Some(path)))
}

/// Same as [`to_cstring`] for a bare name, reporting `report_as` on failure.
pub(crate) fn name_to_cstring(name: &OsStr, report_as: &Path) -> Result<CString, DirError> {
    CString::new(name.as_bytes())
        .map_err(|_| DirError::from_raw_os_error(libc::EINVAL, Some(report_as)))
}

/**
 Concatenates `base`, a `/` and `name` into a fresh path.

 This is a literal concatenation: no normalisation, and the separator is added even
 when `base` already ends with one (`"/" + "bin"` gives `"//bin"`), so that a child path
 always splits back into exactly the parent path and the name.
*/
#[must_use]
pub(crate) fn join_name(base: &[u8], name: &[u8]) -> PathBuf {
    let mut buffer: Vec<u8> = Vec::with_capacity(base.len() + 1 + name.len());
    buffer.extend_from_slice(base);
    buffer.push(b'/');
    buffer.extend_from_slice(name);
    PathBuf::from(OsString::from_vec(buffer))
}
