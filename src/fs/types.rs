use crate::DirError;
use core::ffi::CStr;
use std::os::fd::{AsRawFd, FromRawFd as _, IntoRawFd, OwnedFd, RawFd};

///Generic result type for directory operations
pub type Result<T> = core::result::Result<T, DirError>;

/// Flags for opening a directory descriptor, both for scans and for `openat` bases.
pub(crate) const DIRECTORY_FLAGS: i32 = libc::O_RDONLY | libc::O_DIRECTORY | libc::O_CLOEXEC;

/// Flags for create-or-open of a child file relative to a directory descriptor.
pub(crate) const CREATE_FLAGS: i32 = libc::O_CREAT | libc::O_RDWR | libc::O_CLOEXEC;

/// Mode applied to files created by `openat`, before the process umask.
pub(crate) const CREATE_MODE: libc::c_uint = 0o777;

/**
 An owned file descriptor.

 The descriptor is closed exactly once, when the value is dropped, unless ownership
 was handed over with [`into_raw`](Self::into_raw) (for example to `fdopendir` or to a
 [`std::fs::File`]). Every multi-step open in this crate keeps intermediate descriptors
 in a `FileDes` so that the error paths release them automatically.
*/
#[derive(Debug)]
#[repr(transparent)]
pub struct FileDes(pub(crate) i32);

impl FileDes {
    /// Opens `path` as a directory descriptor (`O_RDONLY | O_DIRECTORY | O_CLOEXEC`).
    pub(crate) fn open_dir(path: &CStr) -> std::io::Result<Self> {
        // SAFETY: the pointer is null terminated
        let fd = unsafe { libc::open(path.as_ptr(), DIRECTORY_FLAGS) };
        if fd < 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(Self(fd))
    }

    /// Create-or-open `name` beneath the directory descriptor `dirfd`.
    pub(crate) fn create_at(dirfd: RawFd, name: &CStr) -> std::io::Result<Self> {
        // SAFETY: `name` is null terminated, an invalid `dirfd` is reported through errno
        let fd = unsafe { libc::openat(dirfd, name.as_ptr(), CREATE_FLAGS, CREATE_MODE) };
        if fd < 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(Self(fd))
    }

    /// Returns a borrowed reference to the underlying file descriptor.
    #[must_use]
    #[inline]
    pub const fn as_borrowed_fd(&self) -> &i32 {
        &self.0
    }

    /// Checks if the file descriptor is currently open
    /// Returns `true` if the file descriptor is open, `false` otherwise
    #[must_use]
    #[inline]
    pub fn is_open(&self) -> bool {
        // Use fcntl with F_GETFD to check if the file descriptor is valid
        // If it returns -1 with errno EBADF, the fd is closed
        //SAFETY:  Always safe
        unsafe { libc::fcntl(self.0, libc::F_GETFD) != -1 }
    }

    /// Gives up ownership; the caller becomes responsible for closing the descriptor.
    #[must_use]
    #[inline]
    pub fn into_raw(self) -> RawFd {
        let fd = self.0;
        core::mem::forget(self);
        fd
    }
}

impl AsRawFd for FileDes {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

impl IntoRawFd for FileDes {
    #[inline]
    fn into_raw_fd(self) -> RawFd {
        self.into_raw()
    }
}

impl From<FileDes> for OwnedFd {
    #[inline]
    fn from(fd: FileDes) -> Self {
        // SAFETY: `FileDes` is the unique owner of an open descriptor
        unsafe { Self::from_raw_fd(fd.into_raw()) }
    }
}

impl Drop for FileDes {
    #[inline]
    fn drop(&mut self) {
        debug_assert!(
            self.is_open(),
            "We expect the file descriptor to be open before closing"
        );
        // SAFETY: only closing HERE
        unsafe { libc::close(self.0) };
    }
}
