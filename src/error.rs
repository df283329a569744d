use std::{
    fmt, io,
    path::{Path, PathBuf},
};

/**
 The error type for every directory, iterator and entry operation.

 All failures in this crate originate from a single OS call, so the error is an
 [`io::Error`] (carrying the raw `errno` value) plus the path that was being
 operated on when it is meaningful. For entry-relative operations that path is
 the reconstructed child path, for directory operations it is the directory path.

 ```
 use atdir::DirectoryIter;

 let err = DirectoryIter::new("/this/path/really/should/not/exist").unwrap_err();
 assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
 assert_eq!(
     err.path().unwrap(),
     std::path::Path::new("/this/path/really/should/not/exist")
 );
 ```
*/
#[derive(Debug)]
pub struct DirError {
    error: io::Error,
    path: Option<PathBuf>,
}

impl DirError {
    /// Builds an error from an [`io::Error`] and the path involved.
    #[must_use]
    pub fn new(error: io::Error, path: Option<PathBuf>) -> Self {
        Self { error, path }
    }

    /// Captures `errno` right now.
    #[must_use]
    pub fn last_os_error<P: Into<PathBuf>>(path: Option<P>) -> Self {
        Self::new(io::Error::last_os_error(), path.map(Into::into))
    }

    /// Builds an error from a raw OS error code.
    #[must_use]
    pub fn from_raw_os_error<P: Into<PathBuf>>(code: i32, path: Option<P>) -> Self {
        Self::new(io::Error::from_raw_os_error(code), path.map(Into::into))
    }

    /// The raw `errno` value, present for every error raised by an OS call.
    #[inline]
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        self.error.raw_os_error()
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        self.error.kind()
    }

    /// The path the failing operation was applied to, if any.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Shorthand for `ENOENT`.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.raw_os_error() == Some(libc::ENOENT)
    }

    #[must_use]
    pub fn into_io_error(self) -> io::Error {
        self.error
    }
}

impl From<io::Error> for DirError {
    fn from(error: io::Error) -> Self {
        Self::new(error, None)
    }
}

impl From<DirError> for io::Error {
    fn from(error: DirError) -> Self {
        match error.path {
            // keep the errno so callers can still match on raw_os_error
            Some(_) if error.error.raw_os_error().is_some() => error.error,
            Some(path) => Self::new(
                error.error.kind(),
                format!("{}: {}", error.error, path.display()),
            ),
            None => error.error,
        }
    }
}

impl fmt::Display for DirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", self.error, path.display()),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for DirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
