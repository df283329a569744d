#![allow(clippy::must_use_candidate)]

use crate::fs::{Entry, FileDes, RawDirent, Result};
use crate::util::{self, CURRENT_DIR};
use crate::{DirError, dirent64, readdir64};
use core::ffi::CStr;
use core::fmt;
use core::ptr::NonNull;
use libc::DIR;
use std::ffi::OsStr;
use std::os::fd::RawFd;
use std::os::unix::ffi::OsStrExt as _;
use std::path::Path;
use std::rc::Rc;

/**
 The open directory stream behind a [`DirectoryIter`].

 Shared between the iterator and every [`Entry`] it produced, entries need it to rebuild
 their path and as the base descriptor for `openat`. The stream is closed once, when the
 last of them goes away.
*/
pub(crate) struct ScanHandle {
    /// Raw directory pointer from libc's `fdopendir()` wrapped in a nonnull
    dir: NonNull<DIR>,
    /// Copy of the path the stream was opened with
    path: Box<CStr>,
}

impl ScanHandle {
    /// `open(O_DIRECTORY)` followed by `fdopendir`.
    fn open(path: Box<CStr>) -> Result<Self> {
        let fd = FileDes::open_dir(&path).map_err(|e| DirError::new(e, Some(cstr_path(&path).into())))?;
        debug_assert!(fd.is_open(), "We expect it to be open");

        // SAFETY: the descriptor is open and owned by `fd`
        let dir = unsafe { libc::fdopendir(*fd.as_borrowed_fd()) };
        let Some(dir) = NonNull::new(dir) else {
            // `fd` still owns the descriptor here and closes it on return
            return_os_error!(cstr_path(&path))
        };
        // the stream owns the descriptor from now on, closedir releases it
        let _ = fd.into_raw();

        Ok(Self { dir, path })
    }

    #[inline]
    pub(crate) fn path_bytes(&self) -> &[u8] {
        self.path.to_bytes()
    }

    #[inline]
    pub(crate) fn path(&self) -> &Path {
        cstr_path(&self.path)
    }

    /// The descriptor underlying the stream, `-1` if the stream has none.
    #[inline]
    pub(crate) fn dirfd(&self) -> RawFd {
        // SAFETY: `self.dir` is a valid stream for the lifetime of self
        unsafe { libc::dirfd(self.dir.as_ptr()) }
    }

    /**
     Reads the next record.

     `Ok(None)` is end of stream, `Err` is a genuine read failure: `errno` is cleared
     before the call so a null return with `errno` still zero means exhaustion.
    */
    fn read(&self) -> Result<Option<RawDirent>> {
        util::clear_errno();
        // SAFETY: `self.dir` is a valid directory pointer maintained by the handle
        let dirent_ptr: *mut dirent64 = unsafe { readdir64(self.dir.as_ptr()) };

        match NonNull::new(dirent_ptr) {
            // SAFETY: freshly returned by readdir, copied before any other call on the stream
            Some(drnt) => Ok(Some(unsafe { RawDirent::from_dirent(drnt) })),
            None if util::errno() == 0 => Ok(None),
            None => return_os_error!(self.path()),
        }
    }
}

impl Drop for ScanHandle {
    /**
    Closes the directory stream (and with it the descriptor) to prevent resource leaks.
    */
    #[inline]
    fn drop(&mut self) {
        // SAFETY: the stream is only closed here, exactly once
        unsafe { libc::closedir(self.dir.as_ptr()) };
    }
}

#[inline]
fn cstr_path(path: &CStr) -> &Path {
    Path::new(OsStr::from_bytes(path.to_bytes()))
}

/**
 An iterator over the records of one directory.

 Opened eagerly: construction performs `open` + `fdopendir` against the path and fails
 if either does. Each call to [`next`](Iterator::next) reads one record with `readdir`
 and wraps a private copy of it in an [`Entry`]. The `.` and `..` records are yielded
 like any other, and the order is whatever the filesystem returns.

 The sequence is not restartable. Once the stream reports end of directory, or a read
 error has been yielded, the iterator stays exhausted and never touches the stream
 again, build a new one to rescan.

 # Examples
 ```
 use atdir::DirectoryIter;
 use std::fs;

 let root = std::env::temp_dir().join("atdir_iter_doc");
 let _ = fs::remove_dir_all(&root);
 fs::create_dir_all(root.join("sub")).unwrap();
 fs::write(root.join("file.txt"), "hi").unwrap();

 let mut names: Vec<_> = DirectoryIter::new(&root)
     .unwrap()
     .map(|entry| entry.unwrap().name().to_owned())
     .collect();
 names.sort();
 assert_eq!(names, [".", "..", "file.txt", "sub"]);
 fs::remove_dir_all(&root).unwrap();
 ```
*/
pub struct DirectoryIter {
    scan: Rc<ScanHandle>,
    exhausted: bool,
}

impl DirectoryIter {
    /// Opens a scan over `path`.
    ///
    /// # Errors
    /// An I/O error carrying `errno` and `path` if the directory cannot be opened (missing,
    /// not a directory, permission denied...) or the stream cannot be created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(Some(path.as_ref()))
    }

    /// Opens a scan over the current directory, reported as `"."`.
    ///
    /// # Errors
    /// As [`DirectoryIter::new`].
    pub fn current() -> Result<Self> {
        Self::open(None)
    }

    pub(crate) fn open(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(CURRENT_DIR));
        let path: Box<CStr> = util::to_cstring(path)?.into_boxed_c_str();
        let scan = ScanHandle::open(path)?;
        Ok(Self {
            scan: Rc::new(scan),
            exhausted: false,
        })
    }

    /// The path this iterator was opened with.
    #[inline]
    pub fn path(&self) -> &Path {
        self.scan.path()
    }

    /**
     Returns the file descriptor of the open stream.

     Useful for operations that need the raw directory FD. The descriptor belongs to the
     stream and must not be closed by the caller.
    */
    #[inline]
    pub fn dirfd(&self) -> RawFd {
        self.scan.dirfd()
    }

    /// True once the stream reported end of directory.
    #[inline]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl Iterator for DirectoryIter {
    type Item = Result<Entry>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let read = self.scan.read();
        self.settle(read)
    }
}

impl DirectoryIter {
    /// Turns one read into an item. An error is reported once, then the iterator is done.
    #[inline]
    fn settle(&mut self, read: Result<Option<RawDirent>>) -> Option<Result<Entry>> {
        match read {
            Ok(Some(record)) => Some(Ok(Entry::new(record, Rc::clone(&self.scan)))),
            Ok(None) => {
                self.exhausted = true;
                None // signal end of directory
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

impl core::iter::FusedIterator for DirectoryIter {}

impl fmt::Debug for DirectoryIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<DirectoryIter(path={:?})>", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("atdir_iter_{tag}_{}", rand::random::<u64>()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn empty_directory_only_has_dots() {
        let dir = scratch("empty");
        let mut names: Vec<_> = DirectoryIter::new(&dir)
            .unwrap()
            .map(|e| e.unwrap().name().to_owned())
            .collect();
        names.sort();
        assert_eq!(names, [".", ".."]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn exhaustion_is_permanent() {
        let dir = scratch("exhaust");
        fs::write(dir.join("one"), "").unwrap();
        let mut iter = DirectoryIter::new(&dir).unwrap();
        assert_eq!(iter.by_ref().count(), 3);
        assert!(iter.is_exhausted());

        // new files are not picked up by an exhausted iterator
        fs::write(dir.join("two"), "").unwrap();
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());

        assert_eq!(DirectoryIter::new(&dir).unwrap().count(), 4);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = scratch("missing").join("nope");
        let err = DirectoryIter::new(&dir).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
        assert_eq!(err.path(), Some(dir.as_path()));
        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn regular_file_is_not_a_directory() {
        let dir = scratch("notdir");
        let file = dir.join("plain");
        fs::write(&file, "x").unwrap();
        let err = DirectoryIter::new(&file).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOTDIR));
        assert_eq!(err.path(), Some(file.as_path()));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = DirectoryIter::new("/tmp/bad\0name").unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
    }

    #[test]
    fn current_directory_is_dot() {
        let iter = DirectoryIter::current().unwrap();
        assert_eq!(iter.path(), Path::new("."));
        assert!(iter.dirfd() >= 0);
        assert_eq!(format!("{iter:?}"), r#"<DirectoryIter(path=".")>"#);
    }

    #[test]
    fn read_error_ends_the_sequence() {
        let dir = scratch("read_error");
        fs::write(dir.join("one"), "").unwrap();
        let mut iter = DirectoryIter::new(&dir).unwrap();

        let failed = DirError::from_raw_os_error(libc::EIO, Some(dir.as_path()));
        let err = iter.settle(Err(failed)).unwrap().unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EIO));
        assert!(iter.is_exhausted());

        // the stream still has records, they are not read any more
        assert!(iter.next().is_none());
        assert_eq!(iter.filter_map(Result::ok).count(), 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn iterator_is_its_own_into_iter() {
        let dir = scratch("self");
        let iter = DirectoryIter::new(&dir).unwrap();
        let fd = iter.dirfd();
        let same = iter.into_iter();
        assert_eq!(same.dirfd(), fd);
        fs::remove_dir_all(&dir).unwrap();
    }
}
