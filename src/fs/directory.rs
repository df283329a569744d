use crate::fs::file::{DIRECTORY_OPEN_MODE, FileHandle};
use crate::fs::{DirectoryIter, FileDes, Result};
use crate::util::{self, CURRENT_DIR};
use crate::DirError;
use core::cell::OnceCell;
use core::fmt;
use std::ffi::OsStr;
use std::os::fd::RawFd;
use std::os::unix::ffi::OsStrExt as _;
use std::path::{Path, PathBuf};

/**
 A named directory, used as the base for descriptor-relative file creation.

 Constructing a `Directory` never touches the filesystem. Its own descriptor is opened
 the first time [`open`](Self::open) needs it, cached, and reused by every later call
 until the `Directory` is dropped. [`iterate`](Self::iterate) is independent of that
 descriptor: each call opens a fresh scan against the path.

 A `Directory` without a path stands for the current working directory and resolves to
 `"."` whenever the filesystem is touched.

 # Examples
 ```
 use atdir::Directory;
 use std::io::{Read, Seek, SeekFrom, Write};

 let root = std::env::temp_dir().join("atdir_directory_doc");
 let _ = std::fs::remove_dir_all(&root);
 std::fs::create_dir_all(&root).unwrap();

 let dir = Directory::new(&root);
 assert!(dir.as_raw_fd().is_none());

 let mut file = dir.open("new.txt").unwrap();
 file.write_all(b"created").unwrap();
 file.seek(SeekFrom::Start(0)).unwrap();
 let mut contents = String::new();
 file.read_to_string(&mut contents).unwrap();
 assert_eq!(contents, "created");

 let fd = dir.as_raw_fd();
 assert!(fd.is_some());
 let _again = dir.open("other.txt").unwrap();
 assert_eq!(dir.as_raw_fd(), fd);
 std::fs::remove_dir_all(&root).unwrap();
 ```
*/
#[derive(Default)]
pub struct Directory {
    path: Option<PathBuf>,
    /// Opened lazily, then kept for the lifetime of the directory
    fd: OnceCell<FileDes>,
}

impl Directory {
    /// A directory at `path`. Nothing is opened yet.
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
            fd: OnceCell::new(),
        }
    }

    /// The current working directory, without recording a path.
    #[inline]
    #[must_use]
    pub fn current() -> Self {
        Self::default()
    }

    /// The path given at construction, `None` for [`Directory::current`].
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The path actually used for OS calls.
    #[inline]
    fn effective_path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(CURRENT_DIR))
    }

    /**
     The directory's own descriptor if it has been opened already.

     Stays the same from the first successful [`open`](Self::open) until drop.
    */
    #[inline]
    #[must_use]
    pub fn as_raw_fd(&self) -> Option<RawFd> {
        self.fd.get().map(|fd| fd.0)
    }

    /**
     Starts a new scan of this directory.

     Always opens a fresh stream against the path, whether or not this directory's own
     descriptor is open. The two are independent descriptors.

     # Errors
     An I/O error carrying `errno` and the path if it cannot be opened as a directory.
    */
    pub fn iterate(&self) -> Result<DirectoryIter> {
        DirectoryIter::open(self.path.as_deref())
    }

    /// Returns the cached descriptor, opening it first if needed.
    fn dirfd(&self) -> std::io::Result<RawFd> {
        if let Some(fd) = self.fd.get() {
            return Ok(fd.0);
        }
        let cpath = util::to_cstring(self.effective_path()).map_err(DirError::into_io_error)?;
        let fd = FileDes::open_dir(&cpath)?;
        Ok(self.fd.get_or_init(|| fd).0)
    }

    /**
     Creates or opens `name` inside this directory for reading and writing.

     The first call opens (and caches) the directory descriptor; the file itself is
     reached with `openat(dirfd, name, O_CREAT | O_RDWR)` so the directory path is
     resolved only once, however many files are opened. Missing files are created with
     mode `0o777` before umask.

     # Errors
     The directory cannot be opened, `openat` fails, or `name` contains a NUL byte
     (`EINVAL`). Every error carries `<directory>/<name>`.
    */
    pub fn open<N: AsRef<OsStr>>(&self, name: N) -> Result<FileHandle> {
        let name = name.as_ref();
        let path = util::join_name(self.effective_path().as_os_str().as_bytes(), name.as_bytes());
        let dirfd = match self.dirfd() {
            Ok(fd) => fd,
            Err(e) => return Err(DirError::new(e, Some(path))),
        };
        let cname = util::name_to_cstring(name, &path)?;

        match FileDes::create_at(dirfd, &cname) {
            Ok(fd) => Ok(FileHandle::from_fd(fd, path, DIRECTORY_OPEN_MODE)),
            Err(e) => Err(DirError::new(e, Some(path))),
        }
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "<Directory(path={path:?})>"),
            None => write!(f, "<Directory(path=None)>"),
        }
    }
}
