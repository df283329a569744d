use crate::fs::file::{ENTRY_OPEN_MODE, FileHandle};
use crate::fs::iter::ScanHandle;
use crate::fs::{Directory, FileDes, FileType, RawDirent, Result};
use crate::{DirError, util};
use core::cell::{Cell, OnceCell};
use core::ffi::CStr;
use core::fmt;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStringExt as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/**
  One record read from a [`DirectoryIter`](crate::DirectoryIter).

  An entry is an immutable snapshot of the raw record (inode, type tag, name) taken when
  the iterator advanced, plus a shared handle on the iterator's open stream. The derived
  views are computed on first use and cached:

  - **name**: the record's name, decoded once.
  - **inode**: the record's inode number.
  - **file type**: the record's `d_type` mapped onto [`FileType`].

  Keeping the stream alive is what lets [`path`](Self::path) and
  [`open`](Self::open) keep working after the iterator itself has been dropped: `open`
  goes through `openat` on the stream's descriptor, never through the rebuilt path.

  # Examples
  ```
  use atdir::{DirectoryIter, FileType};
  use std::fs;

  let root = std::env::temp_dir().join("atdir_entry_doc");
  let _ = fs::remove_dir_all(&root);
  fs::create_dir_all(&root).unwrap();
  fs::write(root.join("a.txt"), "hello").unwrap();

  let entry = DirectoryIter::new(&root)
      .unwrap()
      .map(Result::unwrap)
      .find(|e| e.name() == "a.txt")
      .unwrap();

  assert_eq!(entry.file_type(), FileType::RegularFile);
  assert_eq!(entry.path(), root.join("a.txt"));
  assert!(entry.directory().is_none());
  fs::remove_dir_all(&root).unwrap();
  ```
*/
#[derive(Clone)]
pub struct Entry {
    /// Copy of the record as read from the stream
    record: RawDirent,
    /// The stream that produced this entry, kept open while the entry lives
    scan: Rc<ScanHandle>,
    /// `None`/unset means not computed yet
    name: OnceCell<OsString>,
    inode: Cell<Option<u64>>,
    file_type: Cell<Option<FileType>>,
}

impl Entry {
    #[inline]
    pub(crate) fn new(record: RawDirent, scan: Rc<ScanHandle>) -> Self {
        Self {
            record,
            scan,
            name: OnceCell::new(),
            inode: Cell::new(None),
            file_type: Cell::new(None),
        }
    }

    /// The entry's name, decoded from the raw record on first call.
    #[inline]
    pub fn name(&self) -> &OsStr {
        self.name
            .get_or_init(|| OsString::from_vec(self.record.name().to_bytes().to_vec()))
    }

    /// The inode number reported by the scan.
    #[inline]
    pub fn inode(&self) -> u64 {
        if let Some(inode) = self.inode.get() {
            return inode;
        }
        let inode = self.record.ino();
        self.inode.set(Some(inode));
        inode
    }

    /**
     The entry type reported by the scan.

     No `stat` is made: filesystems that do not fill in `d_type` yield
     [`FileType::Unknown`].
    */
    #[inline]
    pub fn file_type(&self) -> FileType {
        if let Some(file_type) = self.file_type.get() {
            return file_type;
        }
        let file_type = FileType::from_dtype(self.record.d_type());
        self.file_type.set(Some(file_type));
        file_type
    }

    /// The name as stored in the record, null terminated.
    #[inline]
    pub fn raw_name(&self) -> &CStr {
        self.record.name()
    }

    #[inline]
    pub const fn record(&self) -> &RawDirent {
        &self.record
    }

    /// Path of the directory that was being iterated.
    #[inline]
    pub fn parent_path(&self) -> &Path {
        self.scan.path()
    }

    /// True for the `.` and `..` records.
    #[inline]
    pub fn is_dot_or_dot_dot(&self) -> bool {
        self.record.is_dot_or_dot_dot()
    }

    /// Checks the cached type without further syscalls
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.file_type().is_dir()
    }

    /**
     Builds `<iterator path>/<name>`.

     Computed fresh on every call. The separator is always inserted, so
     `entry.path()` is exactly the iterator path, `/`, and [`name`](Self::name).
    */
    #[inline]
    pub fn path(&self) -> PathBuf {
        util::join_name(self.scan.path_bytes(), self.record.name().to_bytes())
    }

    /**
     Returns a [`Directory`] for this entry if it is a directory, `None` otherwise.

     Being "a directory" is decided by the scan's type tag alone. Symlinks to directories
     and entries of unknown type give `None`.
    */
    #[inline]
    pub fn directory(&self) -> Option<Directory> {
        self.is_dir().then(|| Directory::new(self.path()))
    }

    /**
     Creates or opens the entry for reading and writing, relative to the iterator's
     descriptor.

     The file is opened with `openat(dirfd, name, O_CREAT | O_RDWR)` on every call,
     nothing is cached on the entry. When the entry has been removed in the meantime it
     is created again (mode `0o777` before umask).

     # Errors
     - the stream's descriptor cannot be obtained: the error carries the iterator's path.
     - `openat` fails (`EISDIR` for directories, `EACCES`...): the error carries
       [`path`](Self::path).
    */
    pub fn open(&self) -> Result<FileHandle> {
        let dirfd = self.scan.dirfd();
        if dirfd == -1 {
            return_os_error!(self.scan.path())
        }
        let path = self.path();
        match FileDes::create_at(dirfd, self.record.name()) {
            Ok(fd) => Ok(FileHandle::from_fd(fd, path, ENTRY_OPEN_MODE)),
            Err(e) => Err(DirError::new(e, Some(path))),
        }
    }

    /**
     Renders the entry as one line of `find`-style index output:
     `"<inode>\t<iterator path>/<name>\n"`.

     Built straight from the raw record, the cached name/inode/type are left untouched.

     ```
     use atdir::DirectoryIter;
     use std::os::unix::fs::MetadataExt;

     let root = std::env::temp_dir().join("atdir_find_line_doc");
     let _ = std::fs::remove_dir_all(&root);
     std::fs::create_dir_all(&root).unwrap();
     std::fs::write(root.join("a.txt"), "").unwrap();
     let ino = std::fs::metadata(root.join("a.txt")).unwrap().ino();

     let entry = DirectoryIter::new(&root)
         .unwrap()
         .map(Result::unwrap)
         .find(|e| e.name() == "a.txt")
         .unwrap();
     let expected = format!("{ino}\t{}/a.txt\n", root.display());
     assert_eq!(entry.find_line(), expected.as_str());
     std::fs::remove_dir_all(&root).unwrap();
     ```
    */
    pub fn find_line(&self) -> OsString {
        let base = self.scan.path_bytes();
        let name = self.record.name().to_bytes();
        let inode = self.record.ino().to_string();

        let mut line: Vec<u8> = Vec::with_capacity(inode.len() + base.len() + name.len() + 3);
        line.extend_from_slice(inode.as_bytes());
        line.push(b'\t');
        line.extend_from_slice(base);
        line.push(b'/');
        line.extend_from_slice(name);
        line.push(b'\n');
        OsString::from_vec(line)
    }

    #[cfg(test)]
    pub(crate) fn cached_fields(&self) -> (bool, bool, bool) {
        (
            self.name.get().is_some(),
            self.inode.get().is_some(),
            self.file_type.get().is_some(),
        )
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Entry(path={:?}, d_ino={}, d_type={}, d_name={:?})>",
            self.scan.path(),
            self.inode(),
            self.file_type().symbolic_name(),
            self.name()
        )
    }
}
