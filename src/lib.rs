/*!
 Directory handles, iterators and entries built on descriptor-relative operations.

 The crate models a single directory level with three cooperating types:

 - [`Directory`]: a named directory. It lazily opens its own descriptor and creates or
   opens files beneath it with `openat`, so the directory path is resolved once.
 - [`DirectoryIter`]: an open `readdir` stream over a directory path, yielding one
   [`Entry`] per record (including `.` and `..`, in filesystem order).
 - [`Entry`]: an immutable copy of one raw record. Name, inode and [`FileType`] are
   derived lazily and cached; [`Entry::open`] goes through `openat` on the stream that
   produced the entry, which the entry keeps alive.

 Nothing here recurses, filters, sorts or follows symlinks: [`Entry::directory`] hands
 back a [`Directory`] and the caller decides what to do with it.

 All types are `!Send`: each handle, and the entries of one iterator, belong to a
 single owner. Scanning several directories concurrently means one handle per thread.

 # Examples
 ```
 use atdir::{Directory, FileType};
 use std::fs;

 let root = std::env::temp_dir().join("atdir_crate_doc");
 let _ = fs::remove_dir_all(&root);
 fs::create_dir_all(root.join("b")).unwrap();
 fs::write(root.join("a.txt"), "").unwrap();

 for entry in Directory::new(&root).iterate().unwrap() {
     let entry = entry.unwrap();
     if entry.is_dot_or_dot_dot() {
         continue;
     }
     match entry.file_type() {
         FileType::Directory => assert_eq!(entry.name(), "b"),
         FileType::RegularFile => assert_eq!(entry.path(), root.join("a.txt")),
         other => panic!("unexpected {other}"),
     }
 }
 fs::remove_dir_all(&root).unwrap();
 ```
*/

#[macro_use]
pub(crate) mod macros;

mod error;
pub mod fs;
pub(crate) mod util;


pub use error::DirError;
pub use fs::consts::{DT_BLK, DT_CHR, DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, DT_UNKNOWN};
pub use fs::{
    Directory, DirectoryIter, Entry, FileDes, FileHandle, FileType, RawDirent, Result,
};

#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) use libc::{dirent64, readdir64};

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) use libc::{dirent as dirent64, readdir as readdir64};
