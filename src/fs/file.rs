use crate::fs::FileDes;
use core::fmt;
use std::fs::File;
use std::io::{self, IoSlice, IoSliceMut, Read, Seek, SeekFrom, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::path::{Path, PathBuf};

/// Mode label of files created through [`Directory::open`](crate::Directory::open).
pub(crate) const DIRECTORY_OPEN_MODE: &str = "w+";
/// Mode label of files opened through [`Entry::open`](crate::Entry::open).
pub(crate) const ENTRY_OPEN_MODE: &str = "r+";

/**
 A readable, writable file obtained through a descriptor-relative open.

 Wraps the descriptor returned by `openat` in a [`File`] and remembers the path it was
 reached by and a stdio style mode label (`"w+"` or `"r+"`). The descriptor is closed
 when the handle is dropped. The path is a label only, nothing is ever re-opened
 through it.
*/
pub struct FileHandle {
    file: File,
    path: PathBuf,
    mode: &'static str,
}

impl FileHandle {
    #[inline]
    pub(crate) fn from_fd(fd: FileDes, path: PathBuf, mode: &'static str) -> Self {
        Self {
            file: File::from(OwnedFd::from(fd)),
            path,
            mode,
        }
    }

    /// The path label, `<directory>/<name>`.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        self.mode
    }

    #[inline]
    #[must_use]
    pub const fn as_file(&self) -> &File {
        &self.file
    }

    /// Drops the labels and hands back the underlying [`File`].
    #[inline]
    #[must_use]
    pub fn into_file(self) -> File {
        self.file
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<FileHandle(path={:?}, mode={:?})>", self.path, self.mode)
    }
}

impl Read for FileHandle {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    #[inline]
    fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        self.file.read_vectored(bufs)
    }

    #[inline]
    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.file.read_to_end(buf)
    }
}

impl Read for &FileHandle {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.file).read(buf)
    }
}

impl Write for FileHandle {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        self.file.write_vectored(bufs)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Write for &FileHandle {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&self.file).write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        (&self.file).flush()
    }
}

impl Seek for FileHandle {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl Seek for &FileHandle {
    #[inline]
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        (&self.file).seek(pos)
    }
}

impl AsRawFd for FileHandle {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl AsFd for FileHandle {
    #[inline]
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl From<FileHandle> for File {
    #[inline]
    fn from(handle: FileHandle) -> Self {
        handle.file
    }
}

#[cfg(test)]
mod tests {
    use crate::Directory;
    use std::fs::{self, File};
    use std::io::{Read as _, Seek as _, SeekFrom, Write as _};
    use std::path::PathBuf;

    fn scratch(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("atdir_file_{tag}_{}", rand::random::<u64>()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn shared_reference_reads_writes_and_seeks() {
        let dir = scratch("shared");
        let handle = Directory::new(&dir).open("shared.txt").unwrap();

        let mut writer = &handle;
        writer.write_all(b"through a shared ref").unwrap();
        writer.flush().unwrap();

        let mut reader = &handle;
        assert_eq!(reader.seek(SeekFrom::Start(8)).unwrap(), 8);
        let mut contents = String::new();
        reader.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "shared ref");
        assert_eq!(
            fs::read_to_string(dir.join("shared.txt")).unwrap(),
            "through a shared ref"
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn into_file_keeps_the_descriptor() {
        let dir = scratch("into_file");
        let handle = Directory::new(&dir).open("kept.txt").unwrap();
        assert_eq!(
            format!("{handle:?}"),
            format!("<FileHandle(path={:?}, mode=\"w+\")>", dir.join("kept.txt"))
        );

        let mut file: File = handle.into_file();
        file.write_all(b"still open").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "still open");
        fs::remove_dir_all(&dir).unwrap();
    }
}
