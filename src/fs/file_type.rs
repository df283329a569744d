#![allow(clippy::inline_always)]
use libc::{DT_BLK, DT_CHR, DT_DIR, DT_FIFO, DT_LNK, DT_REG, DT_SOCK, DT_UNKNOWN};

/// Represents the type of a directory entry, as reported by the scan's `d_type` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    BlockDevice,
    CharDevice,
    Directory,
    Fifo,
    Symlink,
    RegularFile,
    Socket,
    Unknown,
}

impl FileType {
    /// Every entry type, in `d_type` declaration order.
    pub const ALL: [Self; 8] = [
        Self::BlockDevice,
        Self::CharDevice,
        Self::Directory,
        Self::Fifo,
        Self::Symlink,
        Self::RegularFile,
        Self::Socket,
        Self::Unknown,
    ];

    /**
     Converts a `libc` `d_type` tag to a `FileType`.

     The mapping is total: any tag the platform does not define (or that some
     filesystem reports without filling it in) is [`FileType::Unknown`].

     ```
     use atdir::FileType;
     assert_eq!(FileType::from_dtype(libc::DT_DIR), FileType::Directory);
     assert_eq!(FileType::from_dtype(0xfe), FileType::Unknown);
     ```
    */
    #[must_use]
    #[inline(always)]
    pub const fn from_dtype(d_type: u8) -> Self {
        match d_type {
            DT_DIR => Self::Directory,
            DT_REG => Self::RegularFile,
            DT_BLK => Self::BlockDevice,
            DT_CHR => Self::CharDevice,
            DT_FIFO => Self::Fifo,
            DT_LNK => Self::Symlink,
            DT_SOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// The `libc` tag this type corresponds to.
    #[must_use]
    #[inline(always)]
    pub const fn as_dtype(self) -> u8 {
        match self {
            Self::BlockDevice => DT_BLK,
            Self::CharDevice => DT_CHR,
            Self::Directory => DT_DIR,
            Self::Fifo => DT_FIFO,
            Self::Symlink => DT_LNK,
            Self::RegularFile => DT_REG,
            Self::Socket => DT_SOCK,
            Self::Unknown => DT_UNKNOWN,
        }
    }

    /// The C constant name, eg `DT_REG`. Used by the `Debug` rendering of entries.
    #[must_use]
    pub const fn symbolic_name(self) -> &'static str {
        match self {
            Self::BlockDevice => "DT_BLK",
            Self::CharDevice => "DT_CHR",
            Self::Directory => "DT_DIR",
            Self::Fifo => "DT_FIFO",
            Self::Symlink => "DT_LNK",
            Self::RegularFile => "DT_REG",
            Self::Socket => "DT_SOCK",
            Self::Unknown => "DT_UNKNOWN",
        }
    }

    #[must_use]
    #[inline]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlockDevice => write!(f, "Block device"),
            Self::CharDevice => write!(f, "Character device"),
            Self::Directory => write!(f, "Directory"),
            Self::Fifo => write!(f, "FIFO"),
            Self::Symlink => write!(f, "Symlink"),
            Self::RegularFile => write!(f, "Regular file"),
            Self::Socket => write!(f, "Socket"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The eight entry types under their C names, as process-wide constants.
pub mod consts {
    use super::FileType;

    /// Block device.
    pub const DT_BLK: FileType = FileType::BlockDevice;
    /// Character device.
    pub const DT_CHR: FileType = FileType::CharDevice;
    pub const DT_DIR: FileType = FileType::Directory;
    /// Named pipe.
    pub const DT_FIFO: FileType = FileType::Fifo;
    /// Symbolic link.
    pub const DT_LNK: FileType = FileType::Symlink;
    pub const DT_REG: FileType = FileType::RegularFile;
    /// Unix domain socket.
    pub const DT_SOCK: FileType = FileType::Socket;
    /// Type not reported by the filesystem (or not recognised).
    pub const DT_UNKNOWN: FileType = FileType::Unknown;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_total() {
        for tag in 0..=u8::MAX {
            let ft = FileType::from_dtype(tag);
            assert!(FileType::ALL.contains(&ft));
            if ft != FileType::Unknown {
                assert_eq!(ft.as_dtype(), tag, "tag {tag} did not round trip");
            }
        }
    }

    #[test]
    fn known_tags() {
        assert_eq!(FileType::from_dtype(DT_REG), FileType::RegularFile);
        assert_eq!(FileType::from_dtype(DT_LNK), FileType::Symlink);
        assert_eq!(FileType::from_dtype(DT_SOCK), FileType::Socket);
        assert_eq!(FileType::from_dtype(DT_UNKNOWN), FileType::Unknown);
    }

    #[test]
    fn symbolic_names_are_distinct() {
        let mut names: Vec<_> = FileType::ALL.iter().map(|t| t.symbolic_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 8);
        assert_eq!(consts::DT_DIR.symbolic_name(), "DT_DIR");
    }
}
