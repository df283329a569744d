use crate::dirent64;
use core::ffi::CStr;
use core::ptr::NonNull;

/**
 An owned copy of one directory record returned by `readdir`.

 The record libc hands out lives in the stream's internal buffer and is overwritten by
 the next read, so everything an entry needs later (inode, type tag, record length and
 the null terminated name, ready to be passed to `openat`) is copied out here at read
 time. The value is immutable once built.
*/
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RawDirent {
    pub(crate) ino: u64,
    pub(crate) reclen: u16,
    pub(crate) d_type: u8,
    pub(crate) name: Box<CStr>,
}

impl RawDirent {
    /**
     Copies the fields out of a record produced by `readdir`.

     # Safety
     `drnt` must point at a valid record returned by the last `readdir` call on a stream
     that has not been read from or closed since.
    */
    #[inline]
    pub(crate) unsafe fn from_dirent(drnt: NonNull<dirent64>) -> Self {
        let ptr = drnt.as_ptr();
        // SAFETY: the pointer is non null and valid by precondition
        let (ino, reclen, d_type, name_ptr) = unsafe {
            (
                access_dirent!(ptr, d_ino),
                access_dirent!(ptr, d_reclen),
                access_dirent!(ptr, d_type),
                access_dirent!(ptr, d_name),
            )
        };
        // SAFETY: d_name is always null terminated within the record
        let name: Box<CStr> = unsafe { CStr::from_ptr(name_ptr) }.into();
        Self {
            ino,
            reclen,
            d_type,
            name,
        }
    }

    /// Builds a record by hand. Mostly useful for tests and benchmarks.
    #[must_use]
    pub fn new(ino: u64, d_type: u8, name: &CStr) -> Self {
        Self {
            ino,
            reclen: 0,
            d_type,
            name: name.into(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn ino(&self) -> u64 {
        self.ino
    }

    /// The raw `d_type` tag, unmapped.
    #[inline]
    #[must_use]
    pub const fn d_type(&self) -> u8 {
        self.d_type
    }

    /// Length of the on-disk record as reported by the OS (zero for hand built records).
    #[inline]
    #[must_use]
    pub const fn reclen(&self) -> u16 {
        self.reclen
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &CStr {
        &self.name
    }

    /// True for the `.` and `..` records every directory contains.
    #[inline]
    #[must_use]
    pub fn is_dot_or_dot_dot(&self) -> bool {
        matches!(self.name.to_bytes(), b"." | b"..")
    }
}

impl core::fmt::Debug for RawDirent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawDirent")
            .field("d_ino", &self.ino)
            .field("d_reclen", &self.reclen)
            .field("d_type", &self.d_type)
            .field("d_name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[cfg(any(target_os = "linux", target_os = "android"))]
    struct FakeDirent64 {
        d_ino: u64,
        d_off: i64,
        d_reclen: u16,
        d_type: u8,
        d_name: [u8; 256],
    }

    #[test]
    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn copies_fields_out_of_the_record() {
        let mut entry = FakeDirent64 {
            d_ino: 4242,
            d_off: 0,
            d_reclen: 32,
            d_type: libc::DT_REG,
            d_name: [0; 256],
        };
        entry.d_name[..5].copy_from_slice(b"a.txt");

        let ptr = NonNull::from(&entry).cast::<dirent64>();
        // SAFETY: FakeDirent64 mirrors the dirent64 layout and the name is terminated
        let record = unsafe { RawDirent::from_dirent(ptr) };
        // the copy must not depend on the source buffer
        entry.d_name[0] = b'X';

        assert_eq!(record.ino(), 4242);
        assert_eq!(record.reclen(), 32);
        assert_eq!(record.d_type(), libc::DT_REG);
        assert_eq!(record.name(), c"a.txt");
    }

    #[test]
    fn dot_detection() {
        assert!(RawDirent::new(1, libc::DT_DIR, c".").is_dot_or_dot_dot());
        assert!(RawDirent::new(1, libc::DT_DIR, c"..").is_dot_or_dot_dot());
        assert!(!RawDirent::new(1, libc::DT_DIR, c"...").is_dot_or_dot_dot());
        assert!(!RawDirent::new(1, libc::DT_REG, c".hidden").is_dot_or_dot_dot());
    }
}
