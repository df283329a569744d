/**
 Portable field access for `dirent`/`dirent64` records.

 The layout of a directory record differs between platforms (inode field naming,
 missing `d_type` on some systems), this macro hides those differences behind one
 spelling. The name field is returned as a pointer because the kernel/libc does not
 guarantee the full `[c_char; 256]` array is backed by memory.

 # Safety
 The caller must guarantee the pointer is non-null and points at a record
 returned by `readdir` that has not been invalidated by a subsequent read.
*/
macro_rules! access_dirent {
    ($entry_ptr:expr, d_reclen) => {{
        // SAFETY: Caller must ensure pointer is valid
        (*$entry_ptr).d_reclen
    }};
    ($entry_ptr:expr, d_name) => {{
        //see reference https://github.com/rust-lang/rust/blob/8712e4567551a2714efa66dac204ec7137bc5605/library/std/src/sys/fs/unix.rs#L740
        (&raw const (*$entry_ptr).d_name).cast::<core::ffi::c_char>()
    }};
    ($entry_ptr:expr, d_type) => {{
        #[cfg(any(
            target_os = "solaris",
            target_os = "illumos",
        ))]
        {
            libc::DT_UNKNOWN // the record carries no type on these systems
        }
        #[cfg(not(any(
            target_os = "solaris",
            target_os = "illumos",
        )))]
        {
            (*$entry_ptr).d_type
        }
    }};
    ($entry_ptr:expr, d_ino) => {{
        #[cfg(any(
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        ))]
        {
            // SAFETY: Caller must ensure pointer is valid
            (*$entry_ptr).d_fileno as u64
        }

        #[cfg(not(any(
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )))]
        {
            // SAFETY: Caller must ensure pointer is valid
            (*$entry_ptr).d_ino as u64
        }
    }};
}

/// Returns the current `errno` as a [`DirError`](crate::DirError), optionally tagged with a path.
macro_rules! return_os_error {
    () => {{
        return Err($crate::DirError::last_os_error(None::<std::path::PathBuf>));
    }};
    ($path:expr) => {{
        return Err($crate::DirError::last_os_error(Some($path)));
    }};
}

/// A cheap debug print macro, only prints if `debug_assertions` is enabled
#[macro_export]
macro_rules! debug_print {
    ($expr:expr) => {
        #[cfg(debug_assertions)]
        {
            dbg!($expr);
        }
    };
}
