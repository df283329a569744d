// Descriptor numbers are process wide and get reused, so everything lives in one test
// to keep other threads from opening files in between the checks.
#![allow(clippy::unwrap_used)]

use atdir::{Directory, DirectoryIter, Entry};
use std::fs;
use std::io::Read as _;
use std::os::fd::RawFd;

fn is_open(fd: RawFd) -> bool {
    // SAFETY: F_GETFD only queries the descriptor table
    unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
}

#[test]
fn descriptors_are_released_on_drop() {
    let root = std::env::temp_dir().join(format!("atdir_release_{}", rand::random::<u64>()));
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("kept.txt"), "still here").unwrap();

    // an iterator closes its stream when dropped
    let iter = DirectoryIter::new(&root).unwrap();
    let fd = iter.dirfd();
    assert!(is_open(fd));
    drop(iter);
    assert!(!is_open(fd));

    // also when dropped halfway through
    let mut iter = DirectoryIter::new(&root).unwrap();
    let fd = iter.dirfd();
    let _ = iter.next().unwrap().unwrap();
    drop(iter);
    assert!(!is_open(fd));

    // a directory has no descriptor until it opens a file
    let dir = Directory::new(&root);
    assert_eq!(dir.as_raw_fd(), None);
    drop(dir.open("created.txt").unwrap());
    let fd = dir.as_raw_fd().unwrap();
    assert!(is_open(fd));
    drop(dir);
    assert!(!is_open(fd));

    // an entry keeps the stream open after the iterator is gone
    let iter = DirectoryIter::new(&root).unwrap();
    let fd = iter.dirfd();
    let entry: Entry = iter
        .map(Result::unwrap)
        .find(|e| e.name() == "kept.txt")
        .unwrap();
    assert!(is_open(fd));
    let mut contents = String::new();
    entry.open().unwrap().read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "still here");

    let clone = entry.clone();
    drop(entry);
    assert!(is_open(fd));
    drop(clone);
    assert!(!is_open(fd));

    // a failed open leaves nothing behind
    let before = fs::read_dir("/proc/self/fd").map(Iterator::count).ok();
    assert!(DirectoryIter::new(root.join("kept.txt")).is_err());
    assert!(DirectoryIter::new(root.join("missing")).is_err());
    let after = fs::read_dir("/proc/self/fd").map(Iterator::count).ok();
    assert_eq!(before, after);

    fs::remove_dir_all(&root).unwrap();
}
