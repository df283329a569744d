mod dir_entry;
mod directory;
mod file;
mod file_type;
mod iter;
mod record;
mod types;

pub use dir_entry::Entry;
pub use directory::Directory;
pub use file::FileHandle;
pub use file_type::{FileType, consts};
pub use iter::DirectoryIter;
pub use record::RawDirent;
pub use types::{FileDes, Result};
