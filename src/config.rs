use atdir::{DirError, Directory, Entry};
use std::path::PathBuf;

/// How a single entry is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<inode>\t<dir>/<name>`, the find/index line
    FindLine,
    /// The `Debug` representation of the entry
    DebugRepr,
}

/// Settings for listing directories, built from the command line.
#[derive(Debug, Clone)]
pub struct ListConfig {
    pub include_dots: bool,
    pub format: OutputFormat,
    /// Byte written after every record, `\n` or `\0`
    pub terminator: u8,
    pub threads: usize,
}

/// Everything produced while listing one directory.
#[derive(Debug)]
pub struct Listing {
    /// Rendered records, terminators included
    pub records: Vec<u8>,
    pub count: usize,
    /// Set when opening or reading the directory failed, `records` holds what was read before
    pub error: Option<DirError>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            include_dots: false,
            format: OutputFormat::FindLine,
            terminator: b'\n',
            threads: 1,
        }
    }
}

impl ListConfig {
    /// Appends one rendered record for `entry` to `out`.
    pub fn render(&self, entry: &Entry, out: &mut Vec<u8>) {
        match self.format {
            OutputFormat::FindLine => {
                let line = entry.find_line().into_encoded_bytes();
                // the line always ends with '\n', swap it for the configured terminator
                let body = line.strip_suffix(b"\n").unwrap_or(&line);
                out.extend_from_slice(body);
            }
            OutputFormat::DebugRepr => out.extend_from_slice(format!("{entry:?}").as_bytes()),
        }
        out.push(self.terminator);
    }

    /**
     Lists one directory level. `None` lists the current directory.

     Stops at the first read error; the records read so far are kept.
    */
    pub fn list(&self, root: Option<&PathBuf>) -> Listing {
        let directory = root.map_or_else(Directory::current, Directory::new);
        let mut listing = Listing {
            records: Vec::new(),
            count: 0,
            error: None,
        };

        let entries = match directory.iterate() {
            Ok(entries) => entries,
            Err(e) => {
                listing.error = Some(e);
                return listing;
            }
        };

        for entry in entries {
            match entry {
                Ok(entry) if !self.include_dots && entry.is_dot_or_dot_dot() => {}
                Ok(entry) => {
                    self.render(&entry, &mut listing.records);
                    listing.count += 1;
                }
                Err(e) => {
                    listing.error = Some(e);
                    break;
                }
            }
        }
        listing
    }
}
