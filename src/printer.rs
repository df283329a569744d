use crate::config::Listing;
use crossbeam_channel::Receiver;
use std::io::{self, BufWriter, IsTerminal as _, Write, stdout};

/// Outcome of draining the listing channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub failures: usize,
}

/// Writes every listing received on `listings` to stdout, errors go to stderr.
pub fn print_listings(listings: &Receiver<Listing>) -> io::Result<Summary> {
    let std_out = stdout();
    let mut writer = if std_out.is_terminal() {
        BufWriter::new(std_out.lock())
    } else {
        BufWriter::with_capacity(16 * 4096, std_out.lock())
    };
    let summary = write_listings(&mut writer, listings.iter())?;
    writer.flush()?;
    Ok(summary)
}

#[allow(clippy::print_stderr)]
pub fn write_listings<W, I>(writer: &mut W, listings: I) -> io::Result<Summary>
where
    W: Write,
    I: IntoIterator<Item = Listing>,
{
    let mut summary = Summary::default();
    for listing in listings {
        writer.write_all(&listing.records)?;
        summary.records += listing.count;
        if let Some(error) = listing.error {
            // keep stdout and stderr in order when both go to a terminal
            writer.flush()?;
            eprintln!("pfind: {error}");
            summary.failures += 1;
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atdir::DirError;

    #[test]
    fn concatenates_listings_and_counts_failures() {
        let listings = vec![
            Listing {
                records: b"1\t/a/x\n".to_vec(),
                count: 1,
                error: None,
            },
            Listing {
                records: Vec::new(),
                count: 0,
                error: Some(DirError::from_raw_os_error(libc::ENOENT, Some("/missing"))),
            },
            Listing {
                records: b"2\t/b/y\n3\t/b/z\n".to_vec(),
                count: 2,
                error: None,
            },
        ];
        let mut out = Vec::new();
        let summary = write_listings(&mut out, listings).unwrap();
        assert_eq!(out, b"1\t/a/x\n2\t/b/y\n3\t/b/z\n");
        assert_eq!(
            summary,
            Summary {
                records: 3,
                failures: 1
            }
        );
    }
}
