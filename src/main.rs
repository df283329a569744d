#![allow(clippy::print_stderr)]

use atdir::debug_print;
use clap::{ArgAction, CommandFactory, Parser, ValueHint, value_parser};
use clap_complete::aot::{Shell, generate};
use crossbeam_channel::unbounded;
use std::ffi::OsString;
use std::io::{ErrorKind, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
use config::{ListConfig, Listing, OutputFormat};
mod printer;
use printer::print_listings;

#[cfg(all(
    feature = "mimalloc",
    any(target_os = "linux", target_os = "macos", target_os = "android")
))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

#[derive(Parser)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "Print one `<inode>\\t<path>` line per entry of each directory (no recursion)"
)]
///generate our arguments and parse them.
pub struct Args {
    #[arg(
        value_name = "PATH",
        help = "Directories to list (defaults to the current directory)",
        value_hint = ValueHint::DirPath
    )]
    paths: Vec<OsString>,

    #[arg(short = 'a', long = "all", help = "Include the '.' and '..' records")]
    all: bool,

    #[arg(
        short = 'd',
        long = "debug-repr",
        help = "Print the debug representation of each entry instead of find lines"
    )]
    debug_repr: bool,

    #[arg(
        short = '0',
        long = "print0",
        help = "Terminate records with NUL instead of newline (useful for xargs -0)"
    )]
    print0: bool,

    #[arg(
        short = 'j',
        long = "threads",
        default_value_t = default_threads(),
        help = "Number of worker threads, defaults to available threads"
    )]
    threads: usize,

    #[arg(
        long = "generate",
        action = ArgAction::Set,
        value_parser = value_parser!(Shell),
        help = "Generate shell completions"
    )]
    generate: Option<Shell>,
}

impl From<&Args> for ListConfig {
    fn from(args: &Args) -> Self {
        Self {
            include_dots: args.all,
            format: if args.debug_repr {
                OutputFormat::DebugRepr
            } else {
                OutputFormat::FindLine
            },
            terminator: if args.print0 { b'\0' } else { b'\n' },
            threads: args.threads.max(1),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(generator) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_owned();
        generate(generator, &mut cmd, name, &mut stdout());
        return ExitCode::SUCCESS;
    }

    let config = ListConfig::from(&args);
    debug_print!(&config);

    // `None` lists the current directory without naming it
    let roots: Vec<Option<PathBuf>> = if args.paths.is_empty() {
        vec![None]
    } else {
        args.paths.into_iter().map(|p| Some(PathBuf::from(p))).collect()
    };
    let workers = config.threads.min(roots.len());

    let (job_sender, job_receiver) = unbounded::<Option<PathBuf>>();
    let (listing_sender, listing_receiver) = unbounded::<Listing>();
    for root in roots {
        // the receiver is alive until the workers finish, this cannot fail
        let _ = job_sender.send(root);
    }
    drop(job_sender);

    let config = &config;
    let printed = std::thread::scope(move |scope| {
        for _ in 0..workers {
            let jobs = job_receiver.clone();
            let listings = listing_sender.clone();
            scope.spawn(move || {
                // every Directory/DirectoryIter lives and dies on this thread
                for root in jobs {
                    if listings.send(config.list(root.as_ref())).is_err() {
                        break; // printer gave up (eg broken pipe)
                    }
                }
            });
        }
        drop(listing_sender);
        let printed = print_listings(&listing_receiver);
        // unblocks the workers if printing stopped early
        drop(listing_receiver);
        printed
    });

    match printed {
        Ok(summary) if summary.failures == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pfind: failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}
