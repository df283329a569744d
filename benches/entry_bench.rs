use atdir::{Directory, DirectoryIter, Entry};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::fs;
use std::hint::black_box;
use std::path::{Path, PathBuf};

// builds a flat directory with `count` files of mixed name lengths
fn make_tree(count: usize) -> PathBuf {
    let root = std::env::temp_dir().join(format!("atdir_bench_{count}_{}", rand::random::<u64>()));
    fs::create_dir_all(&root).unwrap();
    let base_names = [
        "a",
        "file",
        "document.txt",
        "file_with_medium_length_name",
        "very_long_filename_that_simulates_real_world_usage_patterns",
    ];
    for i in 0..count {
        let name = format!("{}{i}", base_names[i % base_names.len()]);
        if i % 10 == 0 {
            fs::create_dir(root.join(name)).unwrap();
        } else {
            fs::write(root.join(name), "").unwrap();
        }
    }
    root
}

fn collect_entries(root: &Path) -> Vec<Entry> {
    DirectoryIter::new(root)
        .unwrap()
        .map(Result::unwrap)
        .collect()
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");
    let mut roots = Vec::new();

    for count in [16, 256, 4096] {
        let root = make_tree(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("directory_iter", count), &root, |b, root| {
            b.iter(|| {
                let mut total = 0;
                for entry in Directory::new(black_box(root)).iterate().unwrap() {
                    total += black_box(entry.unwrap()).inode() & 1;
                }
                black_box(total)
            })
        });

        group.bench_with_input(BenchmarkId::new("std_read_dir", count), &root, |b, root| {
            b.iter(|| {
                let mut total = 0;
                for entry in fs::read_dir(black_box(root)).unwrap() {
                    use std::os::unix::fs::DirEntryExt as _;
                    total += black_box(entry.unwrap()).ino() & 1;
                }
                black_box(total)
            })
        });
        roots.push(root);
    }
    group.finish();

    for root in roots {
        let _ = fs::remove_dir_all(root);
    }
}

fn bench_rendering(c: &mut Criterion) {
    let root = make_tree(1024);
    let entries = collect_entries(&root);

    let mut group = c.benchmark_group("rendering");
    group.throughput(Throughput::Elements(entries.len() as u64));

    // find_line skips the cached views, compare against going through them
    group.bench_function("find_line", |b| {
        b.iter(|| {
            let mut bytes = 0;
            for entry in &entries {
                bytes += black_box(entry.find_line()).len();
            }
            black_box(bytes)
        })
    });

    group.bench_function("format_cached_views", |b| {
        b.iter(|| {
            let mut bytes = 0;
            for entry in &entries {
                let line = format!("{}\t{}\n", entry.inode(), entry.path().display());
                bytes += black_box(line).len();
            }
            black_box(bytes)
        })
    });

    group.bench_function("name_memoised", |b| {
        b.iter(|| {
            let mut bytes = 0;
            for entry in &entries {
                bytes += black_box(entry.name()).len();
            }
            black_box(bytes)
        })
    });

    group.finish();
    drop(entries);
    let _ = fs::remove_dir_all(root);
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(200)
        .warm_up_time(std::time::Duration::from_millis(500))
        .measurement_time(std::time::Duration::from_secs(3));
    targets = bench_iteration, bench_rendering
}
criterion_main!(benches);
