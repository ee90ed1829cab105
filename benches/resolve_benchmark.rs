//! Resolution hot-path benchmarks over a synthetic catalog.
//!
//! Tree scans call candidate matching once per extracted candidate and the
//! reconciliation loop ranks the whole catalog per keystroke, so both must stay
//! cheap at full catalog size (a few thousand records).
//!
//! # Benchmarks
//!
//! - `fuzzy_match_compact`: separator-less candidate resolved through the stripped index
//! - `extract_game_id_path`: full path extraction, match in the middle segment
//! - `rank_title_query`: two-word title query ranked over every record
//!
//! # Running
//!
//! ```bash
//! cargo bench --bench resolve_benchmark
//! ```

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use saveid_core::{CatalogIndex, CatalogRecord, DEFAULT_SEARCH_LIMIT, rank};

/// Catalog shaped like the real one: vendor prefixes, numeric ids and word titles.
fn setup_catalog(size: usize) -> CatalogIndex {
    let words = ["sonic", "racing", "arcadia", "tennis", "taxi", "quest", "legend"];
    let mut builder = CatalogIndex::builder();
    for i in 0..size {
        let id = match i % 3 {
            0 => format!("T-{:04}N", i),
            1 => format!("MK-{:05}", 51_000 + i),
            _ => format!("{:03}-{:04}", 600 + i % 100, i),
        };
        let title = format!(
            "{} {} {}",
            words[i % words.len()],
            words[(i / 7) % words.len()],
            i
        );
        builder.insert(CatalogRecord::new(id, title, "US"));
    }
    builder.build()
}

fn bench_fuzzy_match(c: &mut Criterion) {
    let index = setup_catalog(3000);
    c.bench_function("fuzzy_match_compact", |b| {
        b.iter(|| black_box(index.fuzzy_match(black_box("MK52498"))));
    });
}

fn bench_extract(c: &mut Criterion) {
    let index = setup_catalog(3000);
    c.bench_function("extract_game_id_path", |b| {
        b.iter(|| {
            black_box(index.extract_game_id(black_box("/memcards/card 04/T0300N racing/slot_b.vmu")))
        });
    });
}

fn bench_rank(c: &mut Criterion) {
    let index = setup_catalog(3000);
    c.bench_function("rank_title_query", |b| {
        b.iter(|| black_box(rank(&index, black_box("sonic racing"), DEFAULT_SEARCH_LIMIT)));
    });
}

criterion_group!(benches, bench_fuzzy_match, bench_extract, bench_rank);
criterion_main!(benches);
