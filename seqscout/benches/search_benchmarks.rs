use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seqscout::{find, MatchMode, SearchConfig};

fn create_sequences(sequence_count: usize, len: usize) -> Vec<Vec<Option<String>>> {
    (0..sequence_count)
        .map(|s| {
            (0..len)
                .map(|e| match e % 5 {
                    0 => Some(format!("core.io.{}.{}", s, e)),
                    1 => Some(format!("net.http.{}", e)),
                    2 => Some(format!("HTTP-{}-client", e)),
                    3 => None,
                    _ => Some(format!("fs{}io", e)),
                })
                .collect()
        })
        .collect()
}

fn items(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

fn bench_modes(c: &mut Criterion) {
    let sequences = create_sequences(4, 2_000);
    let needles = items(&["core", "http", "io", "client"]);

    let mut group = c.benchmark_group("Match Modes");
    for mode in MatchMode::ALL {
        if mode == MatchMode::Regex {
            continue;
        }
        let config = SearchConfig {
            mode,
            word_separator: Some(".".to_string()),
            ..SearchConfig::default()
        };
        group.bench_function(mode.as_str(), |b| {
            b.iter(|| black_box(find(&needles, &sequences, &config).unwrap()));
        });
    }
    group.finish();
}

fn bench_regex(c: &mut Criterion) {
    let sequences = create_sequences(4, 2_000);
    let patterns = vec![r"^core\.io\.\d+", r"http", r"-\d+-client$", r"^fs\d+io$"];

    let mut group = c.benchmark_group("Regex");
    for (i, pattern) in patterns.iter().enumerate() {
        let config = SearchConfig {
            mode: MatchMode::Regex,
            case_insensitive: true,
            ..SearchConfig::default()
        };
        let needles = items(&[*pattern]);
        group.bench_function(format!("pattern_{}", i), |b| {
            b.iter(|| black_box(find(&needles, &sequences, &config).unwrap()));
        });
    }
    group.finish();
}

fn bench_sequence_scaling(c: &mut Criterion) {
    let needles = items(&["http", "io"]);
    let config = SearchConfig {
        mode: MatchMode::PrefixInfixSuffix,
        case_insensitive: true,
        unique: true,
        ..SearchConfig::default()
    };

    let mut group = c.benchmark_group("Sequence Scaling");
    for len in [10, 100, 1_000, 10_000] {
        let sequences = create_sequences(2, len);
        group.bench_function(format!("elements_{}", len), |b| {
            b.iter(|| black_box(find(&needles, &sequences, &config).unwrap()));
        });
    }
    group.finish();
}

fn bench_budgets(c: &mut Criterion) {
    let sequences = create_sequences(8, 5_000);
    let needles = items(&["io", "http"]);

    let mut group = c.benchmark_group("Budgets");
    for (name, max_results, max_comparisons) in [
        ("unbounded", 0, 0),
        ("first_10_results", 10, 0),
        ("both_items_once", -2, 0),
        ("1000_comparisons", 0, 1_000),
    ] {
        let config = SearchConfig {
            mode: MatchMode::Infix,
            max_results,
            max_comparisons,
            ..SearchConfig::default()
        };
        group.bench_function(name, |b| {
            b.iter(|| black_box(find(&needles, &sequences, &config).unwrap()));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_modes, bench_regex, bench_sequence_scaling, bench_budgets
}

criterion_main!(benches);
