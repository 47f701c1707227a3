use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kensa_core::se::Constraint;
use kensa_core::{Analyzer, ParsedFile};

const SMALL_MODULE: &str = r#"
var cache = null;

function lookup(key) {
    if (cache == null) {
        cache = {};
    }
    if (typeof key !== "string") {
        return null;
    }
    return cache[key];
}

function classify(items) {
    var result = [];
    if (!Array.isArray(items)) {
        return result;
    }
    for (var i = 0; i < items.length; i++) {
        var item = items[i];
        if (item && item.kind === "node") {
            result.push(item);
        }
    }
    result.sort();
    return result;
}
"#;

fn bench_analysis(c: &mut Criterion) {
    c.bench_function("parse_module", |b| {
        b.iter(|| ParsedFile::from_source("bench.js", black_box(SMALL_MODULE)))
    });

    let file = ParsedFile::from_source("bench.js", SMALL_MODULE);
    let analyzer = Analyzer::new();
    c.bench_function("symbolic_execution", |b| {
        b.iter(|| analyzer.analyze(black_box(&file)))
    });
}

fn bench_constraints(c: &mut Criterion) {
    c.bench_function("constraint_lattice_ops", |b| {
        b.iter(|| {
            let mut accumulator = Constraint::NO_POSSIBLE_VALUE;
            for constraint in [
                Constraint::TRUTHY,
                Constraint::NULL_OR_UNDEFINED,
                Constraint::ANY_NUMBER,
                Constraint::OBJECT,
            ] {
                accumulator = accumulator.or(black_box(constraint));
                black_box(accumulator.not());
                black_box(accumulator.is_stricter_or_equal_to(Constraint::ANY_VALUE));
            }
            accumulator
        })
    });
}

criterion_group!(benches, bench_analysis, bench_constraints);
criterion_main!(benches);
