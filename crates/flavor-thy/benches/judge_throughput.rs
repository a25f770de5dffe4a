use flavor_rules::pdg_2024;
use flavor_thy::serde::to_canonical_json_bytes;
use flavor_thy::{assess, compare_table, judge, Policy};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_judge(c: &mut Criterion) {
    let table = pdg_2024().expect("embedded table");
    let policy = Policy::default();
    let comparisons = compare_table(table, &policy).expect("comparisons");

    c.bench_function("judge_pdg_2024", |b| {
        b.iter(|| {
            let verdict = judge(black_box(&comparisons), &policy).expect("verdict");
            black_box(verdict.fail_count);
        })
    });

    c.bench_function("assess_and_encode", |b| {
        b.iter(|| {
            let report = assess(black_box(table), &policy).expect("report");
            let bytes = to_canonical_json_bytes(&report).expect("encode");
            black_box(bytes.len());
        })
    });
}

criterion_group!(benches, bench_judge);
criterion_main!(benches);
