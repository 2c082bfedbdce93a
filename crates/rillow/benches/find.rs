use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use rillow::from_xml_str;

const SEARCH_RESULTS: &str = include_str!("../tests/fixtures/search_results.xml");
const RATE_SUMMARY: &str = include_str!("../tests/fixtures/rate_summary.xml");

fn bench_parse(c: &mut Criterion) {
    c.bench_function("rillow_parse_search_results", |b| {
        b.iter(|| from_xml_str(black_box(SEARCH_RESULTS)))
    });
    c.bench_function("rillow_parse_rate_summary", |b| {
        b.iter(|| from_xml_str(black_box(RATE_SUMMARY)))
    });
}

fn bench_find(c: &mut Criterion) {
    let Ok(doc) = from_xml_str(SEARCH_RESULTS) else {
        return;
    };
    c.bench_function("rillow_find_present", |b| {
        b.iter(|| doc.find_attribute(black_box("zindexOneYearChange")).is_some())
    });
    c.bench_function("rillow_find_absent", |b| {
        b.iter(|| doc.find_attribute(black_box("missing")).is_none())
    });
}

criterion_group!(benches, bench_parse, bench_find);
criterion_main!(benches);
