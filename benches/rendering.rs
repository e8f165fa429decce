//! Benchmarks for the render cycle.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gitmd::highlight::highlight_code_blocks;
use gitmd::preview::Preview;
use gitmd::render::{MarkdownRenderer, SAMPLE};

fn large_document() -> String {
    SAMPLE.repeat(50)
}

fn bench_render(c: &mut Criterion) {
    let renderer = MarkdownRenderer::default();
    let text = large_document();

    c.bench_function("render_sample", |b| {
        b.iter(|| renderer.render(black_box(SAMPLE)))
    });
    c.bench_function("render_large", |b| b.iter(|| renderer.render(black_box(&text))));
}

fn bench_highlight(c: &mut Criterion) {
    let renderer = MarkdownRenderer::default();
    let html = renderer.render(&large_document()).unwrap();

    c.bench_function("highlight_large", |b| {
        b.iter(|| {
            let mut preview = Preview::new();
            preview.install(black_box(html.clone()));
            highlight_code_blocks(&mut preview);
            preview
        })
    });
}

criterion_group!(benches, bench_render, bench_highlight);
criterion_main!(benches);
