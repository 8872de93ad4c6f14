//! Benchmarks for markdown rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tocmark_renderer::{Markdown, RenderOptions};

/// Generate markdown content with specified structure.
fn generate_markdown(headings: usize, paragraphs_per_section: usize) -> String {
    let mut md = String::with_capacity(headings * 50 + headings * paragraphs_per_section * 200);
    md.push_str("# Document Title\n\n[toc]\n\n");

    for i in 0..headings {
        md.push_str(&format!("## Section {i}\n\n"));
        for j in 0..paragraphs_per_section {
            md.push_str(&format!(
                "Paragraph {j} in section {i} with **bold** text and https://example.com/{i}/{j}.\n\n"
            ));
        }
        md.push_str("```rust\nfn main() {}\n```\n\n");
    }
    md
}

fn bench_render_simple(c: &mut Criterion) {
    let markdown = Markdown::new(RenderOptions::default());

    c.bench_function("render_simple_markdown", |b| {
        b.iter(|| markdown.render("# Hello\n\nSimple content."));
    });
}

fn bench_render_varying_sizes(c: &mut Criterion) {
    let markdown = Markdown::new(RenderOptions::default());
    let mut group = c.benchmark_group("render_by_size");

    for (headings, paragraphs) in [(5, 2), (20, 3), (50, 5)] {
        let source = generate_markdown(headings, paragraphs);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("markdown", format!("{headings}h_{paragraphs}p")),
            &source,
            |b, source| b.iter(|| markdown.render(source)),
        );
    }

    group.finish();
}

fn bench_linkify_overhead(c: &mut Criterion) {
    let source = generate_markdown(20, 3);
    let with = Markdown::new(RenderOptions::default());
    let without = Markdown::new(RenderOptions {
        linkify: false,
        ..RenderOptions::default()
    });

    let mut group = c.benchmark_group("linkify");
    group.bench_function("enabled", |b| b.iter(|| with.render(&source)));
    group.bench_function("disabled", |b| b.iter(|| without.render(&source)));
    group.finish();
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_varying_sizes,
    bench_linkify_overhead
);
criterion_main!(benches);
