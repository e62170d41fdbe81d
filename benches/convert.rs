//! Benchmarks for the body conversion pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use wpmd::{Converter, Dialect, markdownify};

/// A body shaped like a real exported post: prose paragraphs, inline
/// markup, a list left as HTML, and a couple of code blocks.
fn sample_body() -> String {
    let mut body = String::new();
    for i in 0..50 {
        body.push_str(&format!(
            "<p>Paragraph {i} with <strong>bold</strong>, <em>italics</em>, \
             and <a href=\"http://example.com/{i}\">a link</a>.</p>\n"
        ));
    }
    body.push_str("<ul><li>kept</li><li>as</li><li>html</li></ul>\n");
    body.push_str("<pre lang=\"python\">def handler(req):\n    return req.body\n</pre>\n");
    body.push_str("[sourcecode language=\"ruby\"]puts :done[/sourcecode]\n");
    body
}

fn bench_markdownify(c: &mut Criterion) {
    let body = sample_body();
    c.bench_function("markdownify", |b| {
        b.iter(|| markdownify(&body).unwrap());
    });
}

fn bench_dialects(c: &mut Criterion) {
    let body = sample_body();
    let mut group = c.benchmark_group("dialects");
    for (name, dialect) in [
        ("codehilite", Dialect::Codehilite),
        ("misaka", Dialect::Misaka),
        ("indented", Dialect::Indented),
    ] {
        let converter = Converter::new(dialect);
        group.bench_function(name, |b| {
            b.iter(|| converter.convert(&body).unwrap());
        });
    }
    group.finish();
}

fn bench_plain_text(c: &mut Criterion) {
    // the no-markup fast path
    let body = "just plain prose ".repeat(500);
    c.bench_function("markdownify_plain", |b| {
        b.iter(|| markdownify(&body).unwrap());
    });
}

criterion_group!(benches, bench_markdownify, bench_dialects, bench_plain_text);
criterion_main!(benches);
