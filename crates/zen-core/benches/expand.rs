//! Expansion throughput for typical and heavily multiplied abbreviations

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use zen_core::{Engine, Profile, builder, render, tokenize};

const PAGE: &str =
    "div#page>(header>h1{Title}+nav>ul>li.item$*5>a[href=/p$]{Page $})+main>p*3^footer";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_page", |b| {
        b.iter(|| tokenize(black_box(PAGE)).unwrap());
    });
}

fn bench_render(c: &mut Criterion) {
    let tree = builder::parse(PAGE, builder::Limits::default()).unwrap();
    let profile = Profile::html();

    c.bench_function("render_page", |b| {
        b.iter(|| render(black_box(&tree), black_box(&profile)));
    });
}

fn bench_expand(c: &mut Criterion) {
    let engine = Engine::new();

    c.bench_function("expand_page", |b| {
        b.iter(|| engine.expand_abbreviation(black_box(PAGE), "html").unwrap());
    });

    c.bench_function("expand_table_1000", |b| {
        b.iter(|| {
            engine
                .expand_abbreviation(black_box("table>tr.r$$$*100>td.c$*9"), "xhtml")
                .unwrap()
        });
    });

    let line = format!("<body>{PAGE}");
    c.bench_function("expand_from_line", |b| {
        b.iter(|| engine.expand(black_box(&line), line.len(), "html").unwrap());
    });
}

criterion_group!(benches, bench_tokenize, bench_render, bench_expand);
criterion_main!(benches);
