//! Benchmarks for page extraction.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use smutbase::extract::{decode_html_entities, parse_model_page, parse_search_results};
use smutbase::model::Model;

const ID: &str = "b8c7264b-29e7-4091-bb73-3eac2fddb350";

fn detail_page() -> String {
    let tags: String = (0..20)
        .map(|i| format!(r#"<a href="/tag/tag-{i}/">tag-{i}</a>"#))
        .collect();
    format!(
        r#"<html><head>
        <meta property="og:image" content="/media/project/cover.jpg">
        <meta property="og:description" content="A carved oak chair &amp; table set">
        </head><body>
        <h1>Oak Chair</h1>
        <p>Support <a href="https://www.patreon.com/maker">Maker</a></p>
        <p><strong>Views</strong><br>12,345</p>
        <p><strong>Downloads</strong><br>678</p>
        <p><strong>Posted</strong><br>3 days ago</p>
        <p><strong>Category</strong><br><a href="/?category=1">Models</a></p>
        <p>Creative Commons Attribution 4.0</p>
        {tags}
        </body></html>"#
    )
}

fn listing_page() -> String {
    let cards: String = (0..60)
        .map(|i| {
            format!(
                r#"<a href="/project/{i:08x}-0000-4000-8000-000000000000/"><img src="/media/{i}.jpg"><h3>Model {i}</h3></a>
                <a href="/member/user{i}/">user{i}</a>"#
            )
        })
        .collect();
    let pages: String = (1..=20).map(|p| format!(r#"<a href="/?page={p}">{p}</a>"#)).collect();
    format!("<html><body>{cards}<nav>{pages}</nav></body></html>")
}

fn extract_benchmark(c: &mut Criterion) {
    let detail = detail_page();
    let listing = listing_page();

    c.bench_function("parse_model_page", |b| {
        b.iter(|| {
            let model = Model::from_id(ID).unwrap();
            black_box(parse_model_page(black_box(&detail), model).unwrap())
        })
    });

    c.bench_function("parse_search_results", |b| {
        b.iter(|| black_box(parse_search_results(black_box(&listing), 1).unwrap()))
    });

    c.bench_function("decode_html_entities", |b| {
        b.iter(|| black_box(decode_html_entities(black_box(&detail))))
    });
}

criterion_group!(benches, extract_benchmark);
criterion_main!(benches);
