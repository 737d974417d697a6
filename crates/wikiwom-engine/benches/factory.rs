use criterion::{Criterion, criterion_group, criterion_main};
use wikiwom_config::WikiConfig;
use wikiwom_engine::WomDocument;

fn generate_wikitext(sections: usize) -> String {
    let mut text = String::new();
    for i in 0..sections {
        text.push_str(&format!(
            "Section {i} has '''bold''', ''italic'' and a [[Page {i}|link]].\n\
             <div class=\"note\">Note <b>{i}</b> &amp; more<!-- c --></div>\n\
             ----\n\n"
        ));
        if i % 10 == 0 {
            text.push_str(&format!("[[Category:Topic {}]]\n", i / 10));
        }
    }
    text
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("factory");
    group.sample_size(10);

    let content = generate_wikitext(200);
    group.bench_function("parse_and_build", |b| {
        b.iter(|| {
            let doc = WomDocument::parse(
                std::hint::black_box(&content),
                WikiConfig::default(),
                "Bench",
            )
            .unwrap();
            std::hint::black_box(doc);
        });
    });

    let doc = WomDocument::parse(&content, WikiConfig::default(), "Bench").unwrap();
    group.bench_function("print", |b| {
        b.iter(|| std::hint::black_box(doc.to_wikitext().unwrap()));
    });

    group.bench_function("restyle_all_bold", |b| {
        b.iter(|| {
            let mut doc = doc.clone();
            for id in doc.elements_by_name("b").unwrap() {
                doc.set_attribute(id, "class", "strong").unwrap();
            }
            std::hint::black_box(doc.to_wikitext().unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
