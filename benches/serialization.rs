use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mguard_cfg::from_str;

/// Builds a document with `connections` VPN-style table rows.
fn synthetic_document(connections: usize) -> String {
    let mut text = String::from("#version 8.1.0.default\n\n");
    text.push_str("HOSTNAME = \"bench\"\n");
    text.push_str("VPN_CONNECTION = {\n  uuid = \"11fe\"\n");
    for i in 0..connections {
        text.push_str(&format!(
            concat!(
                "  {{\n",
                "    {{ rid = \"conn-{i}\" }}\n",
                "    NAME = \"connection {i}\"\n",
                "    VPN_START = \"started\"\n",
                "    TUNNEL = {{\n",
                "      {{\n",
                "        LOCAL = \"10.{i}.0.0/24\"\n",
                "        REMOTE = \"192.168.{i}.0/24\"\n",
                "      }}\n",
                "    }}\n",
                "  }}\n",
            ),
            i = i % 256
        ));
    }
    text.push_str("}\n");
    text
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [1usize, 16, 128] {
        let text = synthetic_document(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    for size in [1usize, 16, 128] {
        let doc = from_str(&synthetic_document(size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| black_box(doc.to_string()));
        });
    }
    group.finish();
}

fn benchmark_merge(c: &mut Criterion) {
    let base = from_str(&synthetic_document(64)).unwrap();
    let overlay = from_str(&synthetic_document(64)).unwrap();
    c.bench_function("merge/64-rows", |b| {
        b.iter(|| base.merge(black_box(&overlay)).unwrap());
    });
}

criterion_group!(benches, benchmark_parse, benchmark_serialize, benchmark_merge);
criterion_main!(benches);
