use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recstream::record::{JsonRecordSerializer, RecordFormat};
use recstream::{make_serializer, FileFormat, SerializerOptions};
use serde_json::json;
use tempfile::TempDir;

fn bench_format_record(c: &mut Criterion) {
    let f = JsonRecordSerializer::new();
    let record = json!({"step": 1, "time": 0.02, "objects": [{"id": 1, "pos": [1.0, 2.0, 3.0]}]});
    let mut out = Vec::with_capacity(4096);

    c.bench_function("format_one_record", |b| b.iter(|| {
        out.clear();
        f.format(black_box(&record), true, &mut out).unwrap();
    }));
}

fn bench_write_file(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let records: Vec<_> = (0..1000)
        .map(|i| json!({"step": i, "time": i as f64 * 0.02, "speed": [i, i + 1, i + 2]}))
        .collect();

    for format in FileFormat::ALL {
        let path = dir.path().join(format!("bench.{}", format.extension()));
        c.bench_function(&format!("write_1000_records_{}", format.extension()), |b| {
            b.iter(|| {
                let mut out = make_serializer(format, SerializerOptions::default());
                out.open_file(path.to_str().unwrap());
                for (i, r) in records.iter().enumerate() {
                    out.serialize(black_box(r), i > 0).unwrap();
                }
                out.close_file().unwrap();
            })
        });
    }
}

criterion_group!(benches, bench_format_record, bench_write_file);
criterion_main!(benches);
