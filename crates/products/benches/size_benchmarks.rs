use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use catalog_products::{canonicalize, validate_create, CreateProductInput, Patch};

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("size_canonicalize");
    group.throughput(Throughput::Elements(1));

    let inputs = [
        ("single", "M"),
        ("sorted", "L/M/S/XL/XXL"),
        ("unsorted_padded", " XXL / S // M/ L /XL "),
        ("blank", "    "),
    ];

    for (label, raw) in inputs.iter() {
        group.bench_with_input(BenchmarkId::new("canonicalize", label), raw, |b, &raw| {
            b.iter(|| black_box(canonicalize(Some(black_box(raw)))));
        });
    }

    group.bench_function("reject_duplicate", |b| {
        b.iter(|| black_box(canonicalize(Some(black_box("L/S/S")))).unwrap_err());
    });

    group.finish();
}

fn bench_validate_create(c: &mut Criterion) {
    c.bench_function("validate_create", |b| {
        b.iter(|| {
            let input = CreateProductInput {
                name: Patch::Value("Shirt".to_string()),
                code: Patch::Value("A1".to_string()),
                category: Patch::Value("tops".to_string()),
                unit_price: Patch::Value(19.99),
                inventory: Patch::Value(5),
                size: Patch::Value("S/M/L".to_string()),
                color: Patch::Absent,
            };
            black_box(validate_create(input).unwrap());
        });
    });
}

criterion_group!(benches, bench_canonicalize, bench_validate_create);
criterion_main!(benches);
