use criterion::{criterion_group, Criterion};
use std::hint::black_box;

fn bench_encode(c: &mut Criterion) {
    for protocols in [1, 100] {
        let request = super::join_group(protocols);
        for version in super::VERSIONS {
            c.bench_function(
                &format!("{}/protocols={protocols} version={version}", module_path!()),
                |b| b.iter(|| black_box(request.encode(version).unwrap())),
            );
        }
    }
}

criterion_group!(benches, bench_encode);
