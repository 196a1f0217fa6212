use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lumen::{parse, Object};
use std::fmt::Write;

fn document(services: usize) -> String {
    let mut source = String::from("# generated\nregion = \"eu-west\"\n");

    for n in 0..services {
        let _ = writeln!(source, "services.s{n}.name = 'service-{n}'");
        let _ = writeln!(source, "services.s{n}.port = {}", 8000 + n);
        let _ = writeln!(source, "services.s{n}.weight = {}.5", n % 10);
        let _ = writeln!(source, "services.s{n}.region = region");
        let _ = writeln!(
            source,
            "services.s{n}.limits = {{ cpu = 0x{:X}, mem = -{n}, tags = [1, 2\n3] }}",
            n + 1
        );
    }

    source
}

fn parse_benchmark(c: &mut Criterion) {
    let sizes: [usize; 3] = [10, 100, 1000];
    let mut group = c.benchmark_group("Parser");

    group.sample_size(10);

    for size in sizes {
        let source = document(size);

        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, data| {
            b.iter(|| {
                let _ = parse(black_box(data), "bench", Object::new()).unwrap();
            })
        });
    }
}

criterion_group!(benches, parse_benchmark);
criterion_main!(benches);
