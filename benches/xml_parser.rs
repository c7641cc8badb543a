use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gmmio::prelude::*;
use gmmio::xml::{ElementHandler, EventParser, TagPath, Violation};

/// XML for a diagonal mixture of `count` distributions of size `vect_size`
fn generate_mixture_xml(vect_size: usize, count: usize) -> Vec<u8> {
    let components = (0..count).map(|k| {
        let mut d = DistribGd::new(vect_size);
        for i in 0..vect_size {
            d.set_mean(i, (k * vect_size + i) as f64 * 0.01).unwrap();
            d.set_cov_inv(i, None, 1.0 + i as f64 * 0.5).unwrap();
        }
        (d, 1.0 / count as f64)
    });
    let mixture: Mixture = MixtureOf::from_components("world", vect_size, components)
        .unwrap()
        .into();
    MixtureFileWriter::to_path("world.xml", &Config::default())
        .write_to(&mixture, Vec::new())
        .unwrap()
}

#[derive(Default)]
struct Counter {
    elements: usize,
}

impl ElementHandler for Counter {
    fn open_element(&mut self, _path: &TagPath) -> Result<(), Violation> {
        self.elements += 1;
        Ok(())
    }

    fn close_element(&mut self, _path: &TagPath, _value: &str) -> Result<(), Violation> {
        Ok(())
    }
}

fn bench_event_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("xml_event_parser");

    for count in [64, 256, 1024] {
        let xml = generate_mixture_xml(39, count);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &xml, |b, xml| {
            b.iter(|| {
                let mut counter = Counter::default();
                EventParser::new(xml.as_slice()).parse(&mut counter).unwrap();
                black_box(counter.elements);
            });
        });
    }

    group.finish();
}

fn bench_mixture_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixture_reader");
    let config = Config::default();

    for count in [64, 256, 1024] {
        let source = MemorySource::new("world.xml", generate_mixture_xml(39, count));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
            b.iter(|| {
                let mixture = MixtureFileReader::from_source(source.clone(), &config)
                    .read_mixture()
                    .unwrap();
                black_box(mixture.distrib_count());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_event_parser, bench_mixture_reader);
criterion_main!(benches);
