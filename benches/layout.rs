use std::hint::black_box;
use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use s7_layout::{CpuModel, FieldType, Layout, Record, RecordShape, StringEncoding};

fn machine_shape() -> RecordShape {
    let axis = Arc::new(
        RecordShape::builder("Axis")
            .bool("homed")
            .bool("moving")
            .float32("position")
            .float32("velocity")
            .build()
            .unwrap(),
    );
    RecordShape::builder("Machine")
        .bool("enabled")
        .byte("mode")
        .uint32("cycles")
        .date_time("started")
        .time_span("uptime")
        .string("label", StringEncoding::S7String, 32)
        .array("axes", FieldType::Record(axis), 8)
        .array("alarms", FieldType::Bool, 64)
        .array("counters", FieldType::Int32, 16)
        .build()
        .unwrap()
}

fn machine_record() -> Record {
    let axes: Vec<Record> = (0..8u8)
        .map(|i| {
            Record::builder("Axis")
                .field("homed", true)
                .field("moving", i % 2 == 0)
                .field("position", f32::from(i) * 10.5)
                .field("velocity", -f32::from(i))
                .build()
        })
        .collect();
    Record::builder("Machine")
        .field("enabled", true)
        .field("mode", 2u8)
        .field("cycles", 1_000_000u32)
        .field(
            "started",
            NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        )
        .field("uptime", TimeDelta::hours(12))
        .field("label", "line-7/cell-3")
        .field("axes", axes)
        .field("alarms", vec![false; 64])
        .field("counters", (0..16).collect::<Vec<i32>>())
        .build()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let shape = machine_shape();

    group.bench_function("compute_dtl", |b| {
        b.iter(|| black_box(Layout::compute(black_box(&shape), CpuModel::S71500).unwrap()));
    });
    group.bench_function("compute_dt", |b| {
        b.iter(|| black_box(Layout::compute(black_box(&shape), CpuModel::S7300).unwrap()));
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let shape = machine_shape();
    let layout = Layout::compute(&shape, CpuModel::S71500).unwrap();
    let record = machine_record();
    let bytes = layout.encode(&record).unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode_cached_layout", |b| {
        b.iter(|| black_box(layout.encode(black_box(&record)).unwrap()));
    });
    group.bench_function("decode_cached_layout", |b| {
        b.iter(|| black_box(layout.decode(black_box(&bytes)).unwrap()));
    });
    group.bench_function("encode_uncached", |b| {
        b.iter(|| {
            black_box(s7_layout::encode(black_box(&record), &shape, CpuModel::S71500).unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_layout, bench_codec);
criterion_main!(benches);
