use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use s7_layout::{
    CpuModel, DateTimeRepr, FieldType, Layout, Record, RecordShape, ShapeBuilder, StringEncoding,
    Value,
};

/// One field of a generated shape together with a value that fits it
#[derive(Debug, Clone)]
enum Sample {
    Bool(bool),
    Byte(u8),
    Int16(i16),
    UInt32(u32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    DateAndTime(NaiveDateTime),
    DateTimeLong(NaiveDateTime),
    TimeSpan(i32),
    Text(String, usize),
    WideText(String, usize),
    Bits(Vec<bool>),
    Words(Vec<u16>),
    Pair(bool, u8),
}

impl Sample {
    fn declare(&self, shape: ShapeBuilder, name: String) -> ShapeBuilder {
        match self {
            Self::Bool(_) => shape.bool(name),
            Self::Byte(_) => shape.byte(name),
            Self::Int16(_) => shape.int16(name),
            Self::UInt32(_) => shape.uint32(name),
            Self::Int64(_) => shape.int64(name),
            Self::Float32(_) => shape.float32(name),
            Self::Float64(_) => shape.float64(name),
            Self::DateAndTime(_) => shape.date_time_as(name, DateTimeRepr::DateAndTime),
            Self::DateTimeLong(_) => shape.date_time_as(name, DateTimeRepr::DateTimeLong),
            Self::TimeSpan(_) => shape.time_span(name),
            Self::Text(_, capacity) => shape.string(name, StringEncoding::S7String, *capacity),
            Self::WideText(_, capacity) => {
                shape.string(name, StringEncoding::S7WString, *capacity)
            }
            Self::Bits(bits) => shape.array(name, FieldType::Bool, bits.len()),
            Self::Words(words) => shape.array(name, FieldType::UInt16, words.len()),
            Self::Pair(..) => shape.record(name, pair_shape()),
        }
    }

    fn value(&self) -> Value {
        match self {
            Self::Bool(v) => (*v).into(),
            Self::Byte(v) => (*v).into(),
            Self::Int16(v) => (*v).into(),
            Self::UInt32(v) => (*v).into(),
            Self::Int64(v) => (*v).into(),
            Self::Float32(v) => (*v).into(),
            Self::Float64(v) => (*v).into(),
            Self::DateAndTime(v) | Self::DateTimeLong(v) => (*v).into(),
            Self::TimeSpan(v) => TimeDelta::milliseconds(i64::from(*v)).into(),
            Self::Text(v, _) | Self::WideText(v, _) => v.clone().into(),
            Self::Bits(v) => v.clone().into(),
            Self::Words(v) => v.clone().into(),
            Self::Pair(flag, level) => Record::builder("Pair")
                .field("flag", *flag)
                .field("level", *level)
                .build()
                .into(),
        }
    }
}

fn pair_shape() -> Arc<RecordShape> {
    Arc::new(
        RecordShape::builder("Pair")
            .bool("flag")
            .byte("level")
            .build()
            .unwrap(),
    )
}

fn date_and_time() -> impl Strategy<Value = NaiveDateTime> {
    (1990i32..=2089, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60, 0u32..1000).prop_map(
        |(y, mo, d, h, mi, s, ms)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_milli_opt(h, mi, s, ms)
                .unwrap()
        },
    )
}

fn date_time_long() -> impl Strategy<Value = NaiveDateTime> {
    (1970i32..=2200, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000_000)
        .prop_map(|(y, mo, d, h, mi, s, ns)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_nano_opt(h, mi, s, ns)
                .unwrap()
        })
}

fn sample() -> impl Strategy<Value = Sample> {
    prop_oneof![
        any::<bool>().prop_map(Sample::Bool),
        any::<u8>().prop_map(Sample::Byte),
        any::<i16>().prop_map(Sample::Int16),
        any::<u32>().prop_map(Sample::UInt32),
        any::<i64>().prop_map(Sample::Int64),
        (-1.0e6f32..1.0e6).prop_map(Sample::Float32),
        (-1.0e12f64..1.0e12).prop_map(Sample::Float64),
        date_and_time().prop_map(Sample::DateAndTime),
        date_time_long().prop_map(Sample::DateTimeLong),
        any::<i32>().prop_map(Sample::TimeSpan),
        ("[ -~]{0,12}", 0usize..4).prop_map(|(s, spare)| {
            let capacity = s.len() + spare;
            Sample::Text(s, capacity)
        }),
        ("[a-zA-Zäöü€]{0,8}", 0usize..4).prop_map(|(s, spare)| {
            let capacity = s.encode_utf16().count() + spare;
            Sample::WideText(s, capacity)
        }),
        prop::collection::vec(any::<bool>(), 1..20).prop_map(Sample::Bits),
        prop::collection::vec(any::<u16>(), 1..5).prop_map(Sample::Words),
        (any::<bool>(), any::<u8>()).prop_map(|(flag, level)| Sample::Pair(flag, level)),
    ]
}

fn cpu() -> impl Strategy<Value = CpuModel> {
    prop::sample::select(CpuModel::ALL.to_vec())
}

fn build(samples: &[Sample]) -> (RecordShape, Record) {
    let mut shape = RecordShape::builder("Generated");
    let mut record = Record::builder("Generated");
    for (index, sample) in samples.iter().enumerate() {
        let name = format!("f{index}");
        shape = sample.declare(shape, name.clone());
        record.push(name, sample.value());
    }
    (shape.build().unwrap(), record.build())
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(
        samples in prop::collection::vec(sample(), 0..16),
        cpu in cpu(),
    ) {
        let (shape, record) = build(&samples);
        let bytes = s7_layout::encode(&record, &shape, cpu).unwrap();
        let decoded = s7_layout::decode(&shape, &bytes, cpu).unwrap();
        prop_assert_eq!(decoded, record);
    }

    #[test]
    fn prop_encoded_length_matches_size(
        samples in prop::collection::vec(sample(), 0..16),
        cpu in cpu(),
    ) {
        let (shape, record) = build(&samples);
        let size = s7_layout::size_of(&shape, cpu).unwrap();
        let bytes = s7_layout::encode(&record, &shape, cpu).unwrap();
        prop_assert_eq!(bytes.len(), size);
        prop_assert_eq!(size % 2, 0);
    }

    #[test]
    fn prop_wide_fields_start_even(
        samples in prop::collection::vec(sample(), 1..16),
        cpu in cpu(),
    ) {
        let (shape, _) = build(&samples);
        let layout = Layout::compute(&shape, cpu).unwrap();
        for (index, sample) in samples.iter().enumerate() {
            let offset = layout.field_offset(&format!("f{index}")).unwrap();
            match sample {
                Sample::Bool(_) | Sample::Byte(_) => {}
                _ => prop_assert_eq!(offset % 2, 0, "field f{} at {}", index, offset),
            }
        }
    }

    #[test]
    fn prop_wrong_buffer_length_is_rejected(
        samples in prop::collection::vec(sample(), 0..8),
        delta in 1usize..4,
        cpu in cpu(),
    ) {
        let (shape, _) = build(&samples);
        let size = s7_layout::size_of(&shape, cpu).unwrap();
        let buffer = vec![0u8; size + delta];
        let is_size_mismatch = matches!(
            s7_layout::decode(&shape, &buffer, cpu),
            Err(s7_layout::Error::SizeMismatch { .. })
        );
        prop_assert!(is_size_mismatch);
    }
}
