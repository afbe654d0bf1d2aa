//! Encoder: [`Record`] to data block bytes

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use super::cursor::Slot;
use super::metrics::{Direction, Metrics};
use super::size::{Element, FieldLayout, Layout, Slots};
use super::{CpuModel, DateTimeRepr, Error, Record, RecordShape, Result, StringEncoding, Value};
use crate::types::{
    ValueError, bit, date_time, date_time_long, dint, dword, int, lint, lreal, lword, real,
    string, timespan, word, wstring,
};

/// Encode `record` as an instance of `shape` laid out for `cpu`.
///
/// The returned buffer is exactly [`size_of`](super::size_of) bytes long.
pub fn encode(record: &Record, shape: &RecordShape, cpu: CpuModel) -> Result<Bytes> {
    Layout::compute(shape, cpu)?.encode(record)
}

impl Layout {
    /// Encode `record` into a fresh zeroed buffer of [`Layout::size`] bytes.
    ///
    /// Fields are matched by position and name. Any mismatch fails the whole
    /// call; no partially written buffer escapes.
    pub fn encode(&self, record: &Record) -> Result<Bytes> {
        let mut buffer = BytesMut::zeroed(self.size);
        match self.encode_fields(record, &mut buffer) {
            Ok(()) => {
                Metrics::record_bytes(Direction::Encoded, buffer.len());
                trace!(record = %self.record, size = self.size, "encoded record");
                Ok(buffer.freeze())
            }
            Err(err) => {
                Metrics::record_error();
                debug!(record = %self.record, error = %err, "encode failed");
                Err(err)
            }
        }
    }

    /// `buffer` spans exactly this record; nested records get a sub-slice.
    fn encode_fields(&self, record: &Record, buffer: &mut [u8]) -> Result<()> {
        if record.len() > self.fields.len() {
            let (extra, _) = &record.fields()[self.fields.len()];
            return Err(self.mismatch(extra, "no field", "an extra field"));
        }

        for (index, field) in self.fields.iter().enumerate() {
            let value = match record.fields().get(index) {
                Some((name, value)) if *name == field.name => value,
                Some((name, _)) => {
                    return Err(self.mismatch(
                        &field.name,
                        format!("field `{}`", field.name),
                        format!("field `{name}`"),
                    ));
                }
                None => return Err(self.mismatch(&field.name, "a value", "nothing")),
            };

            match (&field.slots, value) {
                (Slots::One(slot), value) => self.write(field, *slot, value, buffer)?,
                (Slots::Many { count, .. }, Value::Array(items)) => {
                    if items.len() != *count {
                        return Err(self.mismatch(
                            &field.name,
                            format!("array of {count}"),
                            format!("array of {}", items.len()),
                        ));
                    }
                    for (slot, item) in field.slots.iter().zip(items) {
                        self.write(field, slot, item, buffer)?;
                    }
                }
                (Slots::Many { count, .. }, other) => {
                    return Err(self.mismatch(
                        &field.name,
                        format!("array of {count}"),
                        other.kind_name(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn write(
        &self,
        field: &FieldLayout,
        slot: Slot,
        value: &Value,
        buffer: &mut [u8],
    ) -> Result<()> {
        let target = match slot {
            Slot::Bit { byte, bit: index } => {
                let Value::Bool(flag) = value else {
                    return Err(self.wrong_type(field, value));
                };
                bit::set(&mut buffer[byte], index, *flag);
                return Ok(());
            }
            Slot::Bytes { offset, len } => &mut buffer[offset..offset + len],
        };

        let invalid = |source: ValueError| Error::InvalidValue {
            record: self.record.clone(),
            field: field.name.clone(),
            source,
        };

        match (&field.element, value) {
            (Element::Byte, Value::Byte(v)) => target[0] = *v,
            (Element::Int16, Value::Int16(v)) => target.copy_from_slice(&int::to_bytes(*v)),
            (Element::UInt16, Value::UInt16(v)) => target.copy_from_slice(&word::to_bytes(*v)),
            (Element::Int32, Value::Int32(v)) => target.copy_from_slice(&dint::to_bytes(*v)),
            (Element::UInt32, Value::UInt32(v)) => target.copy_from_slice(&dword::to_bytes(*v)),
            (Element::Int64, Value::Int64(v)) => target.copy_from_slice(&lint::to_bytes(*v)),
            (Element::UInt64, Value::UInt64(v)) => target.copy_from_slice(&lword::to_bytes(*v)),
            (Element::Float32, Value::Float32(v)) => target.copy_from_slice(&real::to_bytes(*v)),
            (Element::Float64, Value::Float64(v)) => target.copy_from_slice(&lreal::to_bytes(*v)),
            (Element::DateTime(DateTimeRepr::DateAndTime), Value::DateTime(v)) => {
                target.copy_from_slice(&date_time::to_bytes(v).map_err(invalid)?);
            }
            (Element::DateTime(DateTimeRepr::DateTimeLong), Value::DateTime(v)) => {
                target.copy_from_slice(&date_time_long::to_bytes(v).map_err(invalid)?);
            }
            (Element::TimeSpan, Value::TimeSpan(v)) => {
                target.copy_from_slice(&timespan::to_bytes(v).map_err(invalid)?);
            }
            (
                Element::String {
                    encoding: StringEncoding::S7String,
                    capacity,
                },
                Value::String(v),
            ) => target.copy_from_slice(&string::to_bytes(v, *capacity).map_err(invalid)?),
            (
                Element::String {
                    encoding: StringEncoding::S7WString,
                    capacity,
                },
                Value::String(v),
            ) => target.copy_from_slice(&wstring::to_bytes(v, *capacity).map_err(invalid)?),
            (Element::Record(nested), Value::Record(inner)) => {
                nested.encode_fields(inner, target)?;
            }
            (_, other) => return Err(self.wrong_type(field, other)),
        }
        Ok(())
    }

    fn wrong_type(&self, field: &FieldLayout, value: &Value) -> Error {
        self.mismatch(&field.name, field.element.name(), value.kind_name())
    }

    fn mismatch(
        &self,
        field: &str,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Error {
        Error::ShapeMismatch {
            record: self.record.clone(),
            field: field.to_owned(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::layout::{FieldType, decode, size_of};

    #[test]
    fn test_bits_share_a_byte() {
        let shape = RecordShape::builder("R")
            .bool("a")
            .bool("b")
            .bool("c")
            .int16("n")
            .build()
            .unwrap();
        let record = Record::builder("R")
            .field("a", true)
            .field("b", false)
            .field("c", true)
            .field("n", 42i16)
            .build();
        let bytes = encode(&record, &shape, CpuModel::S71500).unwrap();
        assert_eq!(bytes.as_ref(), [0b0000_0101, 0x00, 0x00, 0x2A]);
    }

    #[test]
    fn test_roundtrip_mixed_record() {
        let inner = Arc::new(
            RecordShape::builder("Axis")
                .float32("position")
                .bool("homed")
                .build()
                .unwrap(),
        );
        let shape = RecordShape::builder("Machine")
            .bool("enabled")
            .byte("mode")
            .uint32("cycles")
            .date_time("started")
            .time_span("uptime")
            .string("label", StringEncoding::S7String, 8)
            .string("note", StringEncoding::S7WString, 4)
            .array("axes", FieldType::Record(inner), 2)
            .int64("total")
            .build()
            .unwrap();

        let axis = |position: f32, homed: bool| {
            Record::builder("Axis")
                .field("position", position)
                .field("homed", homed)
                .build()
        };
        let started = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_milli_opt(8, 30, 0, 250)
            .unwrap();
        let record = Record::builder("Machine")
            .field("enabled", true)
            .field("mode", 3u8)
            .field("cycles", 123_456u32)
            .field("started", started)
            .field("uptime", TimeDelta::milliseconds(90_000))
            .field("label", "press-1")
            .field("note", "ok")
            .field("axes", vec![axis(1.5, true), axis(-2.25, false)])
            .field("total", -9_000_000_000i64)
            .build();

        for cpu in [CpuModel::S7300, CpuModel::S71500] {
            let bytes = encode(&record, &shape, cpu).unwrap();
            assert_eq!(bytes.len(), size_of(&shape, cpu).unwrap());
            assert_eq!(decode(&shape, &bytes, cpu).unwrap(), record);
        }
    }

    #[test]
    fn test_array_length_mismatch() {
        let shape = RecordShape::builder("R")
            .array("values", FieldType::Int16, 3)
            .build()
            .unwrap();
        let record = Record::builder("R").field("values", vec![1i16, 2]).build();
        let err = encode(&record, &shape, CpuModel::S71500).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                record: "R".into(),
                field: "values".into(),
                expected: "array of 3".into(),
                found: "array of 2".into(),
            }
        );
    }

    #[test]
    fn test_wrong_type_and_missing_field() {
        let shape = RecordShape::builder("R")
            .int16("a")
            .int16("b")
            .build()
            .unwrap();

        let wrong = Record::builder("R")
            .field("a", 1u16)
            .field("b", 2i16)
            .build();
        assert!(matches!(
            encode(&wrong, &shape, CpuModel::S71500),
            Err(Error::ShapeMismatch { ref field, .. }) if field == "a"
        ));

        let missing = Record::builder("R").field("a", 1i16).build();
        assert!(matches!(
            encode(&missing, &shape, CpuModel::S71500),
            Err(Error::ShapeMismatch { ref field, .. }) if field == "b"
        ));
    }

    #[test]
    fn test_string_over_capacity() {
        let shape = RecordShape::builder("Label")
            .string("text", StringEncoding::S7String, 3)
            .build()
            .unwrap();
        let record = Record::builder("Label").field("text", "toolong").build();
        assert!(matches!(
            encode(&record, &shape, CpuModel::S71500),
            Err(Error::InvalidValue {
                source: ValueError::StringTooLong { len: 7, capacity: 3 },
                ..
            })
        ));
    }
}
