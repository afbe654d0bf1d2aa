//! Decoder: data block bytes to [`Record`]

use tracing::{debug, trace};

use super::cursor::Slot;
use super::metrics::{Direction, Metrics};
use super::size::{Element, FieldLayout, Layout, Slots};
use super::{
    CpuModel, DateTimeRepr, Error, Record, RecordBuilder, RecordShape, Result, StringEncoding,
    Value,
};
use crate::types::{
    ValueError, bit, date_time, date_time_long, dint, dword, int, lint, lreal, lword, real,
    string, timespan, word, wstring,
};

/// Decode `buffer` as an instance of `shape` laid out for `cpu`.
///
/// The buffer must be exactly [`size_of`](super::size_of) bytes long.
pub fn decode(shape: &RecordShape, buffer: &[u8], cpu: CpuModel) -> Result<Record> {
    Layout::compute(shape, cpu)?.decode(buffer)
}

impl Layout {
    /// Decode `buffer`, which must be exactly [`Layout::size`] bytes long.
    ///
    /// Either the whole record is returned or an error; nothing partial.
    pub fn decode(&self, buffer: &[u8]) -> Result<Record> {
        if buffer.len() != self.size {
            Metrics::record_error();
            debug!(
                record = %self.record,
                expected = self.size,
                got = buffer.len(),
                "decode size mismatch"
            );
            return Err(Error::SizeMismatch {
                record: self.record.clone(),
                expected: self.size,
                got: buffer.len(),
            });
        }

        match self.decode_fields(buffer) {
            Ok(record) => {
                Metrics::record_bytes(Direction::Decoded, buffer.len());
                trace!(record = %self.record, size = self.size, "decoded record");
                Ok(record)
            }
            Err(err) => {
                Metrics::record_error();
                debug!(record = %self.record, error = %err, "decode failed");
                Err(err)
            }
        }
    }

    /// `buffer` spans exactly this record; nested records get a sub-slice.
    fn decode_fields(&self, buffer: &[u8]) -> Result<Record> {
        let mut builder = RecordBuilder::with_capacity(&self.record, self.fields.len());
        for field in &self.fields {
            let value = match field.slots {
                Slots::One(slot) => self.read(field, slot, buffer)?,
                Slots::Many { .. } => Value::Array(
                    field
                        .slots
                        .iter()
                        .map(|slot| self.read(field, slot, buffer))
                        .collect::<Result<_>>()?,
                ),
            };
            builder.push(field.name.as_str(), value);
        }
        Ok(builder.build())
    }

    fn read(&self, field: &FieldLayout, slot: Slot, buffer: &[u8]) -> Result<Value> {
        let bytes = match slot {
            Slot::Bit { byte, bit: index } => {
                return Ok(Value::Bool(bit::get(buffer[byte], index)));
            }
            Slot::Bytes { offset, len } => &buffer[offset..offset + len],
        };

        let scalar = match &field.element {
            Element::Bool => unreachable!("booleans always occupy a bit slot"),
            Element::Byte => Ok(Value::Byte(bytes[0])),
            Element::Int16 => int::from_bytes(bytes).map(Value::Int16),
            Element::UInt16 => word::from_bytes(bytes).map(Value::UInt16),
            Element::Int32 => dint::from_bytes(bytes).map(Value::Int32),
            Element::UInt32 => dword::from_bytes(bytes).map(Value::UInt32),
            Element::Int64 => lint::from_bytes(bytes).map(Value::Int64),
            Element::UInt64 => lword::from_bytes(bytes).map(Value::UInt64),
            Element::Float32 => real::from_bytes(bytes).map(Value::Float32),
            Element::Float64 => lreal::from_bytes(bytes).map(Value::Float64),
            Element::DateTime(DateTimeRepr::DateAndTime) => {
                date_time::from_bytes(bytes).map(Value::DateTime)
            }
            Element::DateTime(DateTimeRepr::DateTimeLong) => {
                date_time_long::from_bytes(bytes).map(Value::DateTime)
            }
            Element::TimeSpan => timespan::from_bytes(bytes).map(Value::TimeSpan),
            Element::String {
                encoding: StringEncoding::S7String,
                ..
            } => string::from_bytes(bytes).map(Value::String),
            Element::String {
                encoding: StringEncoding::S7WString,
                ..
            } => wstring::from_bytes(bytes).map(Value::String),
            Element::Record(nested) => return nested.decode_fields(bytes).map(Value::Record),
        };
        scalar.map_err(|source: ValueError| Error::InvalidValue {
            record: self.record.clone(),
            field: field.name.clone(),
            source,
        })
    }
}
