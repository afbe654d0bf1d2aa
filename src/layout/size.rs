//! Layout calculator
//!
//! A [`Layout`] fixes the slot of every field of a shape for one controller
//! model. Sizing, decoding and encoding all walk the same layout, so they
//! cannot disagree about where a field lives.

use std::sync::Arc;

use tracing::debug;

use super::cursor::{ByteCursor, Slot, align_even};
use super::metrics::Metrics;
use super::variant::{resolve_date_time, resolve_string};
use super::{
    CpuModel, DateTimeRepr, Error, FieldType, MAX_BLOCK_SIZE, RecordShape, Result,
    StringEncoding,
};
use crate::types::timespan;

/// Resolved element type: variant configuration applied, widths known
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Element {
    Bool,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    DateTime(DateTimeRepr),
    TimeSpan,
    String {
        encoding: StringEncoding,
        capacity: usize,
    },
    Record(Arc<Layout>),
}

impl Element {
    /// Width of one element in bits
    fn width_bits(&self) -> usize {
        let bytes = match self {
            Self::Bool => return 1,
            Self::Byte => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
            Self::DateTime(repr) => repr.size(),
            Self::TimeSpan => timespan::SIZE,
            Self::String { encoding, capacity } => encoding.reserved_size(*capacity),
            Self::Record(layout) => layout.size,
        };
        bytes * 8
    }

    /// Distance in bits between consecutive elements of a repeated field
    fn stride_bits(&self) -> usize {
        match self {
            Self::Bool | Self::Byte => self.width_bits(),
            _ => align_even(self.width_bits()),
        }
    }

    fn place(&self, cursor: &mut ByteCursor) -> Slot {
        match self {
            Self::Bool => cursor.bit(),
            Self::Byte => cursor.bytes(1),
            _ => cursor.aligned(self.width_bits() / 8),
        }
    }

    /// Slot of an element starting at `bit_offset`
    fn slot_at(&self, bit_offset: usize) -> Slot {
        match self {
            Self::Bool => Slot::at_bit(bit_offset),
            _ => Slot::Bytes {
                offset: bit_offset / 8,
                len: self.width_bits() / 8,
            },
        }
    }

    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::DateTime(_) => "date-time",
            Self::TimeSpan => "time-span",
            Self::String { .. } => "string",
            Self::Record(layout) => &layout.record,
        }
    }
}

/// Slots of one field
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slots {
    One(Slot),
    /// `count` elements `stride` bits apart, starting with `first`
    Many {
        first: Slot,
        stride: usize,
        count: usize,
    },
}

impl Slots {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many { count, .. } => *count,
        }
    }

    /// Slot of element `index`; `index` must be below [`Slots::len`].
    pub(crate) fn get(&self, index: usize) -> Slot {
        match *self {
            Self::One(slot) => slot,
            Self::Many {
                first: Slot::Bit { byte, bit },
                stride,
                ..
            } => Slot::at_bit(byte * 8 + usize::from(bit) + index * stride),
            Self::Many {
                first: Slot::Bytes { offset, len },
                stride,
                ..
            } => Slot::Bytes {
                offset: offset + index * stride / 8,
                len,
            },
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.len()).map(|index| self.get(index))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldLayout {
    pub(crate) name: String,
    pub(crate) element: Element,
    pub(crate) slots: Slots,
}

/// Computed placement of every field of a record shape for one controller
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) record: String,
    pub(crate) cpu: CpuModel,
    pub(crate) size: usize,
    pub(crate) fields: Vec<FieldLayout>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    Block,
    Nested,
}

impl Layout {
    /// Compute the layout of `shape` as a top-level data block on `cpu`.
    ///
    /// Fails with `ConfigurationMissing` or `InvalidVariant` before any
    /// buffer is involved.
    pub fn compute(shape: &RecordShape, cpu: CpuModel) -> Result<Self> {
        let result = Self::compute_scoped(shape, cpu, Scope::Block);
        match &result {
            Ok(layout) => {
                Metrics::record_layout();
                debug!(
                    record = %layout.record,
                    %cpu,
                    size = layout.size,
                    fields = layout.fields.len(),
                    "computed block layout"
                );
            }
            Err(err) => {
                Metrics::record_error();
                debug!(record = shape.name(), %cpu, error = %err, "layout failed");
            }
        }
        result
    }

    fn compute_scoped(shape: &RecordShape, cpu: CpuModel, scope: Scope) -> Result<Self> {
        let record = shape.name();
        let mut cursor = ByteCursor::new();
        let mut fields = Vec::with_capacity(shape.fields().len());

        for field in shape.fields() {
            let element = match field.ty() {
                FieldType::Bool => Element::Bool,
                FieldType::Byte => Element::Byte,
                FieldType::Int16 => Element::Int16,
                FieldType::UInt16 => Element::UInt16,
                FieldType::Int32 => Element::Int32,
                FieldType::UInt32 => Element::UInt32,
                FieldType::Int64 => Element::Int64,
                FieldType::UInt64 => Element::UInt64,
                FieldType::Float32 => Element::Float32,
                FieldType::Float64 => Element::Float64,
                FieldType::TimeSpan => Element::TimeSpan,
                FieldType::DateTime => Element::DateTime(resolve_date_time(
                    field.variant(),
                    cpu,
                    record,
                    field.name(),
                )?),
                FieldType::String => {
                    let (encoding, capacity) =
                        resolve_string(field.variant(), record, field.name())?;
                    Element::String { encoding, capacity }
                }
                FieldType::Record(nested) => {
                    Element::Record(Arc::new(Self::compute_scoped(nested, cpu, Scope::Nested)?))
                }
            };

            let too_large = || Error::BlockTooLarge {
                record: record.to_owned(),
                field: field.name().to_owned(),
                max: MAX_BLOCK_SIZE,
            };
            let slots = match field.repeat() {
                Some(count) => {
                    let stride = element.stride_bits();
                    let start = cursor
                        .run(count, element.width_bits(), stride, MAX_BLOCK_SIZE * 8)
                        .ok_or_else(too_large)?;
                    Slots::Many {
                        first: element.slot_at(start),
                        stride,
                        count,
                    }
                }
                None => {
                    let slot = element.place(&mut cursor);
                    if cursor.position() > MAX_BLOCK_SIZE * 8 {
                        return Err(too_large());
                    }
                    Slots::One(slot)
                }
            };

            fields.push(FieldLayout {
                name: field.name().to_owned(),
                element,
                slots,
            });
        }

        let size = match scope {
            Scope::Block => cursor.finish_block(),
            Scope::Nested => cursor.finish_nested(),
        };
        Ok(Self {
            record: record.to_owned(),
            cpu,
            size,
            fields,
        })
    }

    /// Total size in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Record type name
    #[must_use]
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Controller model the layout was computed for
    #[must_use]
    pub fn cpu(&self) -> CpuModel {
        self.cpu
    }

    /// Byte offset of top-level field `name` (its first element if repeated)
    #[must_use]
    pub fn field_offset(&self, name: &str) -> Option<usize> {
        let field = self.fields.iter().find(|f| f.name == name)?;
        field.slots.iter().next().map(|slot| slot.offset())
    }

    /// Slot of top-level field `name`, or of each element if repeated
    #[must_use]
    pub fn field_slots(&self, name: &str) -> Option<Vec<Slot>> {
        let field = self.fields.iter().find(|f| f.name == name)?;
        Some(field.slots.iter().collect())
    }
}

/// Number of bytes `shape` occupies in a data block of `cpu`.
pub fn size_of(shape: &RecordShape, cpu: CpuModel) -> Result<usize> {
    Layout::compute(shape, cpu).map(|layout| layout.size)
}
