//! Data block layout engine
//!
//! Maps record shapes onto the byte layout S7 controllers use for data
//! blocks: booleans pack into bits, bytes need a whole byte, everything
//! wider starts on an even byte, and a top-level block is always an even
//! number of bytes long.

mod block;
mod cpu;
mod cursor;
mod decode;
mod encode;
mod error;
mod metrics;
mod shape;
mod size;
mod value;
mod variant;

pub use block::{DataBlock, decode_block, encode_block, layout_of, shape_of, size_of_block};
pub use cpu::{CpuModel, UnknownCpuModel};
pub use cursor::{Slot, align_even};
pub use decode::decode;
pub use encode::encode;
pub use error::{Error, Result};
pub use metrics::{MetricsSnapshot, metrics_snapshot};
pub use shape::{Field, FieldType, RecordShape, ShapeBuilder};
pub use size::{Layout, size_of};
pub use value::{FromValue, Record, RecordBuilder, Value};
pub use variant::{DateTimeRepr, StringEncoding, UnknownVariant, VariantConfig};

/// Largest record a layout may describe, in bytes (16 MB)
pub const MAX_BLOCK_SIZE: usize = 16 * 1024 * 1024;
