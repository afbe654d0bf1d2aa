//! S7 data block layout engine
//!
//! Marshals structured records to and from the byte images Siemens S7
//! controllers keep in their data blocks. Field placement follows the
//! controller rules (bit-packed booleans, even-aligned words, even-sized
//! blocks) and the date/time and string encodings are chosen per field or
//! per controller model.
//!
//! # Quick Start
//!
//! ```rust
//! use s7_layout::{CpuModel, Record, RecordShape, StringEncoding};
//!
//! let shape = RecordShape::builder("Motor")
//!     .bool("running")
//!     .bool("fault")
//!     .int16("speed")
//!     .string("tag", StringEncoding::S7String, 6)
//!     .build()?;
//!
//! assert_eq!(s7_layout::size_of(&shape, CpuModel::S71500)?, 12);
//!
//! let motor = Record::builder("Motor")
//!     .field("running", true)
//!     .field("fault", false)
//!     .field("speed", 1450i16)
//!     .field("tag", "M1")
//!     .build();
//!
//! let bytes = s7_layout::encode(&motor, &shape, CpuModel::S71500)?;
//! let decoded = s7_layout::decode(&shape, &bytes, CpuModel::S71500)?;
//! assert_eq!(decoded, motor);
//! # Ok::<(), s7_layout::Error>(())
//! ```
//!
//! # Features
//!
//! - **Single traversal** - size, decode and encode share one computed [`Layout`]
//! - **Typed blocks** - implement [`DataBlock`] to map Rust structs directly
//! - **Controller defaults** - DATE_AND_TIME on S7-300/400, DTL on S7-1200/1500
//! - **Optional serde** - variant configuration and controller models (feature `serde`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod layout;
pub mod types;

pub use layout::{
    CpuModel, DataBlock, DateTimeRepr, Error, Field, FieldType, FromValue, Layout, MAX_BLOCK_SIZE,
    MetricsSnapshot, Record, RecordBuilder, RecordShape, Result, ShapeBuilder, Slot,
    StringEncoding, UnknownCpuModel, UnknownVariant, Value, VariantConfig, decode, decode_block,
    encode, encode_block, layout_of, metrics_snapshot, shape_of, size_of, size_of_block,
};
pub use types::ValueError;
