//! Fixed-width scalar codecs for S7 data types
//!
//! Each codec is a pure `to_bytes`/`from_bytes` pair over big-endian
//! controller memory. The layout engine delegates every scalar field to one
//! of these.

mod error;
mod number;

pub mod bit;
pub mod date_time;
pub mod date_time_long;
pub mod string;
pub mod timespan;
pub mod wstring;

pub use error::ValueError;
pub use number::{dint, dword, int, lint, lreal, lword, real, word};
