//! Big-endian numeric codecs (INT, WORD, DINT, DWORD, LINT, LWORD, REAL, LREAL)

use super::ValueError;

/// Copy a slice into a fixed-width array, rejecting any other length.
pub(crate) fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], ValueError> {
    bytes.try_into().map_err(|_| ValueError::WrongLength {
        expected: N,
        got: bytes.len(),
    })
}

macro_rules! be_codec {
    ($(#[$meta:meta])* $module:ident, $ty:ty, $size:literal) => {
        $(#[$meta])*
        pub mod $module {
            use crate::types::ValueError;

            /// Encoded width in bytes
            pub const SIZE: usize = $size;

            /// Encode to big-endian bytes
            #[must_use]
            pub fn to_bytes(value: $ty) -> [u8; SIZE] {
                value.to_be_bytes()
            }

            /// Decode from exactly [`SIZE`] big-endian bytes
            pub fn from_bytes(bytes: &[u8]) -> Result<$ty, ValueError> {
                super::fixed::<SIZE>(bytes).map(<$ty>::from_be_bytes)
            }
        }
    };
}

be_codec!(
    /// S7 INT (signed 16-bit)
    int, i16, 2
);
be_codec!(
    /// S7 WORD (unsigned 16-bit)
    word, u16, 2
);
be_codec!(
    /// S7 DINT (signed 32-bit)
    dint, i32, 4
);
be_codec!(
    /// S7 DWORD (unsigned 32-bit)
    dword, u32, 4
);
be_codec!(
    /// S7 LINT (signed 64-bit)
    lint, i64, 8
);
be_codec!(
    /// S7 LWORD (unsigned 64-bit)
    lword, u64, 8
);
be_codec!(
    /// S7 REAL (IEEE 754 single precision)
    real, f32, 4
);
be_codec!(
    /// S7 LREAL (IEEE 754 double precision)
    lreal, f64, 8
);
