//! Layout engine error types

use thiserror::Error;

use crate::types::ValueError;

/// Errors raised while deriving shapes or sizing, decoding and encoding records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A field needs variant configuration and no default applies
    #[error("field `{record}.{field}` requires {required} configuration")]
    ConfigurationMissing {
        /// Owning record type
        record: String,
        /// Offending field
        field: String,
        /// What had to be declared
        required: &'static str,
    },

    /// Buffer length differs from the computed record size
    #[error("buffer size mismatch for `{record}`: expected {expected} bytes, got {got}")]
    SizeMismatch {
        /// Record type being decoded
        record: String,
        /// Computed size
        expected: usize,
        /// Supplied buffer length
        got: usize,
    },

    /// Declared variant is unknown or does not fit the field
    #[error("invalid variant for `{record}.{field}`: {reason}")]
    InvalidVariant {
        /// Owning record type
        record: String,
        /// Offending field
        field: String,
        /// Why the variant was rejected
        reason: String,
    },

    /// Instance does not conform to the record shape
    #[error("shape mismatch at `{record}.{field}`: expected {expected}, found {found}")]
    ShapeMismatch {
        /// Owning record type
        record: String,
        /// Offending field
        field: String,
        /// What the shape requires
        expected: String,
        /// What the instance holds
        found: String,
    },

    /// A scalar value could not be encoded or decoded
    #[error("invalid value at `{record}.{field}`: {source}")]
    InvalidValue {
        /// Owning record type
        record: String,
        /// Offending field
        field: String,
        /// Codec failure
        #[source]
        source: ValueError,
    },

    /// A field pushes the record past [`MAX_BLOCK_SIZE`](super::MAX_BLOCK_SIZE)
    #[error("field `{record}.{field}` grows the record past the {max}-byte block limit")]
    BlockTooLarge {
        /// Owning record type
        record: String,
        /// Offending field
        field: String,
        /// Largest supported record size in bytes
        max: usize,
    },

    /// Two fields of one record share a name
    #[error("duplicate field `{field}` in record `{record}`")]
    DuplicateField {
        /// Owning record type
        record: String,
        /// Repeated field name
        field: String,
    },

    /// A record type contains itself, directly or indirectly
    #[error("record type `{record}` contains itself: {path}")]
    RecursiveShape {
        /// Record type whose derivation re-entered itself
        record: String,
        /// Derivation chain, outermost first
        path: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
