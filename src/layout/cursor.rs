//! Byte cursor and alignment rules
//!
//! Offsets are tracked in bits so that boolean runs (one bit each) stay
//! exact; everything else lands on byte or even-byte boundaries.

/// Round a bit offset up to the next even byte boundary, returned in bits.
///
/// A fractional byte offset is first rounded up to a whole byte, then to
/// the next even byte: bit offset 9 (byte 1.125) becomes 16 (byte 2).
#[must_use]
pub const fn align_even(bit_offset: usize) -> usize {
    bit_offset.div_ceil(16) * 16
}

/// Round a bit offset up to the next whole byte, returned in bits.
#[must_use]
pub const fn align_byte(bit_offset: usize) -> usize {
    bit_offset.div_ceil(8) * 8
}

/// Where one element lives inside the record's buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A single bit
    Bit {
        /// Byte offset
        byte: usize,
        /// Bit index inside that byte, 0 = least significant
        bit: u8,
    },
    /// A run of whole bytes
    Bytes {
        /// Byte offset of the first byte
        offset: usize,
        /// Number of bytes
        len: usize,
    },
}

impl Slot {
    /// Byte offset of the slot's first byte
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Bit { byte, .. } => *byte,
            Self::Bytes { offset, .. } => *offset,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn at_bit(bit_offset: usize) -> Self {
        Self::Bit {
            byte: bit_offset / 8,
            bit: (bit_offset % 8) as u8,
        }
    }
}

/// Running offset over one record, created at zero and advanced per field
#[derive(Debug, Default)]
pub(crate) struct ByteCursor {
    bits: usize,
}

impl ByteCursor {
    pub(crate) const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Current offset in bits
    pub(crate) const fn position(&self) -> usize {
        self.bits
    }

    /// Claim the next bit.
    pub(crate) fn bit(&mut self) -> Slot {
        let slot = Slot::at_bit(self.bits);
        self.bits += 1;
        slot
    }

    /// Claim `len` bytes starting at the next whole byte.
    pub(crate) fn bytes(&mut self, len: usize) -> Slot {
        self.bits = align_byte(self.bits);
        self.claim(len)
    }

    /// Claim `len` bytes starting at the next even byte.
    pub(crate) fn aligned(&mut self, len: usize) -> Slot {
        self.align_even();
        self.claim(len)
    }

    pub(crate) fn align_even(&mut self) {
        self.bits = align_even(self.bits);
    }

    /// Claim a run of `count` elements starting at the next even byte, each
    /// `width` bits wide and `stride` bits apart.
    ///
    /// Returns the bit offset of the first element, or `None` if the run
    /// would end past `limit` bits. The cursor is not advanced on failure.
    pub(crate) fn run(
        &mut self,
        count: usize,
        width: usize,
        stride: usize,
        limit: usize,
    ) -> Option<usize> {
        let start = align_even(self.bits);
        let span = match count.checked_sub(1) {
            None => 0,
            Some(rest) => rest.checked_mul(stride)?.checked_add(width)?,
        };
        let end = start.checked_add(span).filter(|end| *end <= limit)?;
        self.bits = end;
        Some(start)
    }

    /// Size of a nested record: trailing bits occupy a whole byte.
    pub(crate) const fn finish_nested(&self) -> usize {
        align_byte(self.bits) / 8
    }

    /// Size of a top-level record: always an even number of bytes.
    pub(crate) const fn finish_block(&self) -> usize {
        align_even(self.bits) / 8
    }

    fn claim(&mut self, len: usize) -> Slot {
        let offset = self.bits / 8;
        self.bits += len * 8;
        Slot::Bytes { offset, len }
    }
}
