//! Single-bit access inside a byte

/// Read bit `bit` (0 = least significant) of `byte`.
#[must_use]
pub const fn get(byte: u8, bit: u8) -> bool {
    byte & (1 << bit) != 0
}

/// Set or clear bit `bit` of `byte`, leaving the other bits untouched.
pub fn set(byte: &mut u8, bit: u8, value: bool) {
    if value {
        *byte |= 1 << bit;
    } else {
        *byte &= !(1 << bit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_preserves_siblings() {
        let mut byte = 0b1010_0000;
        set(&mut byte, 0, true);
        set(&mut byte, 7, false);
        assert_eq!(byte, 0b0010_0001);
        assert!(get(byte, 5));
        assert!(!get(byte, 6));
    }
}
