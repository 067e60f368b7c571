//! Big-endian wire conversions.
//!
//! Multi-byte samples are always stored most significant byte first,
//! regardless of the host byte order.

#[inline]
pub const fn to_host16(wire: [u8; 2]) -> u16 {
    u16::from_be_bytes(wire)
}

#[inline]
pub const fn to_host32(wire: [u8; 4]) -> u32 {
    u32::from_be_bytes(wire)
}

#[inline]
pub const fn from_host16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

#[inline]
pub const fn from_host32(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Unconditionally reverses the byte order of a 16-bit value.
#[inline]
pub const fn swap16(value: u16) -> u16 {
    value.swap_bytes()
}

/// Unconditionally reverses the byte order of a 32-bit value.
#[inline]
pub const fn swap32(value: u32) -> u32 {
    value.swap_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_host_reads_big_endian() {
        assert_eq!(to_host16([0x00, 0xFF]), 255);
        assert_eq!(to_host16([0xFF, 0x00]), 0xFF00);
        assert_eq!(to_host32([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
    }

    #[test]
    fn test_from_host_writes_big_endian() {
        assert_eq!(from_host16(0xABCD), [0xAB, 0xCD]);
        assert_eq!(from_host32(0x0102_0304), [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_swap() {
        assert_eq!(swap16(0x1234), 0x3412);
        assert_eq!(swap32(0x1234_5678), 0x7856_3412);
        assert_eq!(swap32(swap32(0xDEAD_BEEF)), 0xDEAD_BEEF);
    }
}
