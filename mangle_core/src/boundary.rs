//! Byte sequences that parsers commonly get wrong.

/// Values injected by the boundary-value operation, each written verbatim over
/// the buffer. Multi-byte integers appear in both big and little endian.
pub static BOUNDARY_VALUES: &[&[u8]] = &[
    // 8 bits
    b"\x00",
    b"\x01",
    b"\x7e",
    b"\x7f",
    b"\x80",
    b"\x81",
    b"\xfe",
    b"\xff",
    // 16 bits, big endian
    b"\x00\x00",
    b"\x00\x01",
    b"\x7f\xfe",
    b"\x7f\xff",
    b"\x80\x00",
    b"\x80\x01",
    b"\xff\xfe",
    b"\xff\xff",
    // 16 bits, little endian
    b"\x01\x00",
    b"\xfe\x7f",
    b"\xff\x7f",
    b"\x00\x80",
    b"\x01\x80",
    b"\xfe\xff",
    // 32 bits, big endian
    b"\x00\x00\x00\x00",
    b"\x00\x00\x00\x01",
    b"\x7f\xff\xff\xfe",
    b"\x7f\xff\xff\xff",
    b"\x80\x00\x00\x00",
    b"\x80\x00\x00\x01",
    b"\xff\xff\xff\xfe",
    b"\xff\xff\xff\xff",
    // 32 bits, little endian
    b"\x01\x00\x00\x00",
    b"\xfe\xff\xff\x7f",
    b"\xff\xff\xff\x7f",
    b"\x00\x00\x00\x80",
    b"\x01\x00\x00\x80",
    b"\xfe\xff\xff\xff",
    // 64 bits, big endian
    b"\x00\x00\x00\x00\x00\x00\x00\x00",
    b"\x00\x00\x00\x00\x00\x00\x00\x01",
    b"\x7f\xff\xff\xff\xff\xff\xff\xff",
    b"\x80\x00\x00\x00\x00\x00\x00\x00",
    b"\xff\xff\xff\xff\xff\xff\xff\xff",
    // 64 bits, little endian
    b"\x01\x00\x00\x00\x00\x00\x00\x00",
    b"\xff\xff\xff\xff\xff\xff\xff\x7f",
    b"\x00\x00\x00\x00\x00\x00\x00\x80",
    // Oversized length fields
    b"\x00\x01\x00\x00",
    b"\x00\x00\x01\x00",
    b"\x10\x00\x00\x00",
    b"\x00\x00\x00\x10",
    b"\x40\x00\x00\x00",
    b"\x00\x00\x00\x40",
];
