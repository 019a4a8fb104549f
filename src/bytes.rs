//! Byte-level helpers shared by every probe and walker.
//!
//! Every multi-byte field in every supported container is little-endian and
//! frequently lands on odd offsets, so decoding is plain offset arithmetic
//! over byte slices. The readers do not bounds-check; callers size their
//! buffers to the structure being decoded.

pub(crate) fn le_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from(buf[offset]) | u16::from(buf[offset + 1]) << 8
}

pub(crate) fn le_u24(buf: &[u8], offset: usize) -> u32 {
    u32::from(buf[offset]) | u32::from(buf[offset + 1]) << 8 | u32::from(buf[offset + 2]) << 16
}

pub(crate) fn le_u32(buf: &[u8], offset: usize) -> u32 {
    le_u24(buf, offset) | u32::from(buf[offset + 3]) << 24
}

/// The whitespace set used when trimming names (the classic C set, so
/// vertical tab and form feed count too).
fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// Turn a raw CBM name into a displayable string: stop at NUL, strip the
/// high bit of every byte, and cut after the last non-blank character.
///
/// The 0xA0 end-of-name padding masks down to a plain space and falls off
/// with the trailing-blank trim.
pub(crate) fn normalize_name(raw: &[u8]) -> String {
    let mut out = Vec::with_capacity(raw.len());
    let mut keep = 0;
    for &byte in raw {
        if byte == 0 {
            break;
        }
        let byte = byte & 0x7F;
        out.push(byte);
        if !is_blank(byte) {
            keep = out.len();
        }
    }
    out.truncate(keep);
    // masked bytes are always ASCII
    String::from_utf8_lossy(&out).into_owned()
}

#[test]
fn test_le_readers() {
    let buf = [0xFF, 0x34, 0x12, 0x78, 0x56, 0x01, 0xA0];
    assert_eq!(0x1234, le_u16(&buf, 1));
    assert_eq!(0x56_7812, le_u24(&buf, 2));
    assert_eq!(0x0156_7834, le_u32(&buf, 1));
}

#[test]
fn test_normalize_name() {
    assert_eq!("HELLO", normalize_name(b"HELLO\xA0\xA0\xA0"));
    assert_eq!("HI THERE", normalize_name(b"HI THERE   "));
    assert_eq!("CUT", normalize_name(b"CUT\0HIDDEN"));
    // high bits stripped before trimming
    assert_eq!("NAME", normalize_name(&[0xCE, 0xC1, 0xCD, 0xC5, 0xA0]));
    assert_eq!("", normalize_name(b"  \t "));
}

#[test]
fn test_normalize_name_idempotent() {
    for raw in [&b"  A B \xA0\xA0"[..], b"\xD3\xC3\xD2\xC1\xD4\xC3\xC8", b""] {
        let once = normalize_name(raw);
        assert_eq!(once, normalize_name(once.as_bytes()));
    }
}
