//! Ordered container probes.
//!
//! `determine` rewinds the stream, reads one short prefix, and tries every
//! probe in priority order; the first match wins. The order is load-bearing:
//! N64's three magic bytes open the C64/C128 ARC stubs as well, and the
//! lettered P00 variants must run before the catch-all X00.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::Error;
use crate::kind::ContainerKind;

/// Longest fixed header any probe examines.
const PREFIX_LEN: usize = 32;

type ProbeFn = fn(&[u8], Option<&str>) -> bool;

/// BASIC stub shared by the C64 self-dissolving ARC variants: `SYS(2063)`.
const MAGIC_C64_STUB: [u8; 10] = [0x9E, b'(', b'2', b'0', b'6', b'3', b')', 0, 0, 0];
/// C128 stub: `SYS(7183)`.
const MAGIC_C128_STUB: [u8; 10] = [0x9E, b'(', b'7', b'1', b'8', b'3', b')', 0, 0, 0];
const MAGIC_LHA_SFX: [u8; 10] = [0x97, 0x32, 0x30, 0x2C, 0x30, 0x3A, 0x8B, 0xC2, 0x28, 0x32];
const MAGIC_LYNX_OLD: &[u8; 10] = b" 1   LYNX ";
/// Tokenized `POKE53280,0:POKE53281,0:POKE646,PEEK(` opening the new-style
/// Lynx BASIC header.
const MAGIC_LYNX_NEW: [u8; 25] = [
    0x97, b'5', b'3', b'2', b'8', b'0', b',', b'0', 0x3A, 0x97, b'5', b'3', b'2', b'8', b'1',
    b',', b'0', 0x3A, 0x97, b'6', b'4', b'6', b',', 0xC2, 0x28,
];
const MAGIC_X64: [u8; 4] = [0x43, 0x15, 0x41, 0x64];
const MAGIC_P00: &[u8; 8] = b"C64File\0";
const MAGIC_TAP: &[u8; 12] = b"C64-TAPE-RAW";

/// First-sector patterns that mark a likely raw disk image.
const D64_PRELUDES: [[u8; 2]; 6] = [
    [0x00, 0xFF],
    [0x00, 0x00],
    [0x01, 0x0A],
    [0x01, 0x06],
    [0x01, 0x03],
    [0x01, 0x01],
];

const D64_EXTENSIONS: [&str; 5] = ["d64", "d71", "d80", "d82", "d81"];

/// Probe table in priority order.
pub(crate) const PROBES: &[(ContainerKind, ProbeFn)] = &[
    (ContainerKind::ArcRaw, is_arc_raw),
    (ContainerKind::C64Arc10, is_c64_arc_10),
    (ContainerKind::C64Arc13, is_c64_arc_13),
    (ContainerKind::C64Arc15, is_c64_arc_15),
    (ContainerKind::C128Arc15, is_c128_arc_15),
    (ContainerKind::LhaSfx, is_lha_sfx),
    (ContainerKind::LhaRaw, is_lha_raw),
    (ContainerKind::LynxOld, is_lynx_old),
    (ContainerKind::LynxNew, is_lynx_new),
    (ContainerKind::T64, is_t64),
    (ContainerKind::D64, is_d64),
    (ContainerKind::C1581, is_c1581),
    (ContainerKind::X64, is_x64),
    (ContainerKind::P00, is_p00),
    (ContainerKind::S00, is_s00),
    (ContainerKind::U00, is_u00),
    (ContainerKind::R00, is_r00),
    (ContainerKind::D00, is_d00),
    (ContainerKind::X00, is_x00),
    (ContainerKind::N64, is_n64),
    (ContainerKind::Lbr, is_lbr),
    (ContainerKind::Tap, is_tap),
];

/// Identify the container held by `stream`.
///
/// `name_hint` is the file name, if there is one; a few formats can only be
/// told apart by their extension. Returns [`ContainerKind::Unknown`] when
/// nothing matches.
pub fn determine<S: Read + Seek>(
    stream: &mut S,
    name_hint: Option<&str>,
) -> Result<ContainerKind, Error> {
    stream.seek(SeekFrom::Start(0))?;
    let mut prefix = [0u8; PREFIX_LEN];
    let mut len = 0;
    while len < PREFIX_LEN {
        match stream.read(&mut prefix[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(Error::Io(err)),
        }
    }
    let prefix = &prefix[..len];
    Ok(PROBES
        .iter()
        .find(|(_, probe)| probe(prefix, name_hint))
        .map_or(ContainerKind::Unknown, |&(kind, _)| kind))
}

fn extension(hint: Option<&str>) -> Option<&str> {
    hint.and_then(|name| name.rsplit_once('.')).map(|(_, ext)| ext)
}

fn extension_letter(hint: Option<&str>) -> Option<u8> {
    extension(hint)
        .and_then(|ext| ext.bytes().next())
        .map(|b| b.to_ascii_uppercase())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|win| win == needle)
}

fn is_arc_raw(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 2 && prefix[0] == 2 && prefix[1] <= 7
}

fn is_c64_arc_10(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 22
        && prefix[6..16] == MAGIC_C64_STUB
        && prefix[18..21] == [0x85, 0xFD, 0xA9]
}

fn is_c64_arc_13(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 32
        && prefix[6..16] == MAGIC_C64_STUB
        && prefix[28..31] == [0x85, 0x2F, 0xA9]
}

fn is_c64_arc_15(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 29
        && prefix[6..16] == MAGIC_C64_STUB
        && prefix[23..27] == [0x8D, 0x21, 0xD0, 0x4C]
}

fn is_c128_arc_15(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 19 && prefix[6..16] == MAGIC_C128_STUB && prefix[16] == 0x4C
}

fn is_lha_sfx(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 16 && prefix[6..16] == MAGIC_LHA_SFX
}

fn is_lha_raw(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 5 && &prefix[2..5] == b"-lh"
}

fn is_lynx_old(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 10 && &prefix[..10] == MAGIC_LYNX_OLD
}

fn is_lynx_new(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 31 && prefix[6..31] == MAGIC_LYNX_NEW
}

fn is_t64(prefix: &[u8], _hint: Option<&str>) -> bool {
    // covers both "C64 tape image file" and "C64S tape file"
    let head = &prefix[..prefix.len().min(19)];
    contains(head, b"C64") && contains(head, b"tape")
}

fn is_d64(prefix: &[u8], hint: Option<&str>) -> bool {
    if extension(hint)
        .is_some_and(|ext| D64_EXTENSIONS.iter().any(|want| ext.eq_ignore_ascii_case(want)))
    {
        return true;
    }
    prefix.len() >= 3
        && (&prefix[..3] == b"CBM"
            || D64_PRELUDES.iter().any(|pattern| prefix[..2] == *pattern))
}

/// A raw 1581 image has no reliable signature; nothing ever probes true.
fn is_c1581(_prefix: &[u8], _hint: Option<&str>) -> bool {
    false
}

fn is_x64(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 4 && prefix[..4] == MAGIC_X64
}

fn is_x00(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 26 && &prefix[..8] == MAGIC_P00
}

fn is_p00(prefix: &[u8], hint: Option<&str>) -> bool {
    is_x00(prefix, hint) && extension_letter(hint) == Some(b'P')
}

fn is_s00(prefix: &[u8], hint: Option<&str>) -> bool {
    is_x00(prefix, hint) && extension_letter(hint) == Some(b'S')
}

fn is_u00(prefix: &[u8], hint: Option<&str>) -> bool {
    is_x00(prefix, hint) && extension_letter(hint) == Some(b'U')
}

fn is_r00(prefix: &[u8], hint: Option<&str>) -> bool {
    // the stored REL record size marks a relative file even without the
    // telltale extension
    is_x00(prefix, hint)
        && extension_letter(hint).is_some_and(|letter| letter == b'R' || prefix[25] > 0)
}

fn is_d00(prefix: &[u8], hint: Option<&str>) -> bool {
    is_x00(prefix, hint) && extension_letter(hint) == Some(b'D')
}

fn is_n64(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 4 && &prefix[..3] == b"C64" && prefix[3] == 1
}

fn is_lbr(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 3 && &prefix[..3] == b"DWB"
}

fn is_tap(prefix: &[u8], _hint: Option<&str>) -> bool {
    prefix.len() >= 12 && &prefix[..12] == MAGIC_TAP
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn probe_bytes(data: &[u8], hint: Option<&str>) -> ContainerKind {
        determine(&mut Cursor::new(data.to_vec()), hint).unwrap()
    }

    #[test]
    fn test_arc_raw() {
        assert_eq!(ContainerKind::ArcRaw, probe_bytes(&[2, 0], None));
        assert_eq!(ContainerKind::ArcRaw, probe_bytes(&[2, 7], None));
        assert_eq!(ContainerKind::Unknown, probe_bytes(&[2, 8], None));
        assert_eq!(ContainerKind::Unknown, probe_bytes(&[3, 0], None));
    }

    #[test]
    fn test_t64_magic_variants() {
        let mut data = [b' '; 64];
        data[..19].copy_from_slice(b"C64 tape image file");
        assert_eq!(ContainerKind::T64, probe_bytes(&data, None));
        let mut data = [b' '; 64];
        data[..14].copy_from_slice(b"C64S tape file");
        assert_eq!(ContainerKind::T64, probe_bytes(&data, None));
    }

    #[test]
    fn test_p00_family_ordering() {
        let mut data = [0u8; 26];
        data[..8].copy_from_slice(MAGIC_P00);
        assert_eq!(ContainerKind::P00, probe_bytes(&data, Some("game.p00")));
        assert_eq!(ContainerKind::S00, probe_bytes(&data, Some("notes.S00")));
        assert_eq!(ContainerKind::X00, probe_bytes(&data, Some("what.z00")));
        assert_eq!(ContainerKind::X00, probe_bytes(&data, None));
        // a nonzero record size marks a REL file under any extension
        data[25] = 80;
        assert_eq!(ContainerKind::R00, probe_bytes(&data, Some("what.z00")));
    }

    #[test]
    fn test_n64_after_p00() {
        // "C64File\0" starts with the N64 magic; the P00 family must win
        let mut data = [0u8; 26];
        data[..8].copy_from_slice(MAGIC_P00);
        assert_ne!(ContainerKind::N64, probe_bytes(&data, None));
        let mut n64 = [0u8; 8];
        n64[..3].copy_from_slice(b"C64");
        n64[3] = 1;
        assert_eq!(ContainerKind::N64, probe_bytes(&n64, None));
    }

    #[test]
    fn test_d64_by_extension_and_prelude() {
        assert_eq!(ContainerKind::D64, probe_bytes(&[0u8; 16], Some("disk.D71")));
        assert_eq!(ContainerKind::D64, probe_bytes(&[0x01, 0x0A, 0x00], None));
        assert_eq!(ContainerKind::D64, probe_bytes(b"CBM rest", None));
        assert_eq!(ContainerKind::Unknown, probe_bytes(&[0x05, 0x0A, 0x00], None));
    }

    #[test]
    fn test_x64_and_tap() {
        let mut x64 = [0u8; 64];
        x64[..4].copy_from_slice(&MAGIC_X64);
        assert_eq!(ContainerKind::X64, probe_bytes(&x64, None));
        assert_eq!(
            ContainerKind::Tap,
            probe_bytes(b"C64-TAPE-RAW\x01\x00\x00\x00\x00\x00\x00\x00", None)
        );
    }

    #[test]
    fn test_lynx_old() {
        assert_eq!(
            ContainerKind::LynxOld,
            probe_bytes(b" 1   LYNX  IX  BY SOMEONE\r", None)
        );
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(ContainerKind::Unknown, probe_bytes(&[], None));
    }
}
