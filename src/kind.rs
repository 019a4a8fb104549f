use bitflags::bitflags;

/// Container formats this crate can identify.
///
/// The order mirrors the probe priority in [`crate::probe`]; `Unknown` is a
/// terminal sentinel that no walker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Bare ARC data with no self-dearcer in front
    ArcRaw,
    /// C64 self-dissolving ARC, version 1.0
    C64Arc10,
    /// C64 self-dissolving ARC, version 1.3
    C64Arc13,
    /// C64 self-dissolving ARC, version 1.5
    C64Arc15,
    /// C128 self-dissolving ARC, version 1.5
    C128Arc15,
    /// LHA archive with a self-extractor program in front
    LhaSfx,
    /// Bare LHA archive
    LhaRaw,
    /// Old-style Lynx container
    LynxOld,
    /// New-style Lynx / Ultra-Lynx container
    LynxNew,
    /// T64 tape archive
    T64,
    /// Raw disk image (1541/1571/8050/8250/1581 geometry detected)
    D64,
    /// Raw 1581 disk image; no probe can detect one, kept for callers
    C1581,
    /// Disk image with a 64-byte emulator prelude
    X64,
    /// PC64 program file
    P00,
    /// PC64 sequential file
    S00,
    /// PC64 user file
    U00,
    /// PC64 relative file
    R00,
    /// PC64 deleted file
    D00,
    /// PC64 family file with an unrecognized extension
    X00,
    /// 64Net file
    N64,
    /// LBR library (not the CP/M kind)
    Lbr,
    /// Raw cassette pulse dump
    Tap,
    Unknown,
}

impl ContainerKind {
    /// Four-character format tag for directory footers.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::ArcRaw => " ARC",
            Self::C64Arc10 | Self::C64Arc13 | Self::C64Arc15 => " C64",
            Self::C128Arc15 => "C128",
            Self::LhaSfx | Self::LhaRaw => " LHA",
            Self::LynxOld | Self::LynxNew => "Lynx",
            Self::T64 => " T64",
            Self::D64 => " D64",
            Self::C1581 => "1581",
            Self::X64 => " X64",
            Self::P00 => " P00",
            Self::S00 => " S00",
            Self::U00 => " U00",
            Self::R00 => " R00",
            Self::D00 => " D00",
            Self::X00 => "P00?",
            Self::N64 => " N64",
            Self::Lbr => " LBR",
            Self::Tap => " TAP",
            Self::Unknown => "????",
        }
    }
}

/// The eight file types a CBM directory byte can carry in its low three bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CbmFileType {
    Del = 0,
    Seq = 1,
    Prg = 2,
    Usr = 3,
    Rel = 4,
    /// 1581 partition
    Cbm = 5,
    /// C65 file type
    Djj = 6,
    /// C65 file type
    Fab = 7,
}

impl CbmFileType {
    /// Decode the low three bits of a directory file-type byte.
    #[must_use]
    pub fn from_dir_byte(byte: u8) -> Self {
        match byte & 0x07 {
            0 => Self::Del,
            1 => Self::Seq,
            2 => Self::Prg,
            3 => Self::Usr,
            4 => Self::Rel,
            5 => Self::Cbm,
            6 => Self::Djj,
            _ => Self::Fab,
        }
    }

    /// Three-character tag as printed in directory listings.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Del => "DEL",
            Self::Seq => "SEQ",
            Self::Prg => "PRG",
            Self::Usr => "USR",
            Self::Rel => "REL",
            Self::Cbm => "CBM",
            Self::Djj => "DJJ",
            Self::Fab => "FAB",
        }
    }
}

bitflags! {
    /// Attribute bits carried next to the type code in a directory byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CbmFileAttr: u8 {
        /// The file was properly closed; unclosed entries are splats.
        const CLOSED = 0x80;
        const LOCKED = 0x40;
    }
}

/// Map the single-letter type codes used by ARC, Lynx, LHA and LBR entries.
pub(crate) fn type_for_letter(code: u8) -> &'static str {
    match code.to_ascii_uppercase() {
        b'P' => "PRG",
        b'S' => "SEQ",
        b'U' => "USR",
        b'R' => "REL",
        b'D' => "DEL",
        b' ' => "   ",
        _ => "???",
    }
}

/// Payload bytes per disk block (256 on disk minus the two chain bytes).
pub(crate) const BLOCK_PAYLOAD: u64 = 254;

/// Blocks a file of `len` bytes occupies; zero-length files still take one.
pub(crate) fn data_blocks(len: u64) -> u32 {
    (len.saturating_sub(1) / BLOCK_PAYLOAD + 1) as u32
}

/// Block count in the `len/254 + 1` convention used by tape-derived formats.
pub(crate) fn padded_blocks(len: u64) -> u32 {
    (len / BLOCK_PAYLOAD + 1) as u32
}

/// Space saving in percent; negative when the stored form grew.
pub(crate) fn savings_pct(now: u64, full: u64) -> i32 {
    if full == 0 {
        return 100;
    }
    let pct = 100 - (now as i64).saturating_mul(100) / full as i64;
    pct.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[test]
fn test_block_arithmetic() {
    assert_eq!(1, data_blocks(0));
    assert_eq!(1, data_blocks(1));
    assert_eq!(1, data_blocks(254));
    assert_eq!(2, data_blocks(255));
    assert_eq!(5, data_blocks(1032));
    assert_eq!(1, padded_blocks(0));
    assert_eq!(2, padded_blocks(254));
    assert_eq!(4, padded_blocks(1002));
}

#[test]
fn test_savings() {
    assert_eq!(0, savings_pct(100, 100));
    assert_eq!(50, savings_pct(50, 100));
    assert_eq!(100, savings_pct(0, 10));
    assert_eq!(-100, savings_pct(20, 10));
}

#[test]
fn test_type_letters() {
    assert_eq!("PRG", type_for_letter(b'p'));
    assert_eq!("SEQ", type_for_letter(b'S'));
    assert_eq!("   ", type_for_letter(b' '));
    assert_eq!("???", type_for_letter(b'q'));
    assert_eq!("CBM", CbmFileType::from_dir_byte(0x85).tag());
    assert!(CbmFileAttr::from_bits_truncate(0x82).contains(CbmFileAttr::CLOSED));
}
