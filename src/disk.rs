//! D64/X64 disk image walker.
//!
//! Covers the 1541/1571 family, the 8050/8250 family, and the 1581. Raw
//! images get their geometry detected by validating candidate header
//! sectors; X64 images declare a drive model in their 64-byte prelude.
//! Directory sectors are chained by track/sector links, and exact file
//! lengths come from following each file's own chain.

use std::fmt;
use std::io::{Read, Seek};

use crate::bytes::{le_u16, normalize_name};
use crate::error::Error;
use crate::kind::{CbmFileAttr, CbmFileType, ContainerKind};
use crate::sink::{DirEntry, DirOptions, DirSink, Totals};
use crate::stream::{read_struct, seek_to};

const BYTES_PER_SECTOR: u64 = 256;

/// End-of-name padding byte in disk headers and directory entries.
const END_NAME: u8 = 0xA0;

/// Sector offset of the start of each 1541 track. Tracks 36-42 are
/// nonstandard extensions some images use.
const TRACK_OFFSETS_1541: [u16; 42] = [
    0, 21, 42, 63, 84, 105, 126, 147, 168, 189, 210, 231, 252, 273, 294, 315, 336, 357, //
    376, 395, 414, 433, 452, 471, 490, //
    508, 526, 544, 562, 580, 598, //
    615, 632, 649, 666, //
    683, 700, 717, 734, 751, 768, 785,
];

/// Sectors on an 8250 track; the layout repeats on the second side.
const fn sectors_8250(track_index: usize) -> u16 {
    match track_index % 77 {
        0..=38 => 29,
        39..=52 => 27,
        53..=63 => 25,
        _ => 23,
    }
}

const fn build_8250_offsets() -> [u16; 154] {
    let mut table = [0u16; 154];
    let mut track = 1;
    while track < 154 {
        table[track] = table[track - 1] + sectors_8250(track - 1);
        track += 1;
    }
    table
}

/// Sector offset of the start of each 8250 track; an 8050 is the first 77
/// entries of the same table.
const TRACK_OFFSETS_8250: [u16; 154] = build_8250_offsets();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Geometry {
    D1541,
    D1571,
    D1581,
    D8250,
}

impl Geometry {
    /// Slack block-count bounds, used only to cut off looping chains.
    fn capacity_blocks(self) -> u32 {
        match self {
            Self::D1541 => 802,
            Self::D1571 => 1366,
            Self::D1581 => 3200,
            Self::D8250 => 4166,
        }
    }

    fn track_base(self, track: usize) -> Option<(u64, u16)> {
        match self {
            Self::D1541 => {
                let base = *TRACK_OFFSETS_1541.get(track - 1)?;
                let width = match TRACK_OFFSETS_1541.get(track) {
                    Some(next) => next - base,
                    None => 17,
                };
                Some((u64::from(base), width))
            }
            Self::D1571 => {
                if track > 70 {
                    return None;
                }
                // the second side mirrors the standard 35 tracks
                let (side, track) = if track <= 35 { (0, track) } else { (683, track - 35) };
                let base = TRACK_OFFSETS_1541[track - 1];
                let width = TRACK_OFFSETS_1541[track] - base;
                Some((u64::from(side + base), width))
            }
            Self::D1581 => {
                if track > 80 {
                    return None;
                }
                Some((40 * (track as u64 - 1), 40))
            }
            Self::D8250 => {
                let base = *TRACK_OFFSETS_8250.get(track - 1)?;
                Some((u64::from(base), sectors_8250(track - 1)))
            }
        }
    }

    /// Byte offset of (track, sector); `None` when the coordinates leave
    /// the disk. Tracks count from 1, sectors from 0.
    pub(crate) fn location(self, track: u8, sector: u8) -> Option<u64> {
        if track == 0 {
            return None;
        }
        let (base, width) = self.track_base(usize::from(track))?;
        if u16::from(sector) >= width {
            return None;
        }
        Some((base + u64::from(sector)) * BYTES_PER_SECTOR)
    }

    /// Where this geometry keeps its header sector.
    fn header_sector(self) -> (u8, u8) {
        match self {
            Self::D1541 | Self::D1571 => (18, 0),
            Self::D8250 => (39, 0),
            Self::D1581 => (40, 0),
        }
    }

    fn validate_header(self, block: &[u8; 256]) -> bool {
        match self {
            // the flag byte is reserved, but '*' shows up in old images
            Self::D1541 => {
                block[2] == b'A' && (block[3] == 0 || block[3] == b'*') && block[167] == END_NAME
            }
            // double-sided images mark themselves; only 0x80 counts
            Self::D1571 => block[2] == b'A' && block[3] == 0x80 && block[167] == END_NAME,
            Self::D8250 => block[2] == b'C' && block[3] == 0,
            Self::D1581 => {
                block[2] == b'D' && block[3] == 0 && block[27] == END_NAME && block[28] == END_NAME
            }
        }
    }

    fn disk_name(self, block: &[u8; 256]) -> String {
        let raw = match self {
            Self::D1541 | Self::D1571 => &block[144..160],
            Self::D8250 => &block[6..22],
            Self::D1581 => &block[4..20],
        };
        normalize_name(name_before_pad(raw))
    }
}

/// Map an X64 prelude device code onto a geometry.
fn geometry_for_device(code: u8) -> Result<Geometry, Error> {
    match code {
        // 1540/1541/1542/1551/1570 and the IEEE 2031/2040/2041/4040
        0..=4 | 16..=18 | 24 => Ok(Geometry::D1541),
        // 1571/1572
        5 | 6 => Ok(Geometry::D1571),
        8 => Ok(Geometry::D1581),
        // 8050/8060/8061, SFD1001, 8250, 8280
        32..=34 | 48..=50 => Ok(Geometry::D8250),
        _ => Err(Error::UnsupportedDevice(code)),
    }
}

fn name_before_pad(raw: &[u8]) -> &[u8] {
    let end = raw.iter().position(|&b| b == END_NAME).unwrap_or(raw.len());
    &raw[..end]
}

/// Why a file chain could not be sized.
#[derive(Debug)]
enum ChainFault {
    Loop(u32),
    BadLink { track: u8, sector: u8 },
    Truncated,
    Io(Error),
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loop(blocks) => write!(f, "chain loops (still open after {blocks} blocks)"),
            Self::BadLink { track, sector } => {
                write!(f, "chain leaves the disk at track {track} sector {sector}")
            }
            Self::Truncated => f.write_str("chain runs past the end of the image"),
            Self::Io(err) => err.fmt(f),
        }
    }
}

/// Follow a file's sector chain, counting its exact byte length. The last
/// block's link holds bytes-used-plus-one in place of a sector number.
fn count_chain_bytes<S: Read + Seek>(
    stream: &mut S,
    geometry: Geometry,
    base: u64,
    first_track: u8,
    first_sector: u8,
) -> Result<u64, ChainFault> {
    let mut track = first_track;
    let mut sector = first_sector;
    let mut blocks = 0u32;
    let mut link = [0u8; 2];
    loop {
        let offset = geometry
            .location(track, sector)
            .ok_or(ChainFault::BadLink { track, sector })?;
        seek_to(stream, base + offset).map_err(ChainFault::Io)?;
        match read_struct(stream, &mut link) {
            Ok(true) => {}
            Ok(false) => return Err(ChainFault::Truncated),
            Err(err) => return Err(ChainFault::Io(err)),
        }
        blocks += 1;
        if blocks > geometry.capacity_blocks() {
            return Err(ChainFault::Loop(blocks));
        }
        if link[0] == 0 {
            return Ok(u64::from(blocks - 1) * 254 + u64::from(link[1]).saturating_sub(1));
        }
        track = link[0];
        sector = link[1];
    }
}

pub(crate) fn walk<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    options: &DirOptions,
    totals: &mut Totals,
    sink: &mut V,
) -> Result<(), Error> {
    let header_offset;
    let mut declared = None;
    match kind {
        ContainerKind::D64 | ContainerKind::C1581 => header_offset = 0,
        ContainerKind::X64 => {
            header_offset = 0x40;
            seek_to(stream, 0)?;
            let mut prelude = [0u8; 0x40];
            if !read_struct(stream, &mut prelude)? {
                return Err(Error::Truncated("X64 prelude"));
            }
            let device = prelude[6];
            declared = Some(geometry_for_device(device).inspect_err(|_| {
                log::warn!("unsupported X64 disk image device type (#{device})");
            })?);
            let minor = i32::from(prelude[5]);
            totals.version = -(i32::from(prelude[4]) * 10
                + if minor >= 10 { minor / 10 } else { minor });
        }
        other => return Err(Error::WrongKind(other)),
    }

    // candidates in ascending capacity order; a declared type is tried alone
    let one;
    let candidates: &[Geometry] = match declared {
        Some(geometry) => {
            one = [geometry];
            &one
        }
        None => &[Geometry::D1541, Geometry::D1571, Geometry::D8250, Geometry::D1581],
    };

    let mut detected = None;
    for &geometry in candidates {
        let (track, sector) = geometry.header_sector();
        let Some(offset) = geometry.location(track, sector) else {
            continue;
        };
        seek_to(stream, header_offset + offset)?;
        let mut block = [0u8; 256];
        if !read_struct(stream, &mut block)? {
            continue;
        }
        if geometry.validate_header(&block) {
            detected = Some((geometry, block));
            break;
        }
        if declared.is_some() {
            break;
        }
    }
    let Some((geometry, header)) = detected else {
        log::warn!("unsupported disk image format");
        return Err(Error::UnsupportedImage);
    };

    let label = geometry.disk_name(&header);
    sink.container_start(kind, (!label.is_empty()).then_some(label.as_str()));

    // the header names the first directory sector, except on the 8050/8250
    // where the directory is fixed at track 39 sector 1
    let (mut next_track, mut next_sector) = if geometry == Geometry::D8250 {
        (39, 1)
    } else {
        (header[0], header[1])
    };

    let mut directory_blocks = 0u32;
    while next_track != 0 {
        directory_blocks += 1;
        if directory_blocks > geometry.capacity_blocks() {
            log::warn!("directory chain never terminates");
            return Err(Error::DirectoryLoop(directory_blocks));
        }
        let offset = geometry.location(next_track, next_sector).ok_or(Error::BadLink {
            track: next_track,
            sector: next_sector,
        })?;
        seek_to(stream, header_offset + offset)?;
        let mut block = [0u8; 256];
        if !read_struct(stream, &mut block)? {
            return Err(Error::Truncated("directory sector"));
        }
        next_track = block[0];
        next_sector = block[1];

        for slot in 0..8 {
            let record = &block[2 + slot * 32..2 + slot * 32 + 30];
            let type_byte = record[0];
            if !CbmFileAttr::from_bits_truncate(type_byte).contains(CbmFileAttr::CLOSED) {
                continue;
            }
            let file_type = CbmFileType::from_dir_byte(type_byte);
            let stored_blocks = u32::from(le_u16(record, 28));
            let name = normalize_name(name_before_pad(&record[3..19]));

            let length = if file_type == CbmFileType::Cbm {
                // a 1581 partition is raw sectors with no chain pointers
                u64::from(stored_blocks) * 256
            } else if options.precise_lengths {
                match count_chain_bytes(stream, geometry, header_offset, record[1], record[2]) {
                    Ok(bytes) => bytes,
                    Err(fault) => {
                        log::warn!("cannot size \"{name}\": {fault}");
                        0
                    }
                }
            } else {
                0
            };

            let entry = DirEntry {
                name,
                file_type: file_type.tag(),
                length,
                blocks: stored_blocks,
                method: "Stored",
                savings: 0,
                blocks_now: stored_blocks,
                checksum: None,
            };
            sink.entry(&entry);
            totals.entries += 1;
            totals.total_length += length;
            totals.total_blocks += stored_blocks;
        }
    }

    totals.total_blocks_now = totals.total_blocks;
    Ok(())
}
