//! Single-entry and trivial-text containers: the PC64 P00 family, 64Net
//! N64 files, and LBR libraries.

use std::io::{Read, Seek};

use crate::bytes::{le_u32, normalize_name};
use crate::error::Error;
use crate::kind::{data_blocks, padded_blocks, type_for_letter, CbmFileType, ContainerKind};
use crate::sink::{DirEntry, DirSink, Totals};
use crate::stream::{read_required, seek_to, stream_len, TextReader};

/// P00 header: 8-byte magic, 17-byte name, REL record size.
const X00_HEADER_LEN: usize = 26;

/// N64 header fields behind the 4-byte magic.
const N64_HEADER_LEN: usize = 43;

/// A P00-family file is an ordinary file with a name header in front; the
/// sub-variant was decided by the probe, so the single entry's type comes
/// from `kind`.
pub(crate) fn walk_x00<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    totals: &mut Totals,
    sink: &mut V,
) -> Result<(), Error> {
    let file_type = match kind {
        ContainerKind::P00 => "PRG",
        ContainerKind::S00 => "SEQ",
        ContainerKind::U00 => "USR",
        ContainerKind::R00 => "REL",
        ContainerKind::D00 => "DEL",
        ContainerKind::X00 => "???",
        other => return Err(Error::WrongKind(other)),
    };
    let file_len = stream_len(stream)?;
    seek_to(stream, 0)?;
    let mut header = [0u8; X00_HEADER_LEN];
    read_required(stream, &mut header, "P00 header")?;
    sink.container_start(kind, None);

    let length = file_len.saturating_sub(X00_HEADER_LEN as u64);
    let entry = DirEntry {
        name: normalize_name(&header[8..25]),
        file_type,
        length,
        blocks: padded_blocks(length),
        method: "Stored",
        savings: 0,
        blocks_now: padded_blocks(length),
        checksum: None,
    };
    sink.entry(&entry);
    totals.entries = 1;
    totals.total_length = length;
    totals.total_blocks = entry.blocks;
    totals.total_blocks_now = entry.blocks;
    Ok(())
}

pub(crate) fn walk_n64<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    totals: &mut Totals,
    sink: &mut V,
) -> Result<(), Error> {
    if kind != ContainerKind::N64 {
        return Err(Error::WrongKind(kind));
    }
    seek_to(stream, 4)?;
    let mut header = [0u8; N64_HEADER_LEN];
    read_required(stream, &mut header, "N64 header")?;
    sink.container_start(kind, None);

    let length = u64::from(le_u32(&header, 3));
    let entry = DirEntry {
        name: normalize_name(&header[27..43]),
        file_type: CbmFileType::from_dir_byte(header[0]).tag(),
        length,
        blocks: padded_blocks(length),
        method: "Stored",
        savings: 0,
        blocks_now: padded_blocks(length),
        checksum: None,
    };
    sink.entry(&entry);
    totals.entries = 1;
    totals.total_length = length;
    totals.total_blocks = entry.blocks;
    totals.total_blocks_now = entry.blocks;
    Ok(())
}

/// LBR directories are text: an entry count, then name, type letter, and
/// decimal length per entry, each CR-terminated.
pub(crate) fn walk_lbr<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    totals: &mut Totals,
    sink: &mut V,
) -> Result<(), Error> {
    if kind != ContainerKind::Lbr {
        return Err(Error::WrongKind(kind));
    }
    seek_to(stream, 3)?;
    sink.container_start(kind, None);

    let mut text = TextReader::new(stream);
    let count = text.number()?.max(0);
    text.skip_to_cr()?;
    text.skip_ws()?;

    for _ in 0..count {
        let name = text.field(16)?;
        text.skip_to_cr()?;
        text.consume_one()?;
        let letter = text.letter()?;
        text.skip_to_cr()?;
        text.consume_one()?;
        let length = text.number()?.max(0) as u64;
        text.skip_to_cr()?;
        text.consume_one()?;

        let entry = DirEntry {
            name: normalize_name(&name),
            file_type: type_for_letter(letter),
            length,
            blocks: data_blocks(length),
            method: "Stored",
            savings: 0,
            blocks_now: data_blocks(length),
            checksum: None,
        };
        sink.entry(&entry);
        totals.entries += 1;
        totals.total_length += length;
        totals.total_blocks += entry.blocks;
    }

    totals.total_blocks_now = totals.total_blocks;
    Ok(())
}
