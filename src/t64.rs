//! T64 tape archive walker.
//!
//! A fixed 64-byte header is followed by a flat directory of 32-byte
//! entries. Some archivers write disk-style type bytes into the tape
//! directory; the closed bit tells the two conventions apart.

use std::io::{Read, Seek};

use crate::bytes::{le_u16, normalize_name};
use crate::error::Error;
use crate::kind::{padded_blocks, CbmFileAttr, CbmFileType, ContainerKind};
use crate::sink::{DirEntry, DirSink, Totals};
use crate::stream::{read_required, read_struct, seek_to};

const HEADER_LEN: usize = 64;
const ENTRY_LEN: usize = 32;

/// Tape-specific file types, used when the closed bit is clear.
const TAPE_TYPES: [&str; 8] = ["SEQ", "PRG", "?2?", "?3?", "?4?", "?5?", "?6?", "?7?"];

pub(crate) fn walk<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    totals: &mut Totals,
    sink: &mut V,
) -> Result<(), Error> {
    if kind != ContainerKind::T64 {
        return Err(Error::WrongKind(kind));
    }
    seek_to(stream, 0)?;
    let mut header = [0u8; HEADER_LEN];
    read_required(stream, &mut header, "tape archive header")?;
    totals.version = -(i32::from(header[33]) * 10 + i32::from(header[32]));
    let used = le_u16(&header, 36);
    let label = normalize_name(&header[40..64]);
    sink.container_start(kind, (!label.is_empty()).then_some(label.as_str()));

    let mut record = [0u8; ENTRY_LEN];
    for _ in 0..used {
        if !read_struct(stream, &mut record)? {
            break;
        }
        let type_byte = record[1];
        let start = le_u16(&record, 2);
        let end = le_u16(&record, 4);
        let length = u64::from(end.wrapping_sub(start).wrapping_add(2));
        let file_type = if CbmFileAttr::from_bits_truncate(type_byte).contains(CbmFileAttr::CLOSED)
        {
            CbmFileType::from_dir_byte(type_byte).tag()
        } else {
            TAPE_TYPES
                .get(usize::from(type_byte))
                .copied()
                .unwrap_or("???")
        };

        let entry = DirEntry {
            name: normalize_name(&record[16..32]),
            file_type,
            length,
            blocks: padded_blocks(length),
            method: "Stored",
            savings: 0,
            blocks_now: padded_blocks(length),
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
