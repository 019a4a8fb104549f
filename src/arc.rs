//! ARC and self-dissolving ARC (SDA) walker.
//!
//! The four SDA variants carry a BASIC/machine-code dearcer in front of the
//! archive data; the raw variant starts with the first entry directly. The
//! first-entry offsets are fixed per variant. Entries are chained by their
//! stored block count.

use std::io::{Read, Seek};

use crate::bytes::{le_u16, le_u24, normalize_name};
use crate::error::Error;
use crate::kind::{data_blocks, savings_pct, type_for_letter, ContainerKind};
use crate::sink::{DirEntry, DirSink, Totals};
use crate::stream::{read_required, read_struct, seek_to};

/// CBM ARC compression methods, indexed by the entry type byte.
const ARC_METHODS: [&str; 8] = [
    "Stored", "Packed", "Squeezed", "Crunched", "Squashed", "?5", "?6", "?7",
];

const ENTRY_MAGIC: u8 = 2;

/// Fixed fields of an entry header; the name follows.
const ENTRY_HEADER_LEN: usize = 11;

/// Read the version word out of an SDA prelude and account for the dearcer.
fn sda_prelude<S: Read>(
    stream: &mut S,
    totals: &mut Totals,
    header_len: usize,
    first_entry: u64,
) -> Result<u64, Error> {
    let mut header = [0u8; 32];
    read_required(stream, &mut header[..header_len], "archive header")?;
    totals.version = -i32::from(le_u16(&header, 4));
    totals.dearcer_blocks = ((first_entry - 1) / 254 + 1) as u32;
    Ok(first_entry)
}

pub(crate) fn walk<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    totals: &mut Totals,
    sink: &mut V,
) -> Result<(), Error> {
    seek_to(stream, 0)?;
    let mut pos = match kind {
        ContainerKind::ArcRaw => 0,
        ContainerKind::C64Arc10 => sda_prelude(stream, totals, 22, 1016)?,
        ContainerKind::C64Arc13 => sda_prelude(stream, totals, 32, 1778)?,
        ContainerKind::C64Arc15 => sda_prelude(stream, totals, 29, 2286)?,
        ContainerKind::C128Arc15 => sda_prelude(stream, totals, 19, 2285)?,
        other => return Err(Error::WrongKind(other)),
    };
    sink.container_start(kind, None);

    seek_to(stream, pos)?;
    let mut header = [0u8; ENTRY_HEADER_LEN];
    loop {
        if !read_struct(stream, &mut header)? {
            break;
        }
        if header[0] != ENTRY_MAGIC {
            break;
        }
        let method = header[1];
        if usize::from(method) >= ARC_METHODS.len() {
            break;
        }
        let checksum = le_u16(&header, 2);
        let length = u64::from(le_u24(&header, 4));
        let stored_blocks = u32::from(header[7]);
        let name_len = usize::from(header[10]).min(16);
        let mut name = [0u8; 16];
        if !read_struct(stream, &mut name[..name_len])? {
            break;
        }

        let entry = DirEntry {
            name: normalize_name(&name[..name_len]),
            file_type: type_for_letter(header[9]),
            length,
            blocks: data_blocks(length),
            method: ARC_METHODS[usize::from(method)],
            savings: savings_pct(u64::from(stored_blocks), length / 254 + 1),
            blocks_now: stored_blocks,
            checksum: Some(checksum),
        };
        sink.entry(&entry);
        totals.entries += 1;
        totals.total_length += length;
        totals.total_blocks += data_blocks(length);
        totals.total_blocks_now += stored_blocks;

        pos += u64::from(stored_blocks) * 254;
        seek_to(stream, pos)?;
    }
    Ok(())
}
