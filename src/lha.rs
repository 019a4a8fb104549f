//! LHA and LHA-SFX walker.
//!
//! Entries are level-0 LHA headers; the walk stops as soon as the `-lh`
//! method id is missing, which also covers trailing junk. The SFX variant
//! puts a machine-language self-extractor in front of the first entry.

use std::io::{Read, Seek};

use crate::bytes::{le_u32, normalize_name};
use crate::error::Error;
use crate::kind::{data_blocks, savings_pct, type_for_letter, ContainerKind};
use crate::sink::{DirEntry, DirSink, Totals};
use crate::stream::{read_struct, seek_to};

/// Fixed entry header: head size, head checksum, `-lh`, method digit, `-`,
/// packed size, original size, DOS time, attributes, name length.
const ENTRY_HEADER_LEN: usize = 22;
const _: () = assert!(ENTRY_HEADER_LEN == 1 + 1 + 3 + 1 + 1 + 4 + 4 + 4 + 2 + 1);

const HEAD_ID: &[u8; 3] = b"-lh";

/// First entry offset behind the SFX dearcer.
const SFX_FIRST_ENTRY: u64 = 0xE89;

/// Name plus the 16-bit CRC trailer must fit here or the walk stops.
const NAME_BUF_LEN: usize = 64;

const LHA_METHODS: [&str; 12] = [
    "Stored", "lh1", "lh2", "lh3", "lh4", "lh5", "lh6", "lh7", "lh8", "lh9", "lhA", "lhB",
];

fn method_tag(digit: u8) -> &'static str {
    let index = match digit {
        b'0'..=b'9' => usize::from(digit - b'0'),
        b'A'..=b'B' => usize::from(digit - b'A') + 10,
        _ => return "???",
    };
    LHA_METHODS[index]
}

pub(crate) fn walk<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    totals: &mut Totals,
    sink: &mut V,
) -> Result<(), Error> {
    let mut pos = match kind {
        ContainerKind::LhaSfx => {
            totals.dearcer_blocks = ((SFX_FIRST_ENTRY - 1) / 254 + 1) as u32;
            SFX_FIRST_ENTRY
        }
        ContainerKind::LhaRaw => 0,
        other => return Err(Error::WrongKind(other)),
    };
    sink.container_start(kind, None);

    seek_to(stream, pos)?;
    let mut header = [0u8; ENTRY_HEADER_LEN];
    loop {
        if !read_struct(stream, &mut header)? {
            break;
        }
        if &header[2..5] != HEAD_ID {
            break;
        }
        let head_size = u64::from(header[0]);
        let packed = u64::from(le_u32(&header, 7));
        let original = u64::from(le_u32(&header, 11));
        let name_len = usize::from(header[21]);
        if name_len + 2 > NAME_BUF_LEN {
            break;
        }
        let mut name = [0u8; NAME_BUF_LEN];
        if !read_struct(stream, &mut name[..name_len + 2])? {
            log::debug!("archive ends inside an entry name");
            break;
        }
        // C64 LHA entries keep the CBM type letter behind a NUL at the end
        // of the name; anything else displays as untyped.
        let type_letter = if name_len >= 2 && name[name_len - 2] == 0 {
            name[name_len - 1]
        } else {
            b' '
        };
        let crc = u16::from(name[name_len]) | u16::from(name[name_len + 1]) << 8;

        let entry = DirEntry {
            name: normalize_name(&name[..name_len]),
            file_type: type_for_letter(type_letter),
            length: original,
            blocks: if original != 0 { data_blocks(original) } else { 0 },
            method: method_tag(header[5]),
            savings: if original != 0 {
                savings_pct(packed, original)
            } else {
                100
            },
            blocks_now: if packed != 0 { data_blocks(packed) } else { 0 },
            checksum: Some(crc),
        };
        sink.entry(&entry);
        totals.entries += 1;
        totals.total_length += original;
        totals.total_blocks += entry.blocks;
        totals.total_blocks_now += entry.blocks_now;

        pos += head_size + packed + 2;
        seek_to(stream, pos)?;
    }
    Ok(())
}

#[test]
fn test_method_tags() {
    assert_eq!("Stored", method_tag(b'0'));
    assert_eq!("lh5", method_tag(b'5'));
    assert_eq!("lhB", method_tag(b'B'));
    assert_eq!("???", method_tag(b'z'));
}
