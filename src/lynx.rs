//! Lynx and Ultra-Lynx walker.
//!
//! After its magic header a Lynx container is plain text: an entry count,
//! then CR-terminated fields per entry. The version decides whether the last
//! entry carries its own final-block byte count; when it does not, the last
//! length is whatever remains of the file past the directory and the earlier
//! entries.

use std::io::{Read, Seek};

use crate::bytes::normalize_name;
use crate::error::Error;
use crate::kind::{data_blocks, type_for_letter, ContainerKind};
use crate::sink::{DirEntry, DirSink, Totals};
use crate::stream::{seek_to, stream_len, TextReader};

/// Offset of the directory text inside a new-style Lynx container.
const LYNX_NEW_TEXT: u64 = 0x5F;

fn roman_digit(ch: u8) -> i32 {
    match ch.to_ascii_uppercase() {
        b'I' => 1,
        b'V' => 5,
        b'X' => 10,
        b'L' => 50,
        b'C' => 100,
        _ => 0,
    }
}

/// Decode a Roman numeral the way Lynx writes its version tags. Handles
/// subtractive pairs like IX; unknown characters contribute nothing, and
/// numerals past the supported range produce a harmless wrong answer
/// rather than failing.
fn roman_to_dec(roman: &[u8]) -> i32 {
    let mut value = 0;
    let mut last = 0;
    let mut index = 0;
    while index < roman.len() {
        let digit = roman_digit(roman[index]);
        if last < digit {
            value = digit - value;
        } else if digit > 0 {
            value += roman_to_dec(&roman[index..]);
            break;
        }
        last = digit;
        index += 1;
    }
    value
}

/// Lynx writes Roman versions, Ultra-Lynx decimal ones.
fn lynx_version(token: &[u8]) -> i32 {
    match token.first() {
        Some(first) if first.is_ascii_uppercase() => roman_to_dec(token),
        _ => {
            let mut value = 0i32;
            for &byte in token {
                if !byte.is_ascii_digit() {
                    break;
                }
                value = value.saturating_mul(10).saturating_add(i32::from(byte - b'0'));
            }
            value
        }
    }
}

pub(crate) fn walk<S: Read + Seek, V: DirSink>(
    stream: &mut S,
    kind: ContainerKind,
    totals: &mut Totals,
    sink: &mut V,
) -> Result<(), Error> {
    let file_len = stream_len(stream)?;
    let mut label = None;
    match kind {
        ContainerKind::LynxOld => seek_to(stream, 0)?,
        ContainerKind::LynxNew => seek_to(stream, LYNX_NEW_TEXT)?,
        other => return Err(Error::WrongKind(other)),
    }

    let mut text = TextReader::new(stream);
    if kind == ContainerKind::LynxOld {
        // " 1   LYNX <version> <signature>"
        text.skip_token()?;
        text.skip_ws()?;
        text.expect(b"LYNX")?;
        let version = text.token(9)?;
        text.skip_ws()?;
        text.skip_to_cr()?;
        text.consume_one()?;
        totals.version = lynx_version(&version);
    } else {
        // "<line> *<disk name> <version> <signature>"
        text.skip_token()?;
        text.skip_ws()?;
        text.expect(b"*")?;
        let name = text.token(15)?;
        let version = text.token(9)?;
        text.skip_ws()?;
        text.skip_to_cr()?;
        text.consume_one()?;
        label = Some(normalize_name(&name));
        totals.version = lynx_version(&version);
    }
    // Only old Lynx versions leave the final-block count off the last entry;
    // Ultra-Lynx always writes it.
    let expect_last_length = totals.version >= 10;
    sink.container_start(kind, label.as_deref());

    let count = text.number()?.max(0);
    text.skip_to_cr()?;
    text.skip_ws()?;

    for remaining in (0..count).rev() {
        let name = text.field(16)?;
        text.skip_to_cr()?;
        text.consume_one()?;
        let blocks = text.number()?.max(0) as u32;
        text.skip_to_cr()?;
        text.consume_one()?;
        let letter = text.letter()?;
        text.skip_to_cr()?;
        text.consume_one()?;

        let length = if remaining > 0 || expect_last_length {
            let last_block_bytes = text.number()?;
            text.skip_to_cr()?;
            text.skip_ws()?;
            ((i64::from(blocks) - 1) * 254 + last_block_bytes - 1).max(0) as u64
        } else {
            // everything past the directory and the earlier entries belongs
            // to the last file, rounded-up padding included
            let directory_bytes = ((text.position()? as i64 - 1) / 254 + 1) * 254;
            (file_len as i64 - i64::from(totals.total_blocks_now) * 254 - directory_bytes).max(0)
                as u64
        };

        let entry = DirEntry {
            name: normalize_name(&name),
            file_type: type_for_letter(letter),
            length,
            blocks,
            method: "Stored",
            savings: 0,
            blocks_now: blocks,
            checksum: None,
        };
        sink.entry(&entry);
        totals.entries += 1;
        totals.total_length += length;
        totals.total_blocks += data_blocks(length);
        totals.total_blocks_now += blocks;
    }
    Ok(())
}

#[test]
fn test_roman_numerals() {
    assert_eq!(9, roman_to_dec(b"IX"));
    assert_eq!(10, roman_to_dec(b"X"));
    assert_eq!(17, roman_to_dec(b"XVII"));
    assert_eq!(93, roman_to_dec(b"XCIII"));
    // out of the guaranteed range; must terminate without panicking
    let _ = roman_to_dec(b"MCMXCIX");
}

#[test]
fn test_version_tokens() {
    assert_eq!(17, lynx_version(b"XVII"));
    assert_eq!(12, lynx_version(b"12"));
    assert_eq!(0, lynx_version(b""));
}
