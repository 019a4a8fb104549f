use std::io::Cursor;

use cbmview::{determine, dir, CollectingSink, ContainerKind, DirOptions, Error};

fn walk(data: Vec<u8>, kind: ContainerKind) -> (cbmview::Totals, CollectingSink) {
    let mut sink = CollectingSink::default();
    let totals = dir(
        &mut Cursor::new(data),
        kind,
        &DirOptions::default(),
        &mut sink,
    )
    .unwrap();
    (totals, sink)
}

// ---------------------------------------------------------------- ARC / SDA

fn push_arc_entry(buf: &mut Vec<u8>, stored_blocks: u8, length: u32, name: &[u8], letter: u8) {
    let start = buf.len();
    buf.push(2); // entry magic
    buf.push(0); // Stored
    buf.extend_from_slice(&0xBEEFu16.to_le_bytes());
    buf.extend_from_slice(&((length & 0xFFFF) as u16).to_le_bytes());
    buf.push((length >> 16) as u8);
    buf.push(stored_blocks);
    buf.push(0);
    buf.push(letter);
    buf.push(name.len() as u8);
    buf.extend_from_slice(name);
    buf.resize(start + usize::from(stored_blocks) * 254, 0);
}

#[test]
fn test_empty_raw_arc() {
    let data = vec![2u8, 0];
    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::ArcRaw, kind);
    let (totals, sink) = walk(data, kind);
    assert!(sink.entries.is_empty());
    assert_eq!(0, totals.total_blocks_now);
    assert_eq!(0, totals.entries);
}

#[test]
fn test_raw_arc_three_entries() {
    let mut data = Vec::new();
    push_arc_entry(&mut data, 2, 400, b"FIRST", b'P');
    push_arc_entry(&mut data, 3, 600, b"SECOND", b'S');
    push_arc_entry(&mut data, 5, 1100, b"THIRD", b'P');
    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::ArcRaw, kind);

    let (totals, sink) = walk(data, kind);
    assert_eq!(3, totals.entries);
    assert_eq!(10, totals.total_blocks_now);
    assert_eq!(400 + 600 + 1100, totals.total_length);
    assert_eq!(2 + 3 + 5, totals.total_blocks);
    assert_eq!("FIRST", sink.entries[0].name);
    assert_eq!("PRG", sink.entries[0].file_type);
    assert_eq!("Stored", sink.entries[0].method);
    assert_eq!(Some(0xBEEF), sink.entries[0].checksum);
    assert_eq!(2, sink.entries[0].blocks);
}

#[test]
fn test_sda_c64_v10() {
    let mut data = vec![0u8; 1016];
    data[0] = 0x01; // load address 0x0801
    data[1] = 0x08;
    data[4] = 10; // version 1.0
    data[6..16].copy_from_slice(&[0x9E, b'(', b'2', b'0', b'6', b'3', b')', 0, 0, 0]);
    data[18..21].copy_from_slice(&[0x85, 0xFD, 0xA9]);
    push_arc_entry(&mut data, 2, 300, b"PACKED FILE", b'P');

    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::C64Arc10, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(-10, totals.version);
    assert_eq!(4, totals.dearcer_blocks);
    assert_eq!(1, totals.entries);
    assert_eq!("PACKED FILE", sink.entries[0].name);
}

// --------------------------------------------------------------------- LHA

#[test]
fn test_lha_raw_single_stored_entry() {
    let mut data = Vec::new();
    data.push(23); // head size: 20 fixed + name + crc
    data.push(0); // head checksum, unchecked
    data.extend_from_slice(b"-lh0-");
    data.extend_from_slice(&100u32.to_le_bytes()); // packed
    data.extend_from_slice(&100u32.to_le_bytes()); // original
    data.extend_from_slice(&0u32.to_le_bytes()); // DOS time
    data.extend_from_slice(&0u16.to_le_bytes()); // attributes
    data.push(1); // name length
    data.push(b'A');
    data.extend_from_slice(&0xABCDu16.to_le_bytes()); // crc
    data.resize(data.len() + 100, 0); // stored payload

    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::LhaRaw, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(1, totals.entries);
    let entry = &sink.entries[0];
    assert_eq!("A", entry.name);
    assert_eq!("   ", entry.file_type);
    assert_eq!(100, entry.length);
    assert_eq!(1, entry.blocks);
    assert_eq!("Stored", entry.method);
    assert_eq!(0, entry.savings);
    assert_eq!(Some(0xABCD), entry.checksum);
}

#[test]
fn test_lha_zero_length_entry() {
    let mut data = Vec::new();
    data.push(24);
    data.push(0);
    data.extend_from_slice(b"-lh5-");
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.push(2);
    data.extend_from_slice(&[0, b'S']); // NUL + type letter
    data.extend_from_slice(&0u16.to_le_bytes());

    let (totals, sink) = walk(data, ContainerKind::LhaRaw);
    let entry = &sink.entries[0];
    assert_eq!("SEQ", entry.file_type);
    assert_eq!(0, entry.length);
    assert_eq!(0, entry.blocks);
    assert_eq!(100, entry.savings);
    assert_eq!(0, totals.total_blocks);
}

// --------------------------------------------------------------------- T64

#[test]
fn test_t64_two_entries() {
    let mut data = vec![0u8; 64];
    data[..19].copy_from_slice(b"C64 tape image file");
    data[32] = 0; // minor
    data[33] = 1; // major
    data[34..36].copy_from_slice(&2u16.to_le_bytes()); // slots
    data[36..38].copy_from_slice(&2u16.to_le_bytes()); // used
    data[40..47].copy_from_slice(b"MY TAPE");
    for (index, (start, end)) in [(1000u16, 2000u16), (3000, 4000)].iter().enumerate() {
        let mut entry = [0u8; 32];
        entry[0] = 1;
        entry[1] = 0x82; // closed PRG
        entry[2..4].copy_from_slice(&start.to_le_bytes());
        entry[4..6].copy_from_slice(&end.to_le_bytes());
        entry[8..12].copy_from_slice(&1024u32.to_le_bytes());
        entry[16..16 + 7].copy_from_slice(b"ENTRY  ");
        entry[23] = b'0' + index as u8;
        data.extend_from_slice(&entry);
    }

    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::T64, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(-10, totals.version);
    assert_eq!(
        Some((ContainerKind::T64, Some("MY TAPE".to_owned()))),
        sink.containers.first().cloned()
    );
    assert_eq!(2, totals.entries);
    assert_eq!(1002, sink.entries[0].length);
    assert_eq!(1002, sink.entries[1].length);
    assert_eq!("PRG", sink.entries[0].file_type);
    assert_eq!(2004, totals.total_length);
    assert_eq!(totals.total_blocks, totals.total_blocks_now);
}

// -------------------------------------------------------------------- Lynx

#[test]
fn test_lynx_old_residual_last_entry() {
    let mut text = Vec::new();
    text.extend_from_slice(b" 1   LYNX IX  BY SOMEBODY\r");
    text.extend_from_slice(b" 3  ENTRIES\r");
    text.extend_from_slice(b"FILE ONE\r 3\rP\r 100\r");
    text.extend_from_slice(b"FILE TWO\r 2\rS\r 50\r");
    text.extend_from_slice(b"FILE THREE\r 5\rP\r");
    let directory_blocks = text.len().div_ceil(254);
    let total_len = (directory_blocks + 3 + 2 + 5) * 254;
    let mut data = text;
    data.resize(total_len, 0);

    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::LynxOld, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(9, totals.version);
    assert_eq!(3, totals.entries);
    assert_eq!((3 - 1) * 254 + 100 - 1, sink.entries[0].length);
    assert_eq!((2 - 1) * 254 + 50 - 1, sink.entries[1].length);
    // the last entry eats the rest of the file exactly
    assert_eq!(5 * 254, sink.entries[2].length);
    assert_eq!("FILE THREE", sink.entries[2].name);
    assert_eq!(3 + 2 + 5, totals.total_blocks_now);
    assert_eq!(3 + 2 + 5, totals.total_blocks);
}

#[test]
fn test_lynx_new_ultra_decimal_version() {
    let mut data = vec![0u8; 0x5F];
    data.extend_from_slice(b" 10  *WORKDISK 12  ULTRA-LYNX\r");
    data.extend_from_slice(b" 1\r");
    data.extend_from_slice(b"ONLY FILE\r 2\rP\r 200\r");

    let (totals, sink) = walk(data, ContainerKind::LynxNew);
    assert_eq!(12, totals.version);
    assert_eq!(
        Some((ContainerKind::LynxNew, Some("WORKDISK".to_owned()))),
        sink.containers.first().cloned()
    );
    // version >= 10: even the last entry carries its final-block count
    assert_eq!(254 + 200 - 1, sink.entries[0].length);
    assert_eq!(2, sink.entries[0].blocks);
}

// --------------------------------------------------------------- P00 / N64

#[test]
fn test_p00_length() {
    let mut data = Vec::new();
    data.extend_from_slice(b"C64File\0");
    let mut name = [0u8; 17];
    name[..8].copy_from_slice(b"DOCUMENT");
    data.extend_from_slice(&name);
    data.push(0); // record size
    data.resize(50, 0xEE);

    let kind = determine(&mut Cursor::new(data.clone()), Some("document.p00")).unwrap();
    assert_eq!(ContainerKind::P00, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(1, totals.entries);
    assert_eq!(24, sink.entries[0].length);
    assert_eq!("PRG", sink.entries[0].file_type);
    assert_eq!("DOCUMENT", sink.entries[0].name);
    assert_eq!(1, totals.total_blocks);
}

#[test]
fn test_n64_header_length() {
    let mut data = Vec::new();
    data.extend_from_slice(b"C64\x01");
    let mut header = [0u8; 43];
    header[0] = 0x82; // PRG
    header[1..3].copy_from_slice(&0x0801u16.to_le_bytes());
    header[3..7].copy_from_slice(&1000u32.to_le_bytes());
    header[27..34].copy_from_slice(b"NETFILE");
    data.extend_from_slice(&header);
    data.resize(data.len() + 1000, 0);

    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::N64, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!("NETFILE", sink.entries[0].name);
    assert_eq!("PRG", sink.entries[0].file_type);
    assert_eq!(1000, sink.entries[0].length);
    assert_eq!(1000 / 254 + 1, u64::from(totals.total_blocks));
}

#[test]
fn test_lbr_text_directory() {
    let data = b"DWB 2\rFIRST FILE\rP\r 100\rSECOND\rS\r 300\r".to_vec();
    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::Lbr, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(2, totals.entries);
    assert_eq!("FIRST FILE", sink.entries[0].name);
    assert_eq!("PRG", sink.entries[0].file_type);
    assert_eq!(100, sink.entries[0].length);
    assert_eq!("SEQ", sink.entries[1].file_type);
    assert_eq!(300, sink.entries[1].length);
    assert_eq!(1 + 2, totals.total_blocks);
}

// ------------------------------------------------------------- disk images

const D64_1541_LEN: usize = 174_848;

fn blank_1541() -> Vec<u8> {
    let mut data = vec![0u8; D64_1541_LEN];
    let header = 357 * 256; // track 18 sector 0
    data[header] = 18; // first directory sector
    data[header + 1] = 1;
    data[header + 2] = b'A';
    data[header + 3] = 0;
    data[header + 144..header + 152].copy_from_slice(b"TESTDISK");
    for offset in 152..160 {
        data[header + offset] = 0xA0;
    }
    data[header + 167] = 0xA0;
    data
}

fn put_dir_entry(data: &mut Vec<u8>, slot: usize, name: &[u8], track: u8, sector: u8, blocks: u16) {
    let dir = 358 * 256; // track 18 sector 1
    let record = dir + 2 + slot * 32;
    data[record] = 0x82; // closed PRG
    data[record + 1] = track;
    data[record + 2] = sector;
    for offset in 0..16 {
        data[record + 3 + offset] = *name.get(offset).unwrap_or(&0xA0);
    }
    data[record + 28..record + 30].copy_from_slice(&blocks.to_le_bytes());
}

fn chain(data: &mut Vec<u8>, track: u8, sector: u8, next_track: u8, next_sector: u8) {
    let offsets = [
        0u16, 21, 42, 63, 84, 105, 126, 147, 168, 189, 210, 231, 252, 273, 294, 315, 336, 357,
    ];
    let offset = usize::from(offsets[usize::from(track) - 1] + u16::from(sector)) * 256;
    data[offset] = next_track;
    data[offset + 1] = next_sector;
}

#[test]
fn test_d64_1541_chained_file() {
    let mut data = blank_1541();
    put_dir_entry(&mut data, 0, b"HELLO", 1, 2, 5);
    chain(&mut data, 1, 2, 1, 3);
    chain(&mut data, 1, 3, 1, 4);
    chain(&mut data, 1, 4, 1, 5);
    chain(&mut data, 1, 5, 1, 6);
    chain(&mut data, 1, 6, 0, 17);

    let kind = determine(&mut Cursor::new(data.clone()), Some("image.d64")).unwrap();
    assert_eq!(ContainerKind::D64, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(
        Some((ContainerKind::D64, Some("TESTDISK".to_owned()))),
        sink.containers.first().cloned()
    );
    let entry = &sink.entries[0];
    assert_eq!("HELLO", entry.name);
    assert_eq!("PRG", entry.file_type);
    assert_eq!(4 * 254 + 17 - 1, entry.length);
    assert_eq!(5, entry.blocks);
    assert_eq!(1, totals.entries);
    assert_eq!(5, totals.total_blocks);
}

#[test]
fn test_d64_chain_loop_reports_zero_length() {
    let mut data = blank_1541();
    put_dir_entry(&mut data, 0, b"LOOPY", 17, 0, 3);
    chain(&mut data, 17, 0, 17, 0); // self loop
    put_dir_entry(&mut data, 1, b"GOOD", 1, 2, 1);
    chain(&mut data, 1, 2, 0, 100);

    let (totals, sink) = walk(data, ContainerKind::D64);
    assert_eq!(2, totals.entries);
    assert_eq!(0, sink.entries[0].length);
    // the walk keeps going after the bad chain
    assert_eq!(99, sink.entries[1].length);
    assert_eq!(4, totals.total_blocks);
}

#[test]
fn test_d64_without_chain_lengths() {
    let mut data = blank_1541();
    put_dir_entry(&mut data, 0, b"HELLO", 1, 2, 5);
    chain(&mut data, 1, 2, 0, 17);

    let mut sink = CollectingSink::default();
    let totals = dir(
        &mut Cursor::new(data),
        ContainerKind::D64,
        &DirOptions {
            precise_lengths: false,
        },
        &mut sink,
    )
    .unwrap();
    assert_eq!(0, sink.entries[0].length);
    assert_eq!(5, sink.entries[0].blocks);
    assert_eq!(5, totals.total_blocks);
}

#[test]
fn test_d64_garbage_is_unsupported() {
    let data = vec![0u8; D64_1541_LEN];
    let err = dir(
        &mut Cursor::new(data),
        ContainerKind::D64,
        &DirOptions::default(),
        &mut CollectingSink::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedImage));
    assert_eq!(3, err.status());
}

#[test]
fn test_x64_1581_image() {
    let mut data = vec![0u8; 64 + 819_200];
    data[..4].copy_from_slice(&[0x43, 0x15, 0x41, 0x64]);
    data[4] = 1; // major
    data[5] = 20; // minor
    data[6] = 8; // 1581
    let header = 64 + (40 - 1) * 40 * 256; // track 40 sector 0
    data[header] = 40; // first directory sector
    data[header + 1] = 3;
    data[header + 2] = b'D';
    data[header + 3] = 0;
    data[header + 4..header + 11].copy_from_slice(b"BIGDISK");
    for offset in 11..20 {
        data[header + offset] = 0xA0;
    }
    data[header + 27] = 0xA0;
    data[header + 28] = 0xA0;
    // directory at track 40 sector 3
    let dir_block = header + 3 * 256;
    let record = dir_block + 2;
    data[record] = 0x85; // closed CBM partition
    data[record + 1] = 1;
    data[record + 2] = 0;
    data[record + 3..record + 12].copy_from_slice(b"PARTITION");
    for offset in 12..16 {
        data[record + 3 + offset] = 0xA0;
    }
    data[record + 28..record + 30].copy_from_slice(&10u16.to_le_bytes());

    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::X64, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(-12, totals.version); // 1.20 reads as 1.2
    let entry = &sink.entries[0];
    assert_eq!("PARTITION", entry.name);
    assert_eq!("CBM", entry.file_type);
    // partitions are raw sectors, not chained data blocks
    assert_eq!(10 * 256, entry.length);
}

#[test]
fn test_x64_unknown_device() {
    let mut data = vec![0u8; 1024];
    data[..4].copy_from_slice(&[0x43, 0x15, 0x41, 0x64]);
    data[6] = 9;
    let err = dir(
        &mut Cursor::new(data),
        ContainerKind::X64,
        &DirOptions::default(),
        &mut CollectingSink::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedDevice(9)));
    assert_eq!(3, err.status());
}

// --------------------------------------------------------------------- TAP

const SHORT: u8 = 0x30;
const LONG: u8 = 0x42;
const MARK: u8 = 0x56;

fn tap_sync(pulses: &mut Vec<u8>) {
    for _ in 0..60 {
        pulses.push(SHORT);
    }
}

fn tap_bit(pulses: &mut Vec<u8>, bit: u8) {
    if bit == 0 {
        pulses.push(SHORT);
        pulses.push(LONG);
    } else {
        pulses.push(LONG);
        pulses.push(SHORT);
    }
}

fn tap_byte(pulses: &mut Vec<u8>, byte: u8) {
    pulses.push(MARK);
    pulses.push(LONG);
    for bit_index in 0..8 {
        tap_bit(pulses, (byte >> bit_index) & 1);
    }
    // data plus parity carries an odd number of one bits
    tap_bit(pulses, u8::from(byte.count_ones() % 2 == 0));
}

fn tap_gap(pulses: &mut Vec<u8>) {
    pulses.push(MARK);
    pulses.push(SHORT);
}

fn tap_copy(pulses: &mut Vec<u8>, payload: &[u8], second: bool) {
    tap_sync(pulses);
    for index in 0..9 {
        let base = if second { 0x09 } else { 0x89 };
        tap_byte(pulses, base - index);
    }
    for &byte in payload {
        tap_byte(pulses, byte);
    }
    tap_gap(pulses);
}

/// Payload of a header record: kind, addresses, name, body, checksum.
fn header_payload(kind: u8, start: u16, end: u16, name: &[u8]) -> Vec<u8> {
    let mut payload = vec![0u8; 193];
    payload[0] = kind;
    payload[1..3].copy_from_slice(&start.to_le_bytes());
    payload[3..5].copy_from_slice(&end.to_le_bytes());
    for offset in 0..16 {
        payload[5 + offset] = *name.get(offset).unwrap_or(&0x20);
    }
    let checksum = payload[..192].iter().fold(0u8, |check, &byte| check ^ byte);
    payload[192] = checksum;
    payload
}

#[test]
fn test_tap_single_prg() {
    let mut pulses = Vec::new();
    let header = header_payload(1, 0x0801, 0x0805, b"FOO");
    tap_copy(&mut pulses, &header, false);
    tap_copy(&mut pulses, &header, true);
    // program payload, contents irrelevant
    tap_copy(&mut pulses, &[0x11, 0x22, 0x33, 0x44], false);
    tap_copy(&mut pulses, &[0x11, 0x22, 0x33, 0x44], true);
    // end-of-tape marker, minimal body
    tap_copy(&mut pulses, &[5, 5], false);

    let mut data = Vec::new();
    data.extend_from_slice(b"C64-TAPE-RAW");
    data.extend_from_slice(&[1, 0, 0, 0]);
    data.extend_from_slice(&(pulses.len() as u32).to_le_bytes());
    data.extend_from_slice(&pulses);

    let kind = determine(&mut Cursor::new(data.clone()), None).unwrap();
    assert_eq!(ContainerKind::Tap, kind);
    let (totals, sink) = walk(data, kind);
    assert_eq!(1, totals.version);
    assert_eq!(1, totals.entries);
    let entry = &sink.entries[0];
    assert_eq!("FOO", entry.name);
    assert_eq!("PRG", entry.file_type);
    assert_eq!(4, entry.length);
}

#[test]
fn test_tap_seq_sizes_accumulate() {
    let mut pulses = Vec::new();
    let head = header_payload(4, 0, 0, b"NOTES");
    tap_copy(&mut pulses, &head, false);
    tap_copy(&mut pulses, &head, true);
    // two full data records of 202 bytes each contribute 191 bytes apiece
    let mut record = vec![2u8];
    record.resize(192, 0x41);
    let checksum = record.iter().fold(0u8, |check, &byte| check ^ byte);
    record.push(checksum);
    for _ in 0..2 {
        tap_copy(&mut pulses, &record, false);
        tap_copy(&mut pulses, &record, true);
    }
    tap_copy(&mut pulses, &[5, 5], false);

    let mut data = Vec::new();
    data.extend_from_slice(b"C64-TAPE-RAW");
    data.extend_from_slice(&[0, 0, 0, 0]);
    data.extend_from_slice(&(pulses.len() as u32).to_le_bytes());
    data.extend_from_slice(&pulses);

    let (totals, sink) = walk(data, ContainerKind::Tap);
    assert_eq!(0, totals.version);
    assert_eq!(1, totals.entries);
    let entry = &sink.entries[0];
    assert_eq!("NOTES", entry.name);
    assert_eq!("SEQ", entry.file_type);
    assert_eq!(2 * 191, entry.length);
}

#[test]
fn test_tap_bad_version() {
    let mut data = Vec::new();
    data.extend_from_slice(b"C64-TAPE-RAW");
    data.extend_from_slice(&[2, 0, 0, 0]);
    data.extend_from_slice(&0u32.to_le_bytes());
    let err = dir(
        &mut Cursor::new(data),
        ContainerKind::Tap,
        &DirOptions::default(),
        &mut CollectingSink::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::TapeVersion(2)));
    assert_eq!(2, err.status());
}

// ------------------------------------------------------------------ facade

#[test]
fn test_unknown_kind_is_rejected() {
    let err = dir(
        &mut Cursor::new(vec![0u8; 16]),
        ContainerKind::Unknown,
        &DirOptions::default(),
        &mut CollectingSink::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnknownKind));
    assert_eq!(3, err.status());
}

#[test]
fn test_mismatched_kind_is_status_two() {
    // ARC bytes walked as a Lynx directory fail the text parse
    let mut data = vec![2u8, 0];
    data.resize(64, 0);
    let err = dir(
        &mut Cursor::new(data),
        ContainerKind::LynxOld,
        &DirOptions::default(),
        &mut CollectingSink::default(),
    )
    .unwrap_err();
    assert_eq!(2, err.status());
}

#[test]
fn test_totals_match_entry_sums() {
    let mut data = Vec::new();
    push_arc_entry(&mut data, 2, 400, b"ONE", b'P');
    push_arc_entry(&mut data, 4, 900, b"TWO", b'S');
    let (totals, sink) = walk(data, ContainerKind::ArcRaw);
    assert_eq!(
        totals.total_length,
        sink.entries.iter().map(|entry| entry.length).sum::<u64>()
    );
    assert_eq!(
        totals.total_blocks,
        sink.entries.iter().map(|entry| entry.blocks).sum::<u32>()
    );
}
