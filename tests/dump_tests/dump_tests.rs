//! Dump Tests
//!
//! Tests for reading hex event dumps, from strings and from files on disk.

use std::fs::File;
use std::io::{BufReader, Cursor, Write};

use tempfile::NamedTempFile;
use xfixes::dump::{parse_hex_record, read_records};
use xfixes::protocol::{decode_event, EventKind};
use xfixes::{ConnectionId, XFixesError};

// =============================================================================
// Record Parsing Tests
// =============================================================================

#[test]
fn test_parse_plain_hex() {
    assert_eq!(parse_hex_record("57002a00").unwrap(), vec![0x57, 0x00, 0x2a, 0x00]);
}

#[test]
fn test_parse_with_separators() {
    let spaced = parse_hex_record("57 00 2a 00").unwrap();
    let colons = parse_hex_record("57:00:2A:00").unwrap();
    assert_eq!(spaced, colons);
}

#[test]
fn test_parse_empty() {
    assert!(parse_hex_record("").unwrap().is_empty());
}

#[test]
fn test_parse_odd_digits() {
    let result = parse_hex_record("570");
    assert!(matches!(result, Err(XFixesError::InvalidDump(_))));
}

#[test]
fn test_parse_bad_digit() {
    let result = parse_hex_record("5g");
    assert!(matches!(result, Err(XFixesError::InvalidDump(msg)) if msg.contains("'g'")));
}

#[test]
fn test_parse_sign_rejected() {
    assert!(matches!(parse_hex_record("+f 0a"), Err(XFixesError::InvalidDump(_))));
    assert!(matches!(parse_hex_record("-1 0a"), Err(XFixesError::InvalidDump(_))));
}

#[test]
fn test_read_rejects_signed_byte() {
    let err = read_records(Cursor::new("0a 0b\n+f 0a\n")).unwrap_err();
    assert!(matches!(err, XFixesError::InvalidDump(msg) if msg.starts_with("line 2:")));
}

// =============================================================================
// Reader Tests
// =============================================================================

#[test]
fn test_read_skips_comments_and_blank_lines() {
    let dump = "# capture\n\n57 00 01 00\n   \n58 00 02 00 # cursor\n";
    let records = read_records(Cursor::new(dump)).unwrap();

    assert_eq!(records, vec![vec![0x57, 0, 1, 0], vec![0x58, 0, 2, 0]]);
}

#[test]
fn test_read_reports_line_number() {
    let dump = "57 00\n# fine\n57 0\n";
    let err = read_records(Cursor::new(dump)).unwrap_err();

    match err {
        XFixesError::InvalidDump(msg) => assert!(msg.starts_with("line 3:"), "got {}", msg),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_read_from_file() {
    let mut record = [0u8; 32];
    record[0] = 87;
    record[2] = 0x2a;
    record[8..12].copy_from_slice(&0x0060_0002u32.to_ne_bytes());
    let line: Vec<String> = record.iter().map(|b| format!("{:02x}", b)).collect();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# one SelectionNotify").unwrap();
    writeln!(file, "{}", line.join(" ")).unwrap();
    file.flush().unwrap();

    let reader = BufReader::new(File::open(file.path()).unwrap());
    let records = read_records(reader).unwrap();
    assert_eq!(records.len(), 1);

    let event = decode_event(EventKind::SelectionNotify, &records[0], 42, ConnectionId::new(1)).unwrap();
    match event {
        xfixes::protocol::Event::SelectionNotify(ev) => assert_eq!(ev.owner, 0x0060_0002),
        _ => panic!("Expected SelectionNotify"),
    }
}
