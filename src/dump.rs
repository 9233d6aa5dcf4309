//! Event dumps
//!
//! Reads raw event records written as hex, one record per line, as captured
//! by protocol tracers. Bytes may be separated by spaces or colons; anything
//! after a `#` is a comment.
//!
//! ```text
//! # SelectionNotify, event base 87
//! 57 00 2a 00 01 00 40 00 ...
//! ```

use std::io::BufRead;

use crate::error::{Result, XFixesError};

/// Parse one hex-encoded record
pub fn parse_hex_record(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();

    // from_str_radix would accept a sign, so vet every digit first
    if let Some(bad) = digits.iter().find(|c| !c.is_ascii_hexdigit()) {
        return Err(XFixesError::InvalidDump(format!("invalid hex digit {:?}", bad)));
    }

    if digits.len() % 2 != 0 {
        return Err(XFixesError::InvalidDump(format!(
            "odd number of hex digits ({})",
            digits.len()
        )));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let byte: String = pair.iter().collect();
            u8::from_str_radix(&byte, 16)
                .map_err(|_| XFixesError::InvalidDump(format!("invalid hex byte {:?}", byte)))
        })
        .collect()
}

/// Read every record from a dump
///
/// Blank and comment-only lines are skipped. Errors name the 1-based line.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<Vec<u8>>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let record = parse_hex_record(content).map_err(|err| match err {
            XFixesError::InvalidDump(msg) => {
                XFixesError::InvalidDump(format!("line {}: {}", index + 1, msg))
            }
            other => other,
        })?;
        records.push(record);
    }

    Ok(records)
}
