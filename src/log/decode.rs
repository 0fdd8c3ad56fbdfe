//! Byte-to-text decoding for log files.
//!
//! Logs redirected from some shells are written as UTF-16 with a byte
//! order mark, so the BOM decides the encoding. Without a BOM the bytes
//! must be valid UTF-8.

use std::path::Path;

use crate::core::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decodes raw log bytes. `path` is only used for error messages.
pub fn decode(path: &Path, bytes: Vec<u8>) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return std::str::from_utf8(rest)
            .map(str::to_string)
            .map_err(|e| Error::decode(path, e.to_string()));
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(path, rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(path, rest, u16::from_be_bytes);
    }
    String::from_utf8(bytes).map_err(|e| Error::decode(path, e.to_string()))
}

fn decode_utf16(path: &Path, bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::decode(path, "truncated UTF-16 data (odd byte count)"));
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::decode(path, format!("invalid UTF-16: {e}")))
}
