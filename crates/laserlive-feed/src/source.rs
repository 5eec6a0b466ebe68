//! Reading a TDF log from disk.
//!
//! Scoreboard software writes logs as UTF-16LE, usually with a BOM.
//! Logs that have been re-saved elsewhere are often UTF-8. The encoding
//! is sniffed from the first bytes; anything undecodable is replaced
//! rather than rejected.

use std::path::Path;

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Read and decode the log at `path`.
pub async fn read_log(path: &Path) -> std::io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(decode_log(&bytes))
}

/// Decode raw log bytes to text.
pub fn decode_log(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&UTF16LE_BOM) {
        return decode_utf16le(body);
    }
    if looks_like_utf16le(bytes) {
        return decode_utf16le(bytes);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

/// ASCII text in UTF-16LE has a zero high byte after the first character.
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    matches!(bytes, [first, 0, ..] if *first != 0)
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .filter_map(|pair| <[u8; 2]>::try_from(pair).ok())
        .map(u16::from_le_bytes)
        .collect();
    String::from_utf16_lossy(&units)
}
