//! ARC archive: a chain of variable-size member headers, each tagged with a one-byte compression
//! method, terminated by a header whose method byte is 0.
//!
//! Directory walking follows the same little-endian fixed-field parsing idiom as `lbr`; member
//! decompression dispatches into `squeeze`/`crunch` by synthesizing the small in-memory header
//! those modules expect, since ARC embeds its members' filenames in its own header rather than
//! repeating the `0x76xx`-magic header format used by standalone compressed files.

use crate::error::{DecodeResult, Error};
use crate::{crunch, squeeze};

const MARKER: u8 = 0x1A;
const NAME_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcMethod {
    StoredNoSize,
    Stored,
    Packed,
    Squeezed,
    Crunched,
    Squashed,
}

impl ArcMethod {
    fn from_byte(b: u8) -> DecodeResult<Self> {
        Ok(match b {
            1 => ArcMethod::StoredNoSize,
            2 => ArcMethod::Stored,
            3 => ArcMethod::Packed,
            4 => ArcMethod::Squeezed,
            8 => ArcMethod::Crunched,
            9 => ArcMethod::Squashed,
            other => return Err(Error::InvalidArchive(format!("unrecognized ARC method byte {other}"))),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArcMethod::StoredNoSize => "stored",
            ArcMethod::Stored => "stored",
            ArcMethod::Packed => "packed",
            ArcMethod::Squeezed => "squeezed",
            ArcMethod::Crunched => "crunched",
            ArcMethod::Squashed => "squashed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArcEntry {
    pub method: ArcMethod,
    pub filename: String,
    pub compressed_size: u32,
    pub original_size: u32,
    payload_offset: usize,
}

fn read_entry(data: &[u8], pos: usize) -> DecodeResult<Option<(ArcEntry, usize)>> {
    if pos >= data.len() || data[pos] != MARKER {
        return Err(Error::InvalidArchive("missing 0x1A marker at chained header".into()));
    }
    let method_byte = *data.get(pos + 1).ok_or(Error::TruncatedHeader)?;
    if method_byte == 0 {
        return Ok(None);
    }
    let method = ArcMethod::from_byte(method_byte)?;
    let name_start = pos + 2;
    let name_raw = data.get(name_start..name_start + NAME_LEN).ok_or(Error::TruncatedHeader)?;
    let end = name_raw.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
    let filename = String::from_utf8_lossy(&name_raw[..end]).into_owned();

    let mut p = name_start + NAME_LEN;
    let compressed_size = u32::from_le_bytes(
        data.get(p..p + 4).ok_or(Error::TruncatedHeader)?.try_into().unwrap(),
    );
    p += 4;
    let _date = u16::from_le_bytes(data.get(p..p + 2).ok_or(Error::TruncatedHeader)?.try_into().unwrap());
    p += 2;
    let _time = u16::from_le_bytes(data.get(p..p + 2).ok_or(Error::TruncatedHeader)?.try_into().unwrap());
    p += 2;
    let _crc = u16::from_le_bytes(data.get(p..p + 2).ok_or(Error::TruncatedHeader)?.try_into().unwrap());
    p += 2;

    let original_size = if method == ArcMethod::StoredNoSize {
        compressed_size
    } else {
        let v = u32::from_le_bytes(data.get(p..p + 4).ok_or(Error::TruncatedHeader)?.try_into().unwrap());
        p += 4;
        v
    };

    let payload_offset = p;
    let next_header = payload_offset + compressed_size as usize;
    if next_header > data.len() {
        return Err(Error::InvalidArchive(format!("member {filename} payload extends past end of file")));
    }
    Ok(Some((
        ArcEntry { method, filename, compressed_size, original_size, payload_offset },
        next_header,
    )))
}

/// List every member header in an ARC archive, stopping at the method==0 sentinel.
pub fn list_arc(data: &[u8]) -> DecodeResult<Vec<ArcEntry>> {
    let mut entries = Vec::new();
    let mut pos = 0;
    loop {
        match read_entry(data, pos)? {
            None => break,
            Some((entry, next)) => {
                pos = next;
                entries.push(entry);
            }
        }
    }
    Ok(entries)
}

/// Extract and (if necessary) decompress one member's payload.
pub fn extract_arc_member(data: &[u8], entry: &ArcEntry) -> DecodeResult<Vec<u8>> {
    let payload = data
        .get(entry.payload_offset..entry.payload_offset + entry.compressed_size as usize)
        .ok_or_else(|| Error::InvalidArchive(format!("member {} out of bounds", entry.filename)))?;
    match entry.method {
        ArcMethod::StoredNoSize | ArcMethod::Stored => Ok(payload.to_vec()),
        ArcMethod::Packed => Err(Error::InvalidArchive(format!(
            "member {}: RLE 'packed' method is not a supported codec",
            entry.filename
        ))),
        ArcMethod::Squeezed => squeeze::unsqueeze(&synth_squeeze_header(entry, payload)),
        ArcMethod::Crunched => crunch::uncrunch(&synth_crunch_header(entry, payload)),
        ArcMethod::Squashed => Err(Error::InvalidArchive(format!(
            "member {}: LZW 'squashed' method (ARC method 9) is not a supported codec",
            entry.filename
        ))),
    }
}

/// ARC-embedded Squeeze/Crunch payloads omit the standalone-file header (magic + filename); the
/// member's own ARC header already carries the filename, so this builds the small header the
/// shared decoders expect without re-deriving a checksum or version byte ARC never stored.
fn synth_squeeze_header(entry: &ArcEntry, payload: &[u8]) -> Vec<u8> {
    let mut h = vec![0x76, 0xFF];
    h.extend_from_slice(&0u16.to_le_bytes());
    h.extend_from_slice(entry.filename.as_bytes());
    h.push(0);
    h.extend_from_slice(payload);
    h
}

fn synth_crunch_header(entry: &ArcEntry, payload: &[u8]) -> Vec<u8> {
    let mut h = vec![0x76, 0xFE];
    h.extend_from_slice(entry.filename.as_bytes());
    h.push(0);
    h.extend_from_slice(&[2, 0, 0, 0]); // assume v2 semantics; ARC does not record a version byte
    h.extend_from_slice(payload);
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_header(name: &str, data: &[u8]) -> Vec<u8> {
        let mut h = vec![MARKER, 2];
        let mut name_field = [0u8; NAME_LEN];
        name_field[..name.len()].copy_from_slice(name.as_bytes());
        h.extend_from_slice(&name_field);
        h.extend_from_slice(&(data.len() as u32).to_le_bytes());
        h.extend_from_slice(&0u16.to_le_bytes());
        h.extend_from_slice(&0u16.to_le_bytes());
        h.extend_from_slice(&0u16.to_le_bytes());
        h.extend_from_slice(&(data.len() as u32).to_le_bytes());
        h.extend_from_slice(data);
        h
    }

    #[test]
    fn lists_single_stored_member() {
        let mut data = stored_header("HELLO.TXT", b"hello world");
        data.push(MARKER); // terminator header: marker followed by method byte 0
        data.push(0);
        let entries = list_arc(&data).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename, "HELLO.TXT");
        assert_eq!(entries[0].method, ArcMethod::Stored);
        assert_eq!(entries[0].original_size, 11);
    }

    #[test]
    fn extracts_stored_payload_verbatim() {
        let mut data = stored_header("A.TXT", b"payload-bytes");
        data.push(MARKER);
        data.push(0);
        let entries = list_arc(&data).unwrap();
        let out = extract_arc_member(&data, &entries[0]).unwrap();
        assert_eq!(out, b"payload-bytes");
    }

    #[test]
    fn unknown_method_byte_is_rejected() {
        let mut h = vec![MARKER, 77];
        h.extend_from_slice(&[0u8; NAME_LEN]);
        assert!(matches!(list_arc(&h), Err(Error::InvalidArchive(_))));
    }
}
