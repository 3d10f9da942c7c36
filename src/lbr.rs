//! LBR library archive: an uncompressed concatenation of members preceded by a fixed-format
//! 32-byte-per-entry directory occupying sector 0 (and possibly more).
//!
//! Grounded on the fixed-record header parsing style used throughout this crate's format headers
//! (little-endian multi-byte fields read with `u16::from_le_bytes`, as in `direct_ports::lzhuf`'s
//! 4-byte length header) generalized to a whole directory table.

use crate::error::{DecodeResult, Error};

const SECTOR_SIZE: usize = 128;
const ENTRY_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Active,
    Deleted,
    Unused,
}

#[derive(Debug, Clone)]
pub struct LbrEntry {
    pub status: EntryStatus,
    pub filename: String,
    pub start_sector: u16,
    pub sector_length: u16,
    pub pad_count: u8,
}

impl LbrEntry {
    pub fn byte_offset(&self) -> usize {
        self.start_sector as usize * SECTOR_SIZE
    }

    pub fn byte_length(&self) -> usize {
        (self.sector_length as usize * SECTOR_SIZE).saturating_sub(self.pad_count as usize)
    }
}

fn trim_field(field: &[u8]) -> String {
    String::from_utf8_lossy(field).trim_end().to_string()
}

fn parse_entry(raw: &[u8]) -> DecodeResult<LbrEntry> {
    if raw.len() < ENTRY_SIZE {
        return Err(Error::TruncatedHeader);
    }
    let status_byte = raw[0];
    let name = trim_field(&raw[1..9]);
    let ext = trim_field(&raw[9..12]);
    let start_sector = u16::from_le_bytes([raw[12], raw[13]]);
    let sector_length = u16::from_le_bytes([raw[14], raw[15]]);
    let pad_count = raw[25];

    let status = match status_byte {
        0x00 => EntryStatus::Active,
        0xFE => EntryStatus::Deleted,
        0xFF => EntryStatus::Unused,
        other => return Err(Error::InvalidArchive(format!("unrecognized LBR status byte {other:#04x}"))),
    };
    let filename = if ext.is_empty() { name } else { format!("{name}.{ext}") };
    Ok(LbrEntry { status, filename, start_sector, sector_length, pad_count })
}

/// List the active members of an LBR archive. The first directory slot is always the directory
/// header itself (sector 0, whose length gives the directory's own sector count) and is never
/// reported as a member, regardless of what its status byte happens to contain.
pub fn list_lbr(data: &[u8]) -> DecodeResult<Vec<LbrEntry>> {
    if data.len() < ENTRY_SIZE {
        return Err(Error::TruncatedHeader);
    }
    let dir_header = parse_entry(&data[0..ENTRY_SIZE])?;
    let dir_sectors = dir_header.sector_length.max(1) as usize;
    let dir_bytes = dir_sectors * SECTOR_SIZE;
    if dir_bytes > data.len() {
        return Err(Error::InvalidArchive("directory extends past end of file".into()));
    }

    let mut entries = Vec::new();
    let mut pos = ENTRY_SIZE;
    while pos + ENTRY_SIZE <= dir_bytes {
        let entry = parse_entry(&data[pos..pos + ENTRY_SIZE])?;
        if entry.status == EntryStatus::Active && !entry.filename.is_empty() {
            if entry.byte_offset() + entry.byte_length() > data.len() {
                return Err(Error::InvalidArchive(format!(
                    "member {} extends past end of file",
                    entry.filename
                )));
            }
            entries.push(entry);
        }
        pos += ENTRY_SIZE;
    }
    check_no_overlap(&entries)?;
    Ok(entries)
}

/// Active members must occupy disjoint byte ranges; a directory claiming overlapping members is
/// corrupt rather than merely sparse.
fn check_no_overlap(entries: &[LbrEntry]) -> DecodeResult<()> {
    let mut ranges: Vec<(usize, usize, &str)> = entries
        .iter()
        .map(|e| (e.byte_offset(), e.byte_offset() + e.byte_length(), e.filename.as_str()))
        .collect();
    ranges.sort_by_key(|&(start, _, _)| start);
    for w in ranges.windows(2) {
        let (_, end0, name0) = w[0];
        let (start1, _, name1) = w[1];
        if start1 < end0 {
            return Err(Error::InvalidArchive(format!(
                "members {name0} and {name1} overlap in the directory"
            )));
        }
    }
    Ok(())
}

/// Extract one member's raw bytes, given an entry obtained from `list_lbr`.
pub fn extract_lbr_member(data: &[u8], entry: &LbrEntry) -> DecodeResult<Vec<u8>> {
    let start = entry.byte_offset();
    let end = start + entry.byte_length();
    data.get(start..end).map(|s| s.to_vec()).ok_or_else(|| {
        Error::InvalidArchive(format!("member {} out of bounds", entry.filename))
    })
}
