//! Text-mode post-processing and magic-byte format sniffing.
//!
//! These are the two small "collaborator contract" operations the surrounding CLI applies to
//! extracted payloads: stripping CP/M's trailing `0x1A` end-of-file padding and normalizing
//! CR+LF line endings. `detect_compression` is the magic-only half of format dispatch (see
//! `detect` for the extension-aware remainder), mirroring the `un80.cpm` / `un80.cli` module
//! split in the original tool this crate's behavior is modeled on.

use crate::detect::FormatTag;

/// Drop a trailing run of `0x1A` (CP/M end-of-file marker) bytes. Idempotent.
pub fn strip_cpm_eof(data: &[u8]) -> Vec<u8> {
    let end = data.iter().rposition(|&b| b != 0x1A).map_or(0, |i| i + 1);
    data[..end].to_vec()
}

/// Rewrite every `0x0D 0x0A` pair to a single `0x0A`. Idempotent.
pub fn crlf_to_lf(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i] == 0x0D && data.get(i + 1) == Some(&0x0A) {
            out.push(0x0A);
            i += 2;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    out
}

/// Magic-byte-only portion of format dispatch: identifies one of the three stream compressors or
/// an ARC archive purely from the leading bytes, with no extension information.
pub fn detect_compression(header: &[u8]) -> Option<FormatTag> {
    if header.len() < 2 {
        return None;
    }
    match [header[0], header[1]] {
        [0x76, 0xFF] => Some(FormatTag::Squeeze),
        [0x76, 0xFE] => Some(FormatTag::Crunch),
        [0x76, 0xFD] => Some(FormatTag::CrLzh),
        _ if header[0] == 0x1A && matches!(header.get(1), Some(1..=9)) => Some(FormatTag::Arc),
        _ => None,
    }
}
