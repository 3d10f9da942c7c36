//! Format dispatch: selects one of the container/codec modules from magic bytes and, failing
//! that, from a caller-supplied file extension.

use crate::cpm::detect_compression;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    Squeeze,
    Crunch,
    CrLzh,
    Lbr,
    Arc,
}

/// Steps 1-3 of dispatch: magic bytes only, no filesystem context required.
pub fn detect(header: &[u8]) -> Option<FormatTag> {
    detect_compression(header)
}

/// Steps 1-5: magic bytes, then extension cues (`.?Q?`/`.?Z?`/`.?Y?` for the compressors,
/// `.LBR`/`.LQR`/`.LZR` for LBR, `.ARC`/`.ARK` for ARC).
pub fn detect_with_extension(header: &[u8], extension: &str) -> Option<FormatTag> {
    if let Some(tag) = detect_compression(header) {
        return Some(tag);
    }
    let ext = extension.to_ascii_uppercase();
    if ext.len() == 3 {
        let middle = ext.as_bytes()[1];
        match middle {
            b'Q' => return Some(FormatTag::Squeeze),
            b'Z' => return Some(FormatTag::Crunch),
            b'Y' => return Some(FormatTag::CrLzh),
            _ => {}
        }
    }
    match ext.as_str() {
        "LBR" | "LQR" | "LZR" => Some(FormatTag::Lbr),
        "ARC" | "ARK" => Some(FormatTag::Arc),
        _ => None,
    }
}
