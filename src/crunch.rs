//! Crunch decoder: variable-width (9-12 bit) LZW with a clear code, an optional v2 "special"
//! code, and a one-code-deferred width-growth rule.
//!
//! The dictionary and bit-packing shape are grounded on `lzw.rs`'s `Link`/`LZW` pattern (codes map
//! to a prefix code plus a trailing byte), generalized from that module's fixed-width-only
//! dictionary to the variable 9-12 bit growth this format requires, and rebuilt around the shared
//! `BitReader` rather than that module's `BitOrder`-aware bit packer, since Crunch streams are
//! always read MSB-first.

use crate::bitreader::BitReader;
use crate::error::{DecodeResult, Error};

const MAGIC: [u8; 2] = [0x76, 0xFE];
const CLEAR_CODE: u16 = 256;
const SPECIAL_CODE: u16 = 257;
const MIN_WIDTH: u32 = 9;
const MAX_WIDTH: u32 = 12;
const MAX_DICT: usize = 1 << MAX_WIDTH;

fn read_cstring(data: &[u8], pos: usize) -> DecodeResult<(String, usize)> {
    let end = data[pos..].iter().position(|&b| b == 0).ok_or(Error::TruncatedHeader)?;
    let name = String::from_utf8_lossy(&data[pos..pos + end]).into_owned();
    Ok((name, pos + end + 1))
}

struct Header {
    filename: String,
    is_v2: bool,
    body_offset: usize,
}

fn parse_header(data: &[u8]) -> DecodeResult<Header> {
    if data.len() < 2 || data[0..2] != MAGIC {
        return Err(Error::MagicMismatch);
    }
    let (filename, pos) = read_cstring(data, 2)?;
    let flags = data.get(pos..pos + 4).ok_or(Error::TruncatedHeader)?;
    let is_v2 = match flags[0] {
        1 => false,
        2 => true,
        other => {
            log::warn!("unrecognized crunch version byte {other:#04x}, assuming v1 semantics");
            false
        }
    };
    Ok(Header { filename, is_v2, body_offset: pos + 4 })
}

pub fn get_crunched_filename(data: &[u8]) -> DecodeResult<String> {
    Ok(parse_header(data)?.filename)
}

/// Dictionary entry: `None` prefix marks one of the 256 seeded single-byte codes.
struct Dictionary {
    prefix: Vec<Option<u16>>,
    suffix: Vec<u8>,
    next_code: u16,
    is_v2: bool,
}

impl Dictionary {
    fn new(is_v2: bool) -> Self {
        let mut d = Self { prefix: Vec::with_capacity(MAX_DICT), suffix: Vec::with_capacity(MAX_DICT), next_code: 0, is_v2 };
        d.reset();
        d
    }

    fn reset(&mut self) {
        self.prefix.clear();
        self.suffix.clear();
        for c in 0u16..256 {
            self.prefix.push(None);
            self.suffix.push(c as u8);
        }
        // reserve 256 = clear, 257 = special (v2 only)
        self.prefix.push(None);
        self.suffix.push(0);
        if self.is_v2 {
            self.prefix.push(None);
            self.suffix.push(0);
            self.next_code = 258;
        } else {
            self.next_code = 257;
        }
    }

    fn resolve(&self, code: u16) -> DecodeResult<Vec<u8>> {
        let mut stack = Vec::new();
        let mut cur = code;
        loop {
            let suf = *self
                .suffix
                .get(cur as usize)
                .ok_or_else(|| Error::InvalidTreeOrDictionary(format!("crunch code {cur} undefined")))?;
            stack.push(suf);
            match self.prefix[cur as usize] {
                Some(p) => cur = p,
                None => break,
            }
        }
        stack.reverse();
        Ok(stack)
    }

    fn add(&mut self, prefix: u16, suffix: u8) {
        if (self.next_code as usize) < MAX_DICT {
            self.prefix.push(Some(prefix));
            self.suffix.push(suffix);
            self.next_code += 1;
        }
    }
}

/// Decode a complete Crunch stream to the original bytes.
pub fn uncrunch(data: &[u8]) -> DecodeResult<Vec<u8>> {
    let header = parse_header(data)?;
    let mut bits = BitReader::at_offset(data, header.body_offset);
    let mut dict = Dictionary::new(header.is_v2);
    let mut width = MIN_WIDTH;
    let mut prev: Option<u16> = None;
    let mut out = Vec::new();
    let max_out = data.len().saturating_mul(256).max(1 << 16);

    loop {
        if bits.is_exhausted() {
            break;
        }
        let code = bits.get_bits(width) as u16;

        if code == CLEAR_CODE {
            dict.reset();
            width = MIN_WIDTH;
            prev = None;
            continue;
        }
        if header.is_v2 && code == SPECIAL_CODE {
            // Crunch v2's escape code defers the next width bump by one additional code; no
            // documented sample of this path survived, so it is treated as a pure no-op here
            // (see DESIGN.md).
            continue;
        }

        let entry = match prev {
            None => {
                if code >= 256 {
                    return Err(Error::InvalidTreeOrDictionary(format!("first code {code} is not a literal")));
                }
                vec![code as u8]
            }
            Some(p) => {
                if (code as usize) < dict.next_code as usize {
                    dict.resolve(code)?
                } else if code == dict.next_code {
                    let mut s = dict.resolve(p)?;
                    s.push(s[0]);
                    s
                } else {
                    return Err(Error::InvalidTreeOrDictionary(format!("crunch code {code} out of range")));
                }
            }
        };

        out.extend_from_slice(&entry);
        if let Some(p) = prev {
            dict.add(p, entry[0]);
            if dict.next_code as u32 == (1 << width) && width < MAX_WIDTH {
                width += 1;
            }
        }
        prev = Some(code);

        if out.len() > max_out {
            return Err(Error::TruncatedStream);
        }
    }
    log::debug!("uncrunched {} into {} bytes", header.filename, out.len());
    Ok(out)
}
