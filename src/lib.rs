//! # un80
//!
//! Extracts and decompresses CP/M-era archive and compression formats:
//! * `lbr` lists and extracts members of an LBR library archive (uncompressed).
//! * `arc` lists and extracts members of an ARC archive, dispatching per-member compression.
//! * `squeeze` decodes the static-Huffman "Squeeze" stream format.
//! * `crunch` decodes the variable-width-LZW "Crunch" stream format.
//! * `crlzh` decodes the LZSS + adaptive-Huffman "CrLZH" stream format.
//! * `detect` and `cpm::detect_compression` identify which of the above a file is.
//! * `cpm` also holds the text-mode post-processing helpers (`strip_cpm_eof`, `crlf_to_lf`).
//!
//! Only decompression is implemented; there is no public API for producing any of these formats.
//!
//! ## Example
//!
//! ```rs
//! use un80::detect::{detect, FormatTag};
//! use un80::crlzh;
//!
//! let data = std::fs::read("some_input.cym").expect("read failed");
//! match detect(&data) {
//!     Some(FormatTag::CrLzh) => {
//!         let expanded = crlzh::uncrlzh(&data).expect("decode failed");
//!         eprintln!("decoded {} bytes", expanded.len());
//!     }
//!     _ => eprintln!("not a CrLZH stream"),
//! }
//! ```

pub mod arc;
pub mod bitreader;
pub mod cpm;
pub mod crlzh;
pub mod crunch;
pub mod detect;
pub mod error;
pub mod lbr;
pub mod squeeze;
mod tools;

pub use error::Error;
