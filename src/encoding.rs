//! Byte-order-mark based encoding detection.
//!
//! Version files are either UTF-8 (with or without a BOM) or UTF-16LE with a
//! BOM. Only the first two bytes of a file are inspected.

use std::io::Read;

use crate::error::{RevStampError, Result};

/// The BOM as it appears once a file has been decoded to text.
pub const BOM_CHAR: char = '\u{feff}';

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];

/// Text encodings a version file can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
}

impl TextEncoding {
    /// Windows code page identifier for the encoding.
    pub fn code_page(self) -> u32 {
        match self {
            TextEncoding::Utf8 => 65001,
            TextEncoding::Utf16Le => 1200,
        }
    }

    pub fn bom(self) -> &'static [u8] {
        match self {
            TextEncoding::Utf8 => UTF8_BOM,
            TextEncoding::Utf16Le => UTF16LE_BOM,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::Utf16Le => "utf16le",
        }
    }

    /// Decodes raw file bytes. A leading BOM survives as [`BOM_CHAR`].
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| RevStampError::encoding(format!("invalid UTF-8 data: {}", e))),
            TextEncoding::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(RevStampError::encoding(
                        "UTF-16LE data has an odd number of bytes",
                    ));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units)
                    .map_err(|e| RevStampError::encoding(format!("invalid UTF-16LE data: {}", e)))
            }
        }
    }

    /// Encodes text for storage. A leading [`BOM_CHAR`] becomes the BOM bytes.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

/// Encoding, code page and BOM bytes chosen for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingValues {
    pub encoding: TextEncoding,
    pub code_page: u32,
    pub bom: &'static [u8],
}

impl EncodingValues {
    pub fn new(encoding: TextEncoding) -> Self {
        EncodingValues {
            encoding,
            code_page: encoding.code_page(),
            bom: encoding.bom(),
        }
    }
}

impl Default for EncodingValues {
    fn default() -> Self {
        EncodingValues::new(TextEncoding::Utf8)
    }
}

/// Picks the encoding of a byte stream from its first two bytes.
///
/// `FF FE` selects UTF-16LE; anything else, including an empty stream,
/// selects UTF-8.
pub fn detect_encoding<R: Read>(reader: R) -> Result<EncodingValues> {
    let mut head = Vec::with_capacity(UTF16LE_BOM.len());
    reader
        .take(UTF16LE_BOM.len() as u64)
        .read_to_end(&mut head)?;

    if head == UTF16LE_BOM {
        Ok(EncodingValues::new(TextEncoding::Utf16Le))
    } else {
        Ok(EncodingValues::default())
    }
}
