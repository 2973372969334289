//! Input Encoding Detection and Conversion
//!
//! Documents arrive as UTF-8, 8-bit ANSI, or UTF-16. The parser works on
//! single-byte text, so UTF-16 input is converted to UTF-8 and a UTF-8
//! BOM is dropped before the buffer is handed to the document. ANSI
//! input passes through untouched; every markup byte is ASCII.

use std::borrow::Cow;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Encoding detected from a byte order mark or initial bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 or 8-bit ANSI, without BOM
    Bytes,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        if input.starts_with(&UTF8_BOM) {
            return TextEncoding::Utf8Bom;
        }
        match input {
            [0xFF, 0xFE, ..] | [b'<', 0x00, ..] => TextEncoding::Utf16Le,
            [0xFE, 0xFF, ..] | [0x00, b'<', ..] => TextEncoding::Utf16Be,
            _ => TextEncoding::Bytes,
        }
    }
}

/// Normalize a buffer to single-byte text.
///
/// Borrowed when nothing needed changing. Unpaired UTF-16 surrogates
/// become U+FFFD and a trailing odd byte is dropped.
pub fn to_utf8(input: &[u8]) -> Cow<'_, [u8]> {
    match TextEncoding::detect(input) {
        TextEncoding::Bytes => Cow::Borrowed(input),
        TextEncoding::Utf8Bom => Cow::Borrowed(&input[UTF8_BOM.len()..]),
        TextEncoding::Utf16Le => Cow::Owned(decode_utf16(input, [0xFF, 0xFE], u16::from_le_bytes)),
        TextEncoding::Utf16Be => Cow::Owned(decode_utf16(input, [0xFE, 0xFF], u16::from_be_bytes)),
    }
}

/// As `to_utf8`, taking ownership so the common case moves without copying
pub fn into_utf8(input: Vec<u8>) -> Vec<u8> {
    match TextEncoding::detect(&input) {
        TextEncoding::Bytes => input,
        _ => to_utf8(&input).into_owned(),
    }
}

fn decode_utf16(input: &[u8], bom: [u8; 2], unit: fn([u8; 2]) -> u16) -> Vec<u8> {
    let bytes = input.strip_prefix(&bom[..]).unwrap_or(input);
    let code_units = bytes.chunks_exact(2).map(|c| unit([c[0], c[1]]));
    let mut out = String::with_capacity(bytes.len() / 2);
    out.extend(char::decode_utf16(code_units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)));
    out.into_bytes()
}
