//! Character Entity Decoding
//!
//! Handles decoding of:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - A fixed table of common HTML named entities (&nbsp; &copy; ...)
//! - Numeric character references: &#123; &#x7B;
//!
//! Decoding is a single forward pass that compacts the buffer in place:
//! an entity is never shorter than its UTF-8 expansion, so the write
//! cursor can never overtake the read cursor. Uses Cow for zero-copy
//! when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Longest entity body we try to resolve (`&` and `;` excluded)
const MAX_ENTITY_LEN: usize = 10;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    let mut buf = input.to_vec();
    let len = html_entity_decode(&mut buf);
    buf.truncate(len);
    Cow::Owned(buf)
}

/// As `decode`, yielding a string (invalid UTF-8 replaced)
pub fn decode_str(input: &[u8]) -> Cow<'_, str> {
    match decode(input) {
        Cow::Borrowed(b) => String::from_utf8_lossy(b),
        Cow::Owned(v) => match String::from_utf8(v) {
            Ok(s) => Cow::Owned(s),
            Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        },
    }
}

/// Decode entity references in place.
///
/// Returns the new length; bytes past it are garbage. Unknown or
/// malformed references are kept verbatim.
pub fn html_entity_decode(buf: &mut [u8]) -> usize {
    let mut read = 0;
    let mut write = 0;

    while read < buf.len() {
        let amp = match memchr(b'&', &buf[read..]) {
            Some(i) => read + i,
            None => {
                buf.copy_within(read.., write);
                write += buf.len() - read;
                break;
            }
        };

        // Copy everything before the entity
        buf.copy_within(read..amp, write);
        write += amp - read;
        read = amp;

        let limit = (amp + 2 + MAX_ENTITY_LEN).min(buf.len());
        let decoded = memchr(b';', &buf[amp + 1..limit])
            .and_then(|semi| decode_entity(&buf[amp + 1..amp + 1 + semi]).map(|c| (semi, c)));

        match decoded {
            Some((semi, c)) => {
                let mut utf8 = [0u8; 4];
                let encoded = c.encode_utf8(&mut utf8).as_bytes();
                buf[write..write + encoded.len()].copy_from_slice(encoded);
                write += encoded.len();
                read = amp + semi + 2;
            }
            None => {
                // Unknown entity, keep the ampersand
                buf[write] = b'&';
                write += 1;
                read += 1;
            }
        }
    }

    write
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &[u8]) -> Option<char> {
    match entity {
        [] => None,
        [b'#', rest @ ..] => decode_numeric_entity(rest),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"amp" => Some('&'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        // HTML named entities (common ones)
        b"nbsp" => Some('\u{00A0}'),
        b"copy" => Some('\u{00A9}'),
        b"reg" => Some('\u{00AE}'),
        b"deg" => Some('\u{00B0}'),
        b"trade" => Some('\u{2122}'),
        b"mdash" => Some('\u{2014}'),
        b"ndash" => Some('\u{2013}'),
        b"lsquo" => Some('\u{2018}'),
        b"rsquo" => Some('\u{2019}'),
        b"ldquo" => Some('\u{201C}'),
        b"rdquo" => Some('\u{201D}'),
        b"hellip" => Some('\u{2026}'),
        b"bull" => Some('\u{2022}'),
        _ => None,
    }
}

/// Decode a numeric character reference
fn decode_numeric_entity(entity: &[u8]) -> Option<char> {
    let codepoint = match entity {
        [] => return None,
        [b'x' | b'X', hex @ ..] => {
            if hex.is_empty() || !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?
        }
        dec => {
            if !dec.iter().all(u8::is_ascii_digit) {
                return None;
            }
            std::str::from_utf8(dec).ok()?.parse::<u32>().ok()?
        }
    };
    char::from_u32(codepoint)
}

/// True if the span looks like `&name;` with a plain identifier
/// (the shape a DOCTYPE-declared entity reference takes)
pub fn entity_name(input: &[u8]) -> Option<&[u8]> {
    let rest = input.strip_prefix(b"&")?;
    let semi = memchr(b';', rest)?;
    let name = &rest[..semi];
    match name.first() {
        Some(b) if super::scanner::is_name_start_char(*b) => {}
        _ => return None,
    }
    if name.iter().all(|&b| super::scanner::is_name_char(b)) {
        Some(name)
    } else {
        None
    }
}
