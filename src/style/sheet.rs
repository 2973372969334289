//! Style-sheet parsing
//!
//! Reads `selector, selector { declarations }` rules from `<style>` text
//! into a `ClassStyleTable`. Only simple selectors are registered: a
//! bare element name, `.class`, or `#id`. Rules whose selectors combine
//! several parts (descendant, child, attribute, pseudo-class) cannot be
//! resolved by a key lookup and are skipped, as are at-rules.

use super::table::ClassStyleTable;
use crate::core::scanner::Scanner;
use crate::core::span::Span;
use tracing::trace;

/// Parse `buffer[span]` as a style sheet, registering every rule.
/// Returns the number of selector entries added or extended.
pub fn parse_style_sheet(buffer: &[u8], span: Span, table: &mut ClassStyleTable) -> usize {
    let mut s = Scanner::for_span(buffer, span);
    let mut registered = 0;

    loop {
        if !s.skip_style_blanks() {
            break;
        }
        // HTML comment delimiters are allowed around style sheet text
        if s.starts_with(b"<!--") {
            s.advance(4);
            continue;
        }
        if s.starts_with(b"-->") {
            s.advance(3);
            continue;
        }
        if s.peek() == Some(b'@') {
            skip_at_rule(&mut s);
            continue;
        }

        let Some(open) = s.find_byte(b'{') else {
            break;
        };
        let selectors = Span::from_range(s.position(), open);
        s.set_position(open + 1);
        let body_start = s.position();
        let body_end = skip_block(&mut s);
        let body = Span::from_range(body_start, body_end).trim(buffer);
        let body_bytes = body.slice(buffer);

        for selector in selectors.slice(buffer).split(|&b| b == b',') {
            let selector = trim(selector);
            if !is_simple_selector(selector) {
                trace!(selector = %String::from_utf8_lossy(selector), "skipping complex selector");
                continue;
            }
            table.add_or_append(selector, body_bytes);
            registered += 1;
        }
    }

    trace!(registered, "style sheet parsed");
    registered
}

/// Skip to the end of the block whose `{` was just consumed; returns the
/// position of the matching `}` (or the end) and leaves the cursor after it
fn skip_block(s: &mut Scanner<'_>) -> usize {
    let input = s.input();
    let mut depth = 1u32;
    let mut pos = s.position();
    let mut quote: Option<u8> = None;
    while pos < s.end() {
        match (input[pos], quote) {
            (c, Some(q)) if c == q => quote = None,
            (_, Some(_)) => {}
            (b'"' | b'\'', None) => quote = Some(input[pos]),
            (b'{', None) => depth += 1,
            (b'}', None) => {
                depth -= 1;
                if depth == 0 {
                    s.set_position(pos + 1);
                    return pos;
                }
            }
            _ => {}
        }
        pos += 1;
    }
    s.set_position(pos);
    pos
}

/// `@import ...;` or `@media ... { ... }`
fn skip_at_rule(s: &mut Scanner<'_>) {
    match s.find_byte2(b';', b'{') {
        Some(pos) if s.input()[pos] == b';' => s.set_position(pos + 1),
        Some(pos) => {
            s.set_position(pos + 1);
            skip_block(s);
        }
        None => s.set_position(s.end()),
    }
}

fn is_simple_selector(selector: &[u8]) -> bool {
    let body = match selector {
        [b'.' | b'#', rest @ ..] => rest,
        other => other,
    };
    !body.is_empty()
        && body
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_') || b >= 0x80)
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b > b' ').unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| b > b' ').map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &[u8]) -> (ClassStyleTable, usize) {
        let mut table = ClassStyleTable::new();
        let n = parse_style_sheet(text, Span::from_range(0, text.len()), &mut table);
        (table, n)
    }

    #[test]
    fn test_simple_rules() {
        let (table, n) = parse(b".a{fill:red} #b { fill:green } rect{stroke:black}");
        assert_eq!(n, 3);
        assert_eq!(table.lookup(b".a"), b"fill:red");
        assert_eq!(table.lookup(b"#b"), b"fill:green");
        assert_eq!(table.lookup(b"rect"), b"stroke:black");
    }

    #[test]
    fn test_selector_list_and_merge() {
        let (table, _) = parse(b".a, .b { fill:red } .a { stroke:blue }");
        assert_eq!(table.lookup(b".a"), b"fill:red;stroke:blue");
        assert_eq!(table.lookup(b".b"), b"fill:red");
    }

    #[test]
    fn test_skips_comments_at_rules_and_complex() {
        let text = b"<!-- /* c */ @import url(x.css); @media print { .a { fill:red } }
            g > rect { fill:red } .c:hover { fill:red } .d { fill:blue } -->";
        let (table, n) = parse(text);
        assert_eq!(n, 1);
        assert_eq!(table.lookup(b".a"), b"");
        assert_eq!(table.lookup(b".d"), b"fill:blue");
    }

    #[test]
    fn test_unterminated_block() {
        let (table, _) = parse(b".a { fill:red");
        assert_eq!(table.lookup(b".a"), b"fill:red");
    }

    #[test]
    fn test_span_restricted() {
        let buf = b"xx.a{fill:red}yy{";
        let mut table = ClassStyleTable::new();
        parse_style_sheet(buf, Span::from_range(2, 14), &mut table);
        assert_eq!(table.lookup(b".a"), b"fill:red");
        assert_eq!(table.len(), 1);
    }
}
