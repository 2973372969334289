//! `name:value;name:value` declaration splitting
//!
//! Used for inline `style=""` attributes and for rule bodies of the
//! style sheet. Separators inside quotes or parentheses (`url(data:..;..)`,
//! `font-family:'a;b'`) do not split. Comments are skipped.

use crate::core::scanner::Scanner;
use crate::core::span::Span;

/// One `name:value` pair; spans index the buffer that was split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    pub name: Span,
    pub value: Span,
}

/// Iterator over the declarations in `buffer[span]`
#[derive(Debug, Clone)]
pub struct Declarations<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Declarations<'a> {
    /// Split the whole buffer
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { scanner: Scanner::new(buffer) }
    }

    /// Split only `buffer[span]`; yielded spans stay relative to `buffer`
    pub fn in_span(buffer: &'a [u8], span: Span) -> Self {
        Self { scanner: Scanner::for_span(buffer, span) }
    }

    /// End of the current declaration: `;` outside quotes/parens, or the end
    fn find_declaration_end(&self) -> usize {
        let input = self.scanner.input();
        let mut pos = self.scanner.position();
        let end = self.scanner.end();
        let mut quote: Option<u8> = None;
        let mut depth = 0u32;
        while pos < end {
            match (input[pos], quote) {
                (c, Some(q)) if c == q => quote = None,
                (_, Some(_)) => {}
                (b'"' | b'\'', None) => quote = Some(input[pos]),
                (b'(', None) => depth += 1,
                (b')', None) => depth = depth.saturating_sub(1),
                (b';', None) if depth == 0 => return pos,
                _ => {}
            }
            pos += 1;
        }
        end
    }
}

impl Iterator for Declarations<'_> {
    type Item = Declaration;

    fn next(&mut self) -> Option<Declaration> {
        loop {
            if !self.scanner.skip_style_blanks() {
                return None;
            }
            if self.scanner.eat(b';') {
                continue;
            }
            let stop = self.find_declaration_end();
            let start = self.scanner.position();
            self.scanner.set_position(stop);
            self.scanner.eat(b';');

            let input = self.scanner.input();
            let Some(colon) = memchr::memchr(b':', &input[start..stop]).map(|i| start + i) else {
                continue;
            };
            let name = Span::from_range(start, colon).trim(input);
            let value = strip_comments(input, Span::from_range(colon + 1, stop).trim(input));
            if name.is_empty() {
                continue;
            }
            return Some(Declaration { name, value });
        }
    }
}

/// Drop a trailing `/* ... */` from a value span
fn strip_comments(input: &[u8], value: Span) -> Span {
    let bytes = value.slice(input);
    match memchr::memmem::find(bytes, b"/*") {
        Some(i) => Span::from_range(value.start(), value.start() + i).trim(input),
        None => value,
    }
}
