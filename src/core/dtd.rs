//! DOCTYPE Entity Table
//!
//! Collects `<!ENTITY name "value">` declarations from the internal subset
//! of a `<!DOCTYPE ...>` preamble. Names and values stay spans into the
//! document buffer; lookups go by name hash with a byte comparison to
//! settle collisions. Other declarations (ELEMENT, ATTLIST, NOTATION,
//! parameter and external entities) are skipped.

use super::hash::name_hash;
use super::scanner::Scanner;
use super::span::Span;
use tracing::trace;

/// One internal general entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDecl {
    pub name: Span,
    pub hash: u32,
    pub value: Span,
}

/// Flat entity list, looked up by hash
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    entries: Vec<EntityDecl>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityDecl> {
        self.entries.iter()
    }

    /// Add a declaration; the first declaration of a name wins
    pub fn add(&mut self, input: &[u8], name: Span, value: Span) -> bool {
        let hash = name_hash(name.slice(input));
        if self.lookup(input, name.slice(input)).is_some() {
            return false;
        }
        self.entries.push(EntityDecl { name, hash, value });
        true
    }

    /// Find an entity by name. Entity names are case-sensitive; the hash
    /// is only a fast reject.
    pub fn lookup(&self, input: &[u8], name: &[u8]) -> Option<&EntityDecl> {
        let hash = name_hash(name);
        self.entries
            .iter()
            .find(|e| e.hash == hash && e.name.slice(input) == name)
    }

    /// Find an entity by precomputed hash alone
    pub fn lookup_hash(&self, hash: u32) -> Option<&EntityDecl> {
        self.entries.iter().find(|e| e.hash == hash)
    }
}

/// Parse a `<!DOCTYPE ...>` declaration at the scanner position.
///
/// On success the scanner sits after the closing `>`. Returns None if
/// the declaration is unterminated.
pub fn parse_doctype(scanner: &mut Scanner<'_>, table: &mut EntityTable) -> Option<()> {
    if !scanner.starts_with_ignore_case(b"<!DOCTYPE") {
        return None;
    }
    scanner.advance(b"<!DOCTYPE".len());

    loop {
        if !scanner.skip_blanks() {
            return None;
        }
        match scanner.peek()? {
            b'>' => {
                scanner.advance(1);
                return Some(());
            }
            b'[' => {
                scanner.advance(1);
                parse_internal_subset(scanner, table)?;
            }
            b'"' | b'\'' => {
                scanner.parse_quoted()?;
            }
            _ => scanner.advance(1),
        }
    }
}

/// Walk the internal subset up to and including `]`
fn parse_internal_subset(scanner: &mut Scanner<'_>, table: &mut EntityTable) -> Option<()> {
    loop {
        if !scanner.skip_blanks() {
            return None;
        }
        if scanner.eat(b']') {
            return Some(());
        }
        if scanner.starts_with(b"<!--") {
            let end = scanner.find_seq(b"-->")?;
            scanner.set_position(end + 3);
        } else if scanner.starts_with(b"<?") {
            let end = scanner.find_seq(b"?>")?;
            scanner.set_position(end + 2);
        } else if scanner.starts_with(b"<!ENTITY") {
            scanner.advance(b"<!ENTITY".len());
            parse_entity_decl(scanner, table);
            let end = scanner.find_tag_end_quoted()?;
            scanner.set_position(end + 1);
        } else if scanner.starts_with(b"<!") {
            let end = scanner.find_tag_end_quoted()?;
            scanner.set_position(end + 1);
        } else {
            // parameter entity reference or stray byte
            scanner.advance(1);
        }
    }
}

/// Parse the body of an entity declaration; leaves the cursor before `>`.
/// Parameter and external entities are not recorded.
fn parse_entity_decl(scanner: &mut Scanner<'_>, table: &mut EntityTable) {
    scanner.skip_blanks();
    if scanner.eat(b'%') {
        return;
    }
    let Some(name) = scanner.read_name() else {
        return;
    };
    scanner.skip_blanks();
    let Some(value) = scanner.parse_quoted() else {
        return;
    };
    let input = scanner.input();
    if table.add(input, name, value) {
        trace!(
            name = %String::from_utf8_lossy(name.slice(input)),
            len = value.len,
            "entity declared"
        );
    }
}
