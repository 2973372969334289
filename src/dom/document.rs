//! SVG Document - owned input plus the element tree parsed from it
//!
//! Parsing is a single recursive-descent pass over the input:
//! - optional `<?xml ...?>` header, kept as an attribute bag
//! - optional `<!DOCTYPE ...>` whose internal entities are collected
//! - the `<svg>` root and everything below it
//!
//! Style rules met in `<style>` elements are applied to the elements that
//! follow them while their headers are parsed (see `crate::style` for the
//! cascade order). Names, values and text stay spans into the input;
//! only bytes the cascade synthesizes are copied into the string pool.
//!
//! Parsing is lenient: the first structural error stops the pass, the
//! tree built so far is kept and the error is recorded on the document.

use super::names::{AttributeKind, ElementKind};
use super::node::{Attribute, AttributeIndex, Element};
use super::strings::StringPool;
use crate::core::dtd::{parse_doctype, EntityTable};
use crate::core::encoding::into_utf8;
use crate::core::entities::entity_name;
use crate::core::hash::{eq_ignore_case, name_hash};
use crate::core::scanner::{is_name_char, Scanner};
use crate::core::span::{ByteRef, Origin, Span};
use crate::error::{LoadError, ParseError};
use crate::literal::{parse_transform, Color};
use crate::options::ParseOptions;
use crate::path::{parse_path_data, PathCache, PathData};
use crate::style::{parse_style_sheet, ClassStyleTable, Declarations};
use crate::geom::Matrix;
use crate::value::Value;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Entity references expanded per document, across all nesting levels
const MAX_ENTITY_EXPANSIONS: usize = 100_000;

/// Replacement bytes expanded per document, across all nesting levels
const MAX_EXPANDED_BYTES: usize = 64 << 20;

/// A parsed document. Owns its input; every span in the tree points into
/// it or into the string pool.
#[derive(Debug, Clone, Default)]
pub struct Document {
    input: Vec<u8>,
    pool: StringPool,
    root: Option<Element>,
    xml_header: Option<Element>,
    entities: EntityTable,
    styles: ClassStyleTable,
    error: Option<ParseError>,
}

impl Document {
    /// Parse leniently with default options
    pub fn parse(input: impl Into<Vec<u8>>) -> Self {
        Self::parse_with(input, &ParseOptions::default())
    }

    /// Parse leniently; check `error()` for a structural failure
    pub fn parse_with(input: impl Into<Vec<u8>>, options: &ParseOptions) -> Self {
        let mut input = input.into();
        let limit = options.input_limit();

        if input.len() > limit {
            return Self::rejected(input, limit);
        }
        if options.convert_encoding {
            input = into_utf8(input);
            // UTF-16 grows when converted
            if input.len() > limit {
                return Self::rejected(input, limit);
            }
        }

        // The parser borrows the input; take its products before moving
        // the input into the document
        let (root, xml_header, error, pool, entities, styles) = {
            let mut parser = Parser::new(&input, options);
            let (root, header, error) = parser.run();
            (root, header, error, parser.pool, parser.entities, parser.styles)
        };

        if let Some(err) = &error {
            debug!(position = err.position(), %err, "document parse stopped");
        }

        Document { input, pool, root, xml_header, entities, styles, error }
    }

    fn rejected(input: Vec<u8>, limit: usize) -> Self {
        let err = ParseError::InputTooLarge { len: input.len(), limit, position: limit };
        debug!(%err, "document rejected");
        Document { input, error: Some(err), ..Default::default() }
    }

    /// Parse, failing on any structural error
    pub fn parse_strict(input: impl Into<Vec<u8>>) -> Result<Self, ParseError> {
        Self::parse_strict_with(input, &ParseOptions::default())
    }

    pub fn parse_strict_with(
        input: impl Into<Vec<u8>>,
        options: &ParseOptions,
    ) -> Result<Self, ParseError> {
        let mut doc = Self::parse_with(input, options);
        match doc.error.take() {
            Some(err) => Err(err),
            None => Ok(doc),
        }
    }

    /// Read a whole file, then parse leniently
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse(bytes))
    }

    /// Read a whole file, then parse strictly
    pub fn from_file_strict(path: impl AsRef<std::path::Path>) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse_strict(bytes)?)
    }

    /// Read a stream to its end, then parse leniently
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LoadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::parse(bytes))
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// First structural error, if parsing stopped early
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.root.is_some()
    }

    /// Input after encoding normalization
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn strings(&self) -> &StringPool {
        &self.pool
    }

    /// Resolve a reference from this document's tree
    #[inline]
    pub fn bytes(&self, r: ByteRef) -> &[u8] {
        self.pool.resolve(r, &self.input)
    }

    /// `<?xml ...?>` attributes (version, encoding, standalone)
    pub fn xml_header(&self) -> Option<&Element> {
        self.xml_header.as_ref()
    }

    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    /// Replacement text of a DOCTYPE entity
    pub fn entity(&self, name: &[u8]) -> Option<&[u8]> {
        self.entities.lookup(&self.input, name).map(|e| e.value.slice(&self.input))
    }

    /// Style rules collected from every `<style>` element
    pub fn styles(&self) -> &ClassStyleTable {
        &self.styles
    }

    /// Root and all its descendants, depth-first
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.root.iter().flat_map(|r| std::iter::once(r).chain(r.descendants()))
    }

    pub fn element_by_id(&self, id: &[u8]) -> Option<&Element> {
        self.elements()
            .find(|el| el.attribute_value(self, AttributeKind::Id) == Some(id))
    }

    /// Parse the element's `d` attribute
    pub fn path_data(&self, el: &Element) -> Option<PathData> {
        el.attribute_value(self, AttributeKind::D).map(parse_path_data)
    }

    /// As `path_data`, sharing parses of identical `d` strings
    pub fn cached_path_data(&self, el: &Element, cache: &mut PathCache) -> Option<Arc<PathData>> {
        el.attribute_value(self, AttributeKind::D).map(|d| cache.get_or_parse(d))
    }

    /// The element's own `transform`; identity when absent or malformed
    pub fn transform(&self, el: &Element) -> Matrix {
        el.attribute_value(self, AttributeKind::Transform)
            .map(parse_transform)
            .unwrap_or_default()
    }

    /// Color-valued attribute (fill, stroke, stop-color, ...)
    pub fn color(&self, el: &Element, kind: AttributeKind) -> Option<Color> {
        el.attribute_value(self, kind).and_then(Color::parse)
    }

    /// Length-valued attribute with its unit
    pub fn value(&self, el: &Element, kind: AttributeKind) -> Option<Value> {
        el.attribute_value(self, kind).and_then(Value::parse)
    }
}

/// `class`, `style` and `id` seen while reading a header; applied once
/// every explicit attribute is in place
#[derive(Default)]
struct PendingStyle {
    class: Option<Span>,
    style: Option<Span>,
    id: Option<Span>,
}

struct Parser<'a, 'o> {
    input: &'a [u8],
    options: &'o ParseOptions,
    pool: StringPool,
    entities: EntityTable,
    styles: ClassStyleTable,
    expansions: usize,
    expanded_bytes: usize,
    /// Attribute positions of the element whose header is being parsed
    attr_index: AttributeIndex,
    /// Reused buffer for joining an element's text runs
    scratch: Vec<u8>,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn new(input: &'a [u8], options: &'o ParseOptions) -> Self {
        Parser {
            input,
            options,
            pool: StringPool::new(),
            entities: EntityTable::new(),
            styles: ClassStyleTable::new(),
            expansions: 0,
            expanded_bytes: 0,
            attr_index: AttributeIndex::default(),
            scratch: Vec::new(),
        }
    }

    fn run(&mut self) -> (Option<Element>, Option<Element>, Option<ParseError>) {
        let mut s = Scanner::new(self.input);
        let mut header = None;
        if let Err(err) = self.parse_prolog(&mut s, &mut header) {
            return (None, header, Some(err));
        }
        let mut out = Vec::with_capacity(1);
        let result = self.parse_element(&mut s, 0, &mut out);
        (out.pop(), header, result.err())
    }

    /// Everything before the root: header, DOCTYPE, comments, PIs and
    /// any leading junk. Leaves the scanner on `<svg`.
    fn parse_prolog(
        &mut self,
        s: &mut Scanner<'a>,
        header: &mut Option<Element>,
    ) -> Result<(), ParseError> {
        loop {
            s.skip_blanks();
            let pos = s.position();
            if s.is_eof() {
                return Err(ParseError::MissingRoot { position: pos });
            }

            if s.starts_with_ignore_case(b"<?xml") && s.peek_at(5).is_some_and(|b| b <= b' ') {
                let mut el = Element::named(self.input, Span::from_range(pos + 2, pos + 5));
                s.advance(5);
                self.attr_index.clear();
                self.parse_attributes(s, &mut el, pos)?;
                if !s.starts_with(b"?>") {
                    return Err(ParseError::Unterminated { what: "xml declaration", position: pos });
                }
                s.advance(2);
                *header = Some(el);
            } else if s.starts_with_ignore_case(b"<!DOCTYPE") {
                if parse_doctype(s, &mut self.entities).is_none() {
                    return Err(ParseError::Unterminated { what: "DOCTYPE", position: pos });
                }
                trace!(entities = self.entities.len(), "DOCTYPE parsed");
            } else if s.starts_with(b"<!--") {
                skip_past(s, b"<!--", b"-->", "comment")?;
            } else if s.starts_with(b"<?") {
                skip_past(s, b"<?", b"?>", "processing instruction")?;
            } else if s.starts_with_ignore_case(b"<svg") && !s.peek_at(4).is_some_and(is_name_char) {
                return Ok(());
            } else {
                s.advance(1);
                match s.find_byte(b'<') {
                    Some(next) => s.set_position(next),
                    None => return Err(ParseError::MissingRoot { position: s.end() }),
                }
            }
        }
    }

    /// Parse the element at `<` and push it onto `out`. On failure the
    /// partially built element is pushed all the same.
    fn parse_element(
        &mut self,
        s: &mut Scanner<'a>,
        depth: usize,
        out: &mut Vec<Element>,
    ) -> Result<(), ParseError> {
        let start = s.position();
        s.advance(1);
        let Some(name) = s.read_name() else {
            return Err(ParseError::MalformedTag { position: start });
        };
        let mut el = Element::named(self.input, name);
        let result = self.parse_element_body(s, depth, start, &mut el);
        out.push(el);
        result
    }

    fn parse_element_body(
        &mut self,
        s: &mut Scanner<'a>,
        depth: usize,
        start: usize,
        el: &mut Element,
    ) -> Result<(), ParseError> {
        let input = self.input;
        self.attr_index.clear();

        // element-type rules go in first so explicit attributes override them
        let default_style = self.styles.lookup(el.name.slice(input));
        if !default_style.is_empty() {
            let span = self.pool.intern(default_style);
            self.apply_declarations(el, Origin::Pool, span);
        }

        let pending = self.parse_attributes(s, el, start)?;

        if let Some(class) = pending.class {
            for token in class.slice(input).split(u8::is_ascii_whitespace) {
                if !token.is_empty() {
                    self.apply_rule(el, b'.', token);
                }
            }
        }
        if let Some(style) = pending.style {
            self.apply_declarations(el, Origin::Input, style);
        }
        if let Some(id) = pending.id {
            self.apply_rule(el, b'#', id.slice(input).trim_ascii());
        }

        if s.eat(b'/') {
            if !s.eat(b'>') {
                return Err(ParseError::MalformedTag { position: s.position() });
            }
            el.self_closed = true;
            return Ok(());
        }
        if !s.eat(b'>') {
            return Err(ParseError::MalformedTag { position: s.position() });
        }

        let mut runs = Vec::new();
        let result = self.parse_content(s, el, &mut runs, depth, 0);
        self.finish_text(el, &runs);
        if matches!(result, Ok(true)) && !el.kind.is_text_content() {
            self.trim_text(el);
        }
        result.map(|_| ())
    }

    /// Read `name="value"` pairs up to `>`, `/` or `?` (not consumed)
    fn parse_attributes(
        &mut self,
        s: &mut Scanner<'a>,
        el: &mut Element,
        tag_start: usize,
    ) -> Result<PendingStyle, ParseError> {
        let input = self.input;
        let mut pending = PendingStyle::default();

        loop {
            s.skip_blanks();
            match s.peek() {
                None => return Err(ParseError::Unterminated { what: "tag", position: tag_start }),
                Some(b'>' | b'/' | b'?') => return Ok(pending),
                Some(_) => {}
            }

            let attr_start = s.position();
            let Some(name) = s.read_name() else {
                return Err(ParseError::MalformedAttribute { position: attr_start });
            };
            s.skip_blanks();
            if !s.eat(b'=') {
                return Err(ParseError::MalformedAttribute { position: attr_start });
            }
            s.skip_blanks();
            let Some(value) = s.parse_quoted() else {
                return Err(match s.peek() {
                    Some(b'"' | b'\'') => ParseError::Unterminated {
                        what: "attribute value",
                        position: s.position(),
                    },
                    _ => ParseError::MalformedAttribute { position: attr_start },
                });
            };

            let name_bytes = name.slice(input);
            let kind = AttributeKind::from_name(name_bytes);
            match kind {
                AttributeKind::Style => {
                    pending.style = Some(value);
                    continue;
                }
                AttributeKind::Class => pending.class = Some(value),
                AttributeKind::Id => pending.id = Some(value),
                _ => {}
            }

            let attr = Attribute {
                name: ByteRef::input(name),
                hash: name_hash(name_bytes),
                kind,
                value: ByteRef::input(self.expand_value(value)),
            };
            el.insert_attribute(attr, &mut self.attr_index, input, self.pool.bytes());
        }
    }

    /// A value that is exactly one DOCTYPE entity reference takes the
    /// entity's replacement text
    fn expand_value(&self, value: Span) -> Span {
        let bytes = value.slice(self.input);
        match self.entity_ref(bytes) {
            Some((len, replacement)) if len == bytes.len() => replacement,
            _ => value,
        }
    }

    /// Apply the table rule stored under `prefix` + `name`
    fn apply_rule(&mut self, el: &mut Element, prefix: u8, name: &[u8]) {
        let text = self.styles.lookup_prefixed(prefix, name);
        if text.is_empty() {
            return;
        }
        let span = self.pool.intern(text);
        self.apply_declarations(el, Origin::Pool, span);
    }

    /// Apply `name:value;...` text as attributes
    fn apply_declarations(&mut self, el: &mut Element, origin: Origin, span: Span) {
        let input = self.input;
        let pool = self.pool.bytes();
        let buffer = match origin {
            Origin::Input => input,
            Origin::Pool => pool,
        };
        for decl in Declarations::in_span(buffer, span) {
            let name = decl.name.slice(buffer);
            let mut cursor = Scanner::for_span(buffer, decl.name);
            let hash = match cursor.parse_name_hash() {
                Some(hash) if cursor.is_eof() => hash,
                _ => name_hash(name),
            };
            let attr = Attribute {
                name: ByteRef { origin, span: decl.name },
                hash,
                kind: AttributeKind::from_hashed(hash, name),
                value: ByteRef { origin, span: decl.value },
            };
            el.insert_attribute(attr, &mut self.attr_index, input, pool);
        }
    }

    /// Parse content until the element's closing tag (true) or, inside an
    /// entity expansion, the end of the replacement text (false)
    fn parse_content(
        &mut self,
        s: &mut Scanner<'a>,
        el: &mut Element,
        runs: &mut Vec<Span>,
        depth: usize,
        entity_depth: usize,
    ) -> Result<bool, ParseError> {
        let input = self.input;

        loop {
            let pos = s.position();
            let Some(b) = s.peek() else {
                if entity_depth > 0 {
                    return Ok(false);
                }
                return Err(ParseError::Unterminated {
                    what: "element",
                    position: el.name.start().saturating_sub(1),
                });
            };

            if b == b'<' {
                if s.starts_with(b"<!--") {
                    skip_past(s, b"<!--", b"-->", "comment")?;
                } else if s.starts_with(b"<![CDATA[") {
                    s.advance(9);
                    let Some(end) = s.find_seq(b"]]>") else {
                        return Err(ParseError::Unterminated { what: "CDATA section", position: pos });
                    };
                    s.set_position(end + 3);
                    self.add_text(el, runs, Span::from_range(pos + 9, end), true);
                } else if s.starts_with(b"<!") {
                    let Some(end) = s.find_tag_end_quoted() else {
                        return Err(ParseError::Unterminated { what: "declaration", position: pos });
                    };
                    s.set_position(end + 1);
                } else if s.starts_with(b"<?") {
                    skip_past(s, b"<?", b"?>", "processing instruction")?;
                } else if s.starts_with(b"</") {
                    if entity_depth > 0 {
                        return Err(ParseError::MalformedTag { position: pos });
                    }
                    s.advance(2);
                    let name = s.read_name();
                    s.skip_blanks();
                    let matches = name.is_some_and(|n| eq_ignore_case(n.slice(input), el.name.slice(input)));
                    if !matches || !s.eat(b'>') {
                        return Err(ParseError::MismatchedClosingTag {
                            expected: String::from_utf8_lossy(el.name.slice(input)).into_owned(),
                            position: pos,
                        });
                    }
                    return Ok(true);
                } else {
                    if depth >= self.options.max_depth {
                        return Err(ParseError::NestingTooDeep {
                            limit: self.options.max_depth,
                            position: pos,
                        });
                    }
                    self.parse_element(s, depth + 1, &mut el.children)?;
                }
                continue;
            }

            if b == b'&' {
                if let Some((len, replacement)) = self.entity_ref(s.remaining()) {
                    s.advance(len);
                    self.expand_entity(el, runs, pos, len, replacement, depth, entity_depth)?;
                    continue;
                }
            }

            let end = self.text_run_end(s);
            s.set_position(end);
            self.add_text(el, runs, Span::from_range(pos, end), false);
        }
    }

    /// Parse an entity's replacement text as if it appeared in place
    #[allow(clippy::too_many_arguments)]
    fn expand_entity(
        &mut self,
        el: &mut Element,
        runs: &mut Vec<Span>,
        pos: usize,
        len: usize,
        replacement: Span,
        depth: usize,
        entity_depth: usize,
    ) -> Result<(), ParseError> {
        let bytes = self.expanded_bytes + replacement.len as usize;
        if entity_depth >= self.options.max_entity_depth
            || self.expansions >= MAX_ENTITY_EXPANSIONS
            || bytes > MAX_EXPANDED_BYTES
        {
            warn!(position = pos, entity_depth, "entity expansion limit reached, reference kept as text");
            self.add_text(el, runs, Span::from_range(pos, pos + len), false);
            return Ok(());
        }
        self.expansions += 1;
        self.expanded_bytes = bytes;
        trace!(position = pos, len = replacement.len, "expanding entity");
        let mut inner = Scanner::for_span(self.input, replacement);
        self.parse_content(&mut inner, el, runs, depth, entity_depth + 1)?;
        Ok(())
    }

    /// `(reference length, replacement)` for a declared `&name;` at the
    /// start of `bytes`
    fn entity_ref(&self, bytes: &[u8]) -> Option<(usize, Span)> {
        if self.entities.is_empty() {
            return None;
        }
        let name = entity_name(bytes)?;
        let decl = self.entities.lookup(self.input, name)?;
        Some((name.len() + 2, decl.value))
    }

    /// End of the text run at the cursor: the next `<`, or the next
    /// reference to a declared entity. Character references stay in the
    /// run and are decoded on access.
    fn text_run_end(&self, s: &Scanner<'a>) -> usize {
        let input = self.input;
        let start = s.position();
        let mut cursor = s.clone();
        loop {
            match cursor.find_byte2(b'<', b'&') {
                None => return cursor.end(),
                Some(p) if input[p] == b'<' => return p,
                Some(p) => {
                    if p > start && self.entity_ref(&input[p..cursor.end()]).is_some() {
                        return p;
                    }
                    cursor.set_position(p + 1);
                }
            }
        }
    }

    /// Attach character content to `el` according to its kind. Blank
    /// runs only matter inside text content. Runs that become the
    /// element's own text are collected in `runs` until it closes.
    fn add_text(&mut self, el: &mut Element, runs: &mut Vec<Span>, text: Span, cdata: bool) {
        if text.is_empty() {
            return;
        }
        let blank = text.trim(self.input).is_empty();
        match el.kind {
            kind if kind.splits_text() => {
                el.children.push(Element::anonymous(ByteRef::input(text)));
            }
            ElementKind::TextPath => runs.push(text),
            ElementKind::Style if !blank => {
                parse_style_sheet(self.input, text, &mut self.styles);
                runs.push(text);
            }
            _ if cdata || !blank => runs.push(text),
            _ => {}
        }
    }

    /// Set the element text from its collected runs. A single run stays a
    /// span into the input; several are joined into the pool once.
    fn finish_text(&mut self, el: &mut Element, runs: &[Span]) {
        match runs {
            [] => {}
            [only] => el.text = ByteRef::input(*only),
            _ => {
                self.scratch.clear();
                for run in runs {
                    self.scratch.extend_from_slice(run.slice(self.input));
                }
                el.text = ByteRef::pool(self.pool.intern(&self.scratch));
            }
        }
    }

    /// Drop leading and trailing blanks from the collected text
    fn trim_text(&self, el: &mut Element) {
        let buffer = match el.text.origin {
            Origin::Input => self.input,
            Origin::Pool => self.pool.bytes(),
        };
        el.text.span = el.text.span.trim(buffer);
    }
}

/// Skip `open ... close`, leaving the cursor after `close`
fn skip_past(
    s: &mut Scanner<'_>,
    open: &[u8],
    close: &[u8],
    what: &'static str,
) -> Result<(), ParseError> {
    let position = s.position();
    s.advance(open.len());
    match s.find_seq(close) {
        Some(end) => {
            s.set_position(end + close.len());
            Ok(())
        }
        None => Err(ParseError::Unterminated { what, position }),
    }
}
