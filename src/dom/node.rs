//! Element tree nodes
//!
//! Elements own their children directly. Names, attribute values and
//! text are `ByteRef`s: spans into the document input, or into the
//! document's string pool for bytes synthesized by the style cascade.
//! Accessors that return bytes take the owning `Document`.

use super::document::Document;
use super::names::{AttributeKind, ElementKind};
use crate::core::entities::{decode, decode_str};
use crate::core::hash::{eq_ignore_case, name_hash};
use crate::core::span::{ByteRef, Span};
use std::borrow::Cow;
use std::collections::HashMap;

/// A `name="value"` pair, or a style declaration applied as one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: ByteRef,
    /// `name_hash` of the lowercased name
    pub hash: u32,
    pub kind: AttributeKind,
    pub value: ByteRef,
}

impl Attribute {
    pub fn name<'d>(&self, doc: &'d Document) -> &'d [u8] {
        doc.bytes(self.name)
    }

    /// Raw value bytes, entities left as written
    pub fn value<'d>(&self, doc: &'d Document) -> &'d [u8] {
        doc.bytes(self.value)
    }

    /// Value with character entities decoded; borrows when there are none
    pub fn value_decoded<'d>(&self, doc: &'d Document) -> Cow<'d, str> {
        decode_str(self.value(doc))
    }
}

/// Element node
///
/// Anonymous elements (no name) are synthesized for text runs inside
/// `text` and `tspan`; they carry only `text`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: Span,
    pub hash: u32,
    pub kind: ElementKind,
    /// Cascade order: later entries were applied later
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
    pub text: ByteRef,
    pub self_closed: bool,
}

impl Element {
    /// Element for a name read from the input
    pub(crate) fn named(input: &[u8], name: Span) -> Self {
        let bytes = name.slice(input);
        Element {
            name,
            hash: name_hash(bytes),
            kind: ElementKind::from_name(bytes),
            ..Default::default()
        }
    }

    /// Nameless element carrying a text run
    pub(crate) fn anonymous(text: ByteRef) -> Self {
        Element { text, ..Default::default() }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    pub fn name<'d>(&self, doc: &'d Document) -> &'d [u8] {
        self.name.slice(doc.input())
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attribute of a known kind
    pub fn attribute(&self, kind: AttributeKind) -> Option<&Attribute> {
        if kind == AttributeKind::Unknown {
            return None;
        }
        self.attributes.iter().find(|a| a.kind == kind)
    }

    pub fn attribute_value<'d>(&self, doc: &'d Document, kind: AttributeKind) -> Option<&'d [u8]> {
        self.attribute(kind).map(|a| a.value(doc))
    }

    /// First attribute with this hash; collisions are not resolved
    pub fn attribute_by_hash(&self, hash: u32) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.hash == hash)
    }

    /// Attribute by name, compared ignoring ASCII case
    pub fn attribute_by_name(&self, doc: &Document, name: &[u8]) -> Option<&Attribute> {
        let hash = name_hash(name);
        self.attributes
            .iter()
            .find(|a| a.hash == hash && eq_ignore_case(a.name(doc), name))
    }

    pub fn has_attribute(&self, kind: AttributeKind) -> bool {
        self.attribute(kind).is_some()
    }

    /// Raw text bytes
    pub fn text<'d>(&self, doc: &'d Document) -> &'d [u8] {
        doc.bytes(self.text)
    }

    pub fn text_decoded<'d>(&self, doc: &'d Document) -> Cow<'d, str> {
        decode_str(self.text(doc))
    }

    /// Text with entities decoded, as bytes
    pub fn text_bytes_decoded<'d>(&self, doc: &'d Document) -> Cow<'d, [u8]> {
        decode(self.text(doc))
    }

    pub fn children(&self) -> std::slice::Iter<'_, Element> {
        self.children.iter()
    }

    /// Children that are real elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(|c| !c.is_anonymous())
    }

    /// All elements below this one, depth-first in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self.children.iter()] }
    }

    /// Set or overwrite an attribute. A name already present keeps its
    /// position and takes the new value. `index` must have been cleared
    /// before the element's first insert.
    pub(crate) fn insert_attribute(
        &mut self,
        attr: Attribute,
        index: &mut AttributeIndex,
        input: &[u8],
        pool: &[u8],
    ) {
        let first = *index.first.entry(attr.hash).or_insert(self.attributes.len());
        let name = attr.name.resolve(input, pool);
        let existing = self.attributes[first..]
            .iter_mut()
            .find(|a| a.hash == attr.hash && eq_ignore_case(a.name.resolve(input, pool), name));
        match existing {
            Some(a) => a.value = attr.value,
            None => self.attributes.push(attr),
        }
    }
}

/// Position of the first attribute with each name hash, for the element
/// whose attributes are being inserted. Only hash collisions scan further.
#[derive(Debug, Default)]
pub(crate) struct AttributeIndex {
    first: HashMap<u32, usize>,
}

impl AttributeIndex {
    pub(crate) fn clear(&mut self) {
        self.first.clear();
    }
}

/// Depth-first iterator returned by `Element::descendants`
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Element>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(el) => {
                    if !el.children.is_empty() {
                        self.stack.push(el.children.iter());
                    }
                    return Some(el);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(input: &[u8], start: usize, end: usize, value: Span) -> Attribute {
        let name = Span::from_range(start, end);
        let bytes = name.slice(input);
        Attribute {
            name: ByteRef::input(name),
            hash: name_hash(bytes),
            kind: AttributeKind::from_name(bytes),
            value: ByteRef::input(value),
        }
    }

    #[test]
    fn test_named_element() {
        let input = b"<RECT/>";
        let el = Element::named(input, Span::from_range(1, 5));
        assert_eq!(el.kind, ElementKind::Rect);
        assert_eq!(el.hash, name_hash(b"rect"));
        assert!(!el.is_anonymous());
        assert!(Element::anonymous(ByteRef::default()).is_anonymous());
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        // fill=a stroke=b FILL=c
        let input = b"fill a stroke b FILL c";
        let mut el = Element::default();
        let mut index = AttributeIndex::default();
        el.insert_attribute(attr(input, 0, 4, Span::from_range(5, 6)), &mut index, input, b"");
        el.insert_attribute(attr(input, 7, 13, Span::from_range(14, 15)), &mut index, input, b"");
        el.insert_attribute(attr(input, 16, 20, Span::from_range(21, 22)), &mut index, input, b"");
        assert_eq!(el.attributes.len(), 2);
        assert_eq!(el.attributes[0].kind, AttributeKind::Fill);
        assert_eq!(el.attributes[0].value.resolve(input, b""), b"c");
        assert_eq!(el.attributes[1].kind, AttributeKind::Stroke);
    }

    #[test]
    fn test_insert_many_distinct() {
        let mut input = Vec::new();
        let mut spans = Vec::new();
        for i in 0..500 {
            let start = input.len();
            input.extend_from_slice(format!("data-a{i}").as_bytes());
            spans.push((start, input.len()));
            input.push(b' ');
        }
        let mut el = Element::default();
        let mut index = AttributeIndex::default();
        for &(start, end) in &spans {
            el.insert_attribute(attr(&input, start, end, Span::from_range(start, end)), &mut index, &input, b"");
        }
        // same names again overwrite, in any order
        for &(start, end) in spans.iter().rev() {
            el.insert_attribute(attr(&input, start, end, Span::empty()), &mut index, &input, b"");
        }
        assert_eq!(el.attributes.len(), 500);
        assert!(el.attributes.iter().all(|a| a.value.span.is_empty()));
        assert_eq!(el.attributes[42].name.resolve(&input, b""), b"data-a42");
    }

    #[test]
    fn test_hash_collision_kept_apart() {
        let input = b"aa bb";
        let mut el = Element::default();
        let mut index = AttributeIndex::default();
        let mut a = attr(input, 0, 2, Span::from_range(0, 2));
        let mut b = attr(input, 3, 5, Span::from_range(3, 5));
        a.hash = 7;
        b.hash = 7;
        el.insert_attribute(a, &mut index, input, b"");
        el.insert_attribute(b, &mut index, input, b"");
        el.insert_attribute(a, &mut index, input, b"");
        assert_eq!(el.attributes.len(), 2);
    }

    #[test]
    fn test_descendants_order() {
        let leaf = |kind| Element { kind, name: Span::new(0, 1), ..Default::default() };
        let mut g = leaf(ElementKind::G);
        g.children = vec![leaf(ElementKind::Rect), leaf(ElementKind::Circle)];
        let mut root = leaf(ElementKind::Svg);
        root.children = vec![g, leaf(ElementKind::Path)];

        let kinds: Vec<_> = root.descendants().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::G, ElementKind::Rect, ElementKind::Circle, ElementKind::Path]
        );
        assert_eq!(root.child_elements().count(), 2);
    }

    #[test]
    fn test_unknown_kind_lookup() {
        let el = Element::default();
        assert!(el.attribute(AttributeKind::Unknown).is_none());
        assert!(!el.has_attribute(AttributeKind::Fill));
    }
}
