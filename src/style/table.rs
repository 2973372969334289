//! Selector → style text table
//!
//! Keys are compared ignoring ASCII case. The table does not interpret
//! keys: callers pass `.name` for classes, `#name` for ids, and bare
//! element names for type selectors.

use std::collections::HashMap;

/// Name → accumulated `name:value;...` text
#[derive(Debug, Clone, Default)]
pub struct ClassStyleTable {
    entries: HashMap<Box<[u8]>, Vec<u8>>,
}

impl ClassStyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add style text under `name`. A name seen before gets the text
    /// appended after a `;` separator (unless it already ends in one).
    pub fn add_or_append(&mut self, name: &[u8], style: &[u8]) {
        let style = trim(style);
        let key: Box<[u8]> = name.to_ascii_lowercase().into_boxed_slice();
        match self.entries.get_mut(&key) {
            Some(existing) => {
                if style.is_empty() {
                    return;
                }
                if !existing.is_empty() && !trim(existing).ends_with(b";") {
                    existing.push(b';');
                }
                existing.extend_from_slice(style);
            }
            None => {
                self.entries.insert(key, style.to_vec());
            }
        }
    }

    /// Style text for `name`, empty if absent
    pub fn lookup(&self, name: &[u8]) -> &[u8] {
        if name.is_empty() || self.entries.is_empty() {
            return b"";
        }
        let found = if name.iter().any(u8::is_ascii_uppercase) {
            self.entries.get(name.to_ascii_lowercase().as_slice())
        } else {
            self.entries.get(name)
        };
        found.map(Vec::as_slice).unwrap_or(b"")
    }

    /// Look up `prefix` + `name` (`.` for classes, `#` for ids)
    /// without the caller building the key
    pub fn lookup_prefixed(&self, prefix: u8, name: &[u8]) -> &[u8] {
        let mut key = Vec::with_capacity(name.len() + 1);
        key.push(prefix);
        key.extend_from_slice(name);
        self.lookup(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.entries.iter().map(|(k, v)| (&k[..], v.as_slice()))
    }
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b > b' ').unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| b > b' ').map_or(start, |i| i + 1);
    &bytes[start..end]
}
