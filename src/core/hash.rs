//! Name hashing for element/attribute dispatch
//!
//! Names are compared by a Jenkins one-at-a-time hash over their ASCII
//! lowercased bytes. The same `const fn` computes the hashes baked into
//! the dispatch tables in `dom::names` and the hashes of names read at
//! runtime, so the two can never drift apart.

const LOWER_TABLE: [u8; 256] = build_lowercase_table();

/// ASCII lowercase lookup table (non-letters map to themselves)
pub static LOWERCASE: [u8; 256] = LOWER_TABLE;

const fn build_lowercase_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[i] = if b >= b'A' && b <= b'Z' { b + 32 } else { b };
        i += 1;
    }
    table
}

/// Lowercase a single byte
#[inline]
pub const fn lower(b: u8) -> u8 {
    LOWER_TABLE[b as usize]
}

/// Incremental hasher, for building a hash while scanning
#[derive(Debug, Clone, Copy, Default)]
pub struct NameHasher {
    state: u32,
}

impl NameHasher {
    #[inline]
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    /// Mix one byte (lowercased) into the hash
    #[inline]
    pub const fn push(mut self, b: u8) -> Self {
        let mut h = self.state;
        h = h.wrapping_add(lower(b) as u32);
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
        self.state = h;
        self
    }

    /// Final avalanche
    #[inline]
    pub const fn finish(self) -> u32 {
        let mut h = self.state;
        h = h.wrapping_add(h << 3);
        h ^= h >> 11;
        h = h.wrapping_add(h << 15);
        h
    }
}

/// Hash a name, ignoring ASCII case
pub const fn name_hash(bytes: &[u8]) -> u32 {
    let mut hasher = NameHasher::new();
    let mut i = 0;
    while i < bytes.len() {
        hasher = hasher.push(bytes[i]);
        i += 1;
    }
    hasher.finish()
}

/// Case-insensitive ASCII byte comparison
#[inline]
pub fn eq_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_ignores_case() {
        let names: [&[u8]; 5] = [b"rect", b"viewBox", b"STROKE-WIDTH", b"xlink:href", b""];
        for name in names {
            assert_eq!(name_hash(name), name_hash(&name.to_ascii_lowercase()));
            assert_eq!(name_hash(name), name_hash(&name.to_ascii_uppercase()));
        }
    }

    #[test]
    fn test_hash_deterministic() {
        const RECT: u32 = name_hash(b"rect");
        assert_eq!(RECT, name_hash(b"rect"));
        assert_eq!(name_hash(b"path"), name_hash(b"path"));
    }

    #[test]
    fn test_hash_order_dependent() {
        assert_ne!(name_hash(b"ab"), name_hash(b"ba"));
        assert_ne!(name_hash(b"rect"), name_hash(b"path"));
    }

    #[test]
    fn test_empty_hash_is_zero() {
        assert_eq!(name_hash(b""), 0);
    }

    #[test]
    fn test_incremental_matches_whole() {
        let h = b"Circle"
            .iter()
            .fold(NameHasher::new(), |h, &b| h.push(b))
            .finish();
        assert_eq!(h, name_hash(b"circle"));
    }

    #[test]
    fn test_lowercase_table() {
        assert_eq!(lower(b'Q'), b'q');
        assert_eq!(lower(b'q'), b'q');
        assert_eq!(lower(b'-'), b'-');
        assert_eq!(lower(0xC3), 0xC3);
    }
}
