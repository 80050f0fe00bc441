//! Color interning: escape sequences ↔ small integer ids.
//!
//! The first occurrence of an escape string gets the next id; repeats reuse it. Painting
//! compares ids, never strings. A table belongs to one editor instance.

use ahash::AHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorId(pub u16);

#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    by_seq: AHashMap<String, ColorId>,
    seqs: Vec<String>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, seq: &str) -> ColorId {
        if let Some(id) = self.by_seq.get(seq) {
            return *id;
        }
        let id = ColorId(self.seqs.len() as u16);
        self.seqs.push(seq.to_string());
        self.by_seq.insert(seq.to_string(), id);
        id
    }

    /// Escape sequence for `id` ("" for an id this table never issued).
    pub fn seq(&self, id: ColorId) -> &str {
        self.seqs.get(id.0 as usize).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
}
