use crate::note::{NoteId, PitchClass::*};
use fnv::FnvHashMap;

/// Physical keyboard layout: three rows of keys spanning C3..F6 chromatically.
/// Digits and the home row carry the sharps.
pub const KEY_TABLE: [(&str, NoteId); 42] = [
    ("q", NoteId::new(C, 3)),
    ("1", NoteId::new(CSharp, 3)),
    ("w", NoteId::new(D, 3)),
    ("2", NoteId::new(DSharp, 3)),
    ("e", NoteId::new(E, 3)),
    ("r", NoteId::new(F, 3)),
    ("3", NoteId::new(FSharp, 3)),
    ("t", NoteId::new(G, 3)),
    ("4", NoteId::new(GSharp, 3)),
    ("y", NoteId::new(A, 3)),
    ("5", NoteId::new(ASharp, 3)),
    ("u", NoteId::new(B, 3)),
    ("i", NoteId::new(C, 4)),
    ("6", NoteId::new(CSharp, 4)),
    ("o", NoteId::new(D, 4)),
    ("7", NoteId::new(DSharp, 4)),
    ("p", NoteId::new(E, 4)),
    ("[", NoteId::new(F, 4)),
    ("8", NoteId::new(FSharp, 4)),
    ("]", NoteId::new(G, 4)),
    ("9", NoteId::new(GSharp, 4)),
    ("\\", NoteId::new(A, 4)),
    ("0", NoteId::new(ASharp, 4)),
    ("'", NoteId::new(B, 4)),
    ("z", NoteId::new(C, 5)),
    ("s", NoteId::new(CSharp, 5)),
    ("x", NoteId::new(D, 5)),
    ("d", NoteId::new(DSharp, 5)),
    ("c", NoteId::new(E, 5)),
    ("v", NoteId::new(F, 5)),
    ("g", NoteId::new(FSharp, 5)),
    ("b", NoteId::new(G, 5)),
    ("h", NoteId::new(GSharp, 5)),
    ("n", NoteId::new(A, 5)),
    ("j", NoteId::new(ASharp, 5)),
    ("m", NoteId::new(B, 5)),
    (",", NoteId::new(C, 6)),
    ("l", NoteId::new(CSharp, 6)),
    (".", NoteId::new(D, 6)),
    (";", NoteId::new(DSharp, 6)),
    ("/", NoteId::new(E, 6)),
    (" ", NoteId::new(F, 6)),
];

/// Bidirectional lookup over [`KEY_TABLE`].
#[derive(Clone, Debug)]
pub struct KeyMap {
    by_key: FnvHashMap<&'static str, NoteId>,
    by_note: FnvHashMap<NoteId, &'static str>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl KeyMap {
    pub fn standard() -> Self {
        Self::from_table(&KEY_TABLE)
    }

    pub fn from_table(table: &[(&'static str, NoteId)]) -> Self {
        let mut by_key = FnvHashMap::default();
        let mut by_note = FnvHashMap::default();
        for &(key, note) in table {
            by_key.insert(key, note);
            by_note.insert(note, key);
        }
        Self { by_key, by_note }
    }

    /// Canonical form of a `KeyboardEvent.key` value: single ASCII letters
    /// are lower-cased so Shift / Caps Lock still play the same note.
    pub fn normalize(key: &str) -> String {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => c.to_ascii_lowercase().to_string(),
            _ => key.to_string(),
        }
    }

    #[inline]
    pub fn note_for(&self, key: &str) -> Option<NoteId> {
        self.by_key.get(Self::normalize(key).as_str()).copied()
    }

    /// Display label for a note's physical key, upper-cased (`q` → `Q`).
    pub fn label_for(&self, note: &NoteId) -> Option<String> {
        self.by_note.get(note).map(|k| k.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
