use crate::constants::*;
use crate::note::NoteId;
use crate::registry::NoteRegistry;

/// Clickable rectangle for one key, in CSS px relative to the keyboard.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyRegion {
    pub note: NoteId,
    pub black: bool,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub label: Option<String>,
}

impl KeyRegion {
    /// Text shown on the key: note name, plus the physical key if any.
    pub fn caption(&self) -> String {
        match &self.label {
            Some(k) if k.trim().is_empty() => format!("{} (Space)", self.note),
            Some(k) => format!("{} ({k})", self.note),
            None => self.note.to_string(),
        }
    }
}

/// Lay out every registry note as a piano keyboard: white keys side by side,
/// black keys straddling the boundary after the preceding white key.
pub fn key_layout(registry: &NoteRegistry) -> Vec<KeyRegion> {
    let mut whites_before = 0usize;
    let mut regions = Vec::with_capacity(registry.len());
    for entry in registry.iter() {
        let black = entry.note.is_black();
        let (left, width, height) = if black {
            (
                whites_before as f32 * WHITE_KEY_WIDTH - BLACK_KEY_INSET,
                BLACK_KEY_WIDTH,
                BLACK_KEY_HEIGHT,
            )
        } else {
            let left = whites_before as f32 * WHITE_KEY_WIDTH;
            whites_before += 1;
            (left, WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT)
        };
        regions.push(KeyRegion {
            note: entry.note,
            black,
            left,
            width,
            height,
            label: entry.key_label.clone(),
        });
    }
    regions
}

/// Total keyboard width: the span of the white keys.
pub fn keyboard_width(regions: &[KeyRegion]) -> f32 {
    regions.iter().filter(|r| !r.black).count() as f32 * WHITE_KEY_WIDTH
}
