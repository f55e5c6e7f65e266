use crate::keymap::KeyMap;
use crate::note::NoteId;
use fnv::FnvHashSet;

/// A raw interaction, already stripped of platform event types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent<'a> {
    /// Pointer pressed on a key region carrying `note`.
    PointerDown { note: &'a str },
    /// Touch started on a key region carrying `note`.
    TouchStart { note: &'a str },
    /// Physical key went down. `repeat` is the platform's auto-repeat flag;
    /// `modified` is set when Ctrl/Meta/Alt is held.
    KeyDown {
        key: &'a str,
        repeat: bool,
        modified: bool,
    },
    KeyUp { key: &'a str },
    /// Focus left the page; every held key counts as released.
    Blur,
}

/// Resolves interaction events to the note they should play.
///
/// Physical keys trigger once per press: further key-downs for a held key are
/// swallowed until its key-up.
#[derive(Debug, Default)]
pub struct InputRouter {
    keys: KeyMap,
    held: FnvHashSet<String>,
}

impl InputRouter {
    pub fn new(keys: KeyMap) -> Self {
        Self {
            keys,
            held: FnvHashSet::default(),
        }
    }

    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    pub fn route(&mut self, event: InputEvent<'_>) -> Option<NoteId> {
        match event {
            InputEvent::PointerDown { note } | InputEvent::TouchStart { note } => {
                match note.parse::<NoteId>() {
                    Ok(n) => Some(n),
                    Err(e) => {
                        log::warn!("[keys] {e}");
                        None
                    }
                }
            }
            InputEvent::KeyDown {
                key,
                repeat,
                modified,
            } => {
                if modified {
                    return None;
                }
                let note = self.keys.note_for(key)?;
                let held_key = KeyMap::normalize(key);
                if repeat || self.held.contains(&held_key) {
                    // keep tracking it even if the first key-down was missed
                    self.held.insert(held_key);
                    return None;
                }
                self.held.insert(held_key);
                Some(note)
            }
            InputEvent::KeyUp { key } => {
                self.held.remove(&KeyMap::normalize(key));
                None
            }
            InputEvent::Blur => {
                self.held.clear();
                None
            }
        }
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&KeyMap::normalize(key))
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }
}
