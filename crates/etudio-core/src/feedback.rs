use crate::note::NoteId;
use fnv::FnvHashMap;
use instant::Instant;
use smallvec::SmallVec;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
struct Mark {
    expires_at: Instant,
    generation: u64,
}

/// Notes currently shown as pressed, each with its own expiry.
///
/// Re-marking a note replaces its expiry and generation. Deferred removal
/// callbacks carry the generation they were scheduled with and only remove
/// the entry if no later mark superseded it (last mark wins).
#[derive(Debug, Default)]
pub struct PressFeedbackTracker {
    marks: FnvHashMap<NoteId, Mark>,
    next_generation: u64,
}

impl PressFeedbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `note` as pressed for `visible` from now.
    pub fn mark(&mut self, note: NoteId, visible: Duration) -> u64 {
        self.mark_at(note, visible, Instant::now())
    }

    pub fn mark_at(&mut self, note: NoteId, visible: Duration, now: Instant) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.marks.insert(
            note,
            Mark {
                expires_at: now + visible,
                generation,
            },
        );
        generation
    }

    pub fn is_active(&self, note: &NoteId) -> bool {
        self.is_active_at(note, Instant::now())
    }

    pub fn is_active_at(&self, note: &NoteId, now: Instant) -> bool {
        self.marks.get(note).is_some_and(|m| now < m.expires_at)
    }

    /// Timer callback: drop `note` if `generation` is still its latest mark.
    /// Returns whether the entry was removed.
    pub fn expire(&mut self, note: &NoteId, generation: u64) -> bool {
        match self.marks.get(note) {
            Some(m) if m.generation == generation => {
                self.marks.remove(note);
                true
            }
            _ => false,
        }
    }

    /// Drop every entry whose window has elapsed, returning the notes removed.
    pub fn sweep(&mut self, now: Instant) -> SmallVec<[NoteId; 8]> {
        let mut expired: SmallVec<[NoteId; 8]> = self
            .marks
            .iter()
            .filter(|(_, m)| now >= m.expires_at)
            .map(|(n, _)| *n)
            .collect();
        for note in &expired {
            self.marks.remove(note);
        }
        expired.sort();
        expired
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }
}
