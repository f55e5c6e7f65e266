use crate::error::{InstrumentError, Result};
use crate::keymap::KeyMap;
use crate::note::NoteId;
use fnv::FnvHashMap;

/// Sample file extension of the bundled piano library.
pub const SAMPLE_EXTENSION: &str = "mp3";

/// One playable note: its sample file and optional physical key label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteEntry {
    pub note: NoteId,
    pub sample_ref: String,
    pub key_label: Option<String>,
}

/// A sample to fetch: where it lives and which entry it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleSource {
    pub note: NoteId,
    pub sample_ref: String,
    pub url: String,
}

/// The note → URL map handed to the sample loader.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleManifest {
    pub base_url: String,
    pub sources: Vec<SampleSource>,
}

impl SampleManifest {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Static table of every note the instrument can sound.
///
/// Built once at startup; lookups never mutate it.
#[derive(Clone, Debug)]
pub struct NoteRegistry {
    entries: Vec<NoteEntry>,
    index: FnvHashMap<NoteId, usize>,
}

impl NoteRegistry {
    /// Every chromatic note from `low` to `high` inclusive.
    pub fn chromatic(low: NoteId, high: NoteId, keys: &KeyMap) -> Result<Self> {
        if low > high {
            return Err(InstrumentError::EmptyRange {
                low: low.to_string(),
                high: high.to_string(),
            });
        }
        let entries = (low.midi()..=high.midi())
            .filter_map(NoteId::from_midi)
            .map(|note| NoteEntry {
                note,
                sample_ref: format!("{}.{}", note.file_stem(), SAMPLE_EXTENSION),
                key_label: keys.label_for(&note),
            })
            .collect::<Vec<_>>();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.note, i))
            .collect();
        Ok(Self { entries, index })
    }

    #[inline]
    pub fn resolve(&self, note: &NoteId) -> Option<&NoteEntry> {
        self.index.get(note).map(|&i| &self.entries[i])
    }

    #[inline]
    pub fn contains(&self, note: &NoteId) -> bool {
        self.index.contains_key(note)
    }

    /// Entries in ascending pitch order.
    pub fn iter(&self) -> impl Iterator<Item = &NoteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lowest(&self) -> Option<NoteId> {
        self.entries.first().map(|e| e.note)
    }

    pub fn highest(&self) -> Option<NoteId> {
        self.entries.last().map(|e| e.note)
    }

    pub fn sample_manifest(&self, base_url: &str) -> SampleManifest {
        let base = if base_url.is_empty() || base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let sources = self
            .entries
            .iter()
            .map(|e| SampleSource {
                note: e.note,
                sample_ref: e.sample_ref.clone(),
                url: format!("{base}{}", e.sample_ref),
            })
            .collect();
        SampleManifest {
            base_url: base,
            sources,
        }
    }
}
