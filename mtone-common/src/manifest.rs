//! Audio manifest: filename → ground-truth tone
//!
//! Stored as a flat JSON object, e.g. `{"tone1.wav": 1, "tone2.wav": 2}`.

use crate::{Error, Result, Tone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from audio filename to its ground-truth tone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, Tone>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, filename: impl Into<String>, tone: Tone) {
        self.entries.insert(filename.into(), tone);
    }

    pub fn get(&self, filename: &str) -> Option<Tone> {
        self.entries.get(filename).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in evaluation order: by tone, then by filename
    pub fn entries_by_tone(&self) -> Vec<(&str, Tone)> {
        let mut entries: Vec<(&str, Tone)> = self
            .entries
            .iter()
            .map(|(name, tone)| (name.as_str(), *tone))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Read a manifest; a missing file is [`Error::NotFound`]
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                Error::NotFound(format!("manifest {}", path.display()))
            }
            _ => Error::Io(e),
        })?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
