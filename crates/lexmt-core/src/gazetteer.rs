//! Entity gazetteers: surface-form lists per entity type.
//!
//! Used as a last-resort translation for untranslatable spans that are a
//! single named entity. See `decoder` for how a pick is cached in the
//! phrase table.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{info, warn};

use crate::lang::iso639_1;
use crate::token::{entity_type, is_begin_tag};

#[derive(Debug, thiserror::Error)]
pub enum GazetteerError {
    #[error("IO error reading {path}: {source}")]
    Io { path: String, source: io::Error },
}

#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    lists: HashMap<String, Vec<String>>,
}

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list for `entity_type`. Empty lists are not stored.
    pub fn insert(&mut self, entity_type: impl Into<String>, names: Vec<String>) {
        let entity_type = entity_type.into();
        if names.is_empty() {
            self.lists.remove(&entity_type);
        } else {
            self.lists.insert(entity_type, names);
        }
    }

    pub fn candidates(&self, entity_type: &str) -> Option<&[String]> {
        self.lists.get(entity_type).map(Vec::as_slice)
    }

    /// Uniformly random surface form for `entity_type`.
    pub fn pick(&self, entity_type: &str, rng: &mut dyn RngCore) -> Option<&str> {
        self.lists
            .get(entity_type)?
            .choose(rng)
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Entity types with at least one entry, sorted.
    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.lists.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Load `<dir>/<lang2>/<tag lowercase>` for each tag. Missing files are
    /// skipped with a warning; blank lines are dropped.
    pub fn load(dir: &Path, lang: &str, tags: &[String]) -> Result<Self, GazetteerError> {
        let lang_dir = dir.join(iso639_1(lang));
        let mut gazetteer = Self::new();
        for tag in tags {
            let path = lang_dir.join(tag.to_lowercase());
            let text = match fs::read_to_string(&path) {
                Ok(t) => t,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), "gazetteer file not found, skipping");
                    continue;
                }
                Err(source) => {
                    return Err(GazetteerError::Io {
                        path: path.display().to_string(),
                        source,
                    })
                }
            };
            let names: Vec<String> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            info!(tag = %tag, names = names.len(), path = %path.display(), "loaded gazetteer");
            gazetteer.insert(tag.clone(), names);
        }
        Ok(gazetteer)
    }
}

/// Entity type of a span if it qualifies for gazetteer fallback: the first
/// tag begins an entity and its type equals the last tag's type. Interior
/// tags are not inspected.
pub fn single_entity_type<'t>(tags: &[&'t str]) -> Option<&'t str> {
    let first = *tags.first()?;
    let last = *tags.last()?;
    if is_begin_tag(first) && entity_type(first) == entity_type(last) {
        Some(entity_type(first))
    } else {
        None
    }
}
