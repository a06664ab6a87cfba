//! Manifest store: group name to ordered image references.
//!
//! The JSON document maps each group either to a plain array of image
//! references, or to the `{ "high": [...], "low": [...] }` pair written by
//! `gridshow manifest`. Variants are resolved once at load time against a
//! [`Quality`], after which the manifest is immutable.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// Which variant of a group supplies its images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Quality {
    #[default]
    High,
    Low,
}

impl Quality {
    /// Folder name for `group` under the media root.
    pub fn folder_name(self, group: &str) -> String {
        match self {
            Quality::High => group.to_string(),
            Quality::Low => format!("{}{}", group, crate::constants::LOW_SUFFIX),
        }
    }
}

/// One group entry as found in the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupEntry {
    List(Vec<String>),
    Variants {
        #[serde(default)]
        high: Vec<String>,
        #[serde(default)]
        low: Vec<String>,
    },
}

impl GroupEntry {
    /// Picks the requested variant, falling back to the other one when empty.
    fn resolve(self, quality: Quality) -> Vec<String> {
        match self {
            GroupEntry::List(images) => images,
            GroupEntry::Variants { high, low } => match quality {
                Quality::High if high.is_empty() => low,
                Quality::High => high,
                Quality::Low if low.is_empty() => high,
                Quality::Low => low,
            },
        }
    }
}

/// Raw document shape, shared with the manifest builder.
pub type ManifestDocument = IndexMap<String, GroupEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    groups: IndexMap<String, Vec<String>>,
}

impl Manifest {
    pub fn load(path: &Path, quality: Quality) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json(&text, quality)?;
        info!(
            "Loaded manifest {} ({} groups, {} images, {:?} quality)",
            path.display(),
            manifest.groups.len(),
            manifest.groups.values().map(Vec::len).sum::<usize>(),
            quality
        );
        Ok(manifest)
    }

    pub fn from_json(text: &str, quality: Quality) -> Result<Self, ManifestError> {
        let document: ManifestDocument = serde_json::from_str(text)?;
        Ok(Self::from_document(document, quality))
    }

    pub fn from_document(document: ManifestDocument, quality: Quality) -> Self {
        let groups = document
            .into_iter()
            .map(|(name, entry)| {
                let images = entry.resolve(quality);
                if images.is_empty() {
                    warn!("Group {:?} has no images", name);
                } else {
                    debug!("Group {:?}: {} images", name, images.len());
                }
                (name, images)
            })
            .collect();
        Self { groups }
    }

    /// Images of `group`, or `None` if the manifest has no such group.
    pub fn images(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Group names in document order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<S>)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (S, Vec<S>)>>(iter: I) -> Self {
        let groups = iter
            .into_iter()
            .map(|(name, images)| (name.into(), images.into_iter().map(Into::into).collect()))
            .collect();
        Self { groups }
    }
}
