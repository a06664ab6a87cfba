//! Builds the manifest JSON from a media folder.
//!
//! Layout on disk: `<media>/<group>/` holds full-size images and
//! `<media>/<group>_low/` the reduced ones.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::constants::MANIFEST_EXTENSIONS;
use crate::manifest::{GroupEntry, ManifestDocument, Quality};

/// Sorted image paths in `dir` with an allowed extension. Missing dir is empty.
pub fn collect_images(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!("No folder at {}", dir.display());
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extensions) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|allowed| *allowed == ext)
        })
        .unwrap_or(false)
}

/// Manifest reference for a file: the path with forward slashes.
fn reference(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub fn build(media_dir: &Path, groups: &[String]) -> Result<ManifestDocument> {
    let mut document = ManifestDocument::new();
    for group in groups {
        let high = collect_images(&media_dir.join(Quality::High.folder_name(group)), MANIFEST_EXTENSIONS)?;
        let low = collect_images(&media_dir.join(Quality::Low.folder_name(group)), MANIFEST_EXTENSIONS)?;
        info!("{}: {} high, {} low", group, high.len(), low.len());
        document.insert(
            group.clone(),
            GroupEntry::Variants {
                high: high.iter().map(|p| reference(p)).collect(),
                low: low.iter().map(|p| reference(p)).collect(),
            },
        );
    }
    Ok(document)
}

pub fn write(document: &ManifestDocument, out_file: &Path) -> Result<()> {
    if let Some(parent) = out_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(document).context("Failed to serialize manifest")?;
    fs::write(out_file, json + "\n")
        .with_context(|| format!("Failed to write {}", out_file.display()))?;
    info!("Manifest written to {}", out_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn collects_sorted_images_only() {
        let dir = tempfile::tempdir().unwrap();
        let plans = dir.path().join("plans");
        touch(&plans.join("b.PNG"));
        touch(&plans.join("a.jpg"));
        touch(&plans.join("c.jpeg"));
        touch(&plans.join("notes.txt"));
        touch(&plans.join("anim.webp"));
        fs::create_dir_all(plans.join("nested.png")).unwrap();

        let found = collect_images(&plans, MANIFEST_EXTENSIONS).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.jpeg"]);
    }

    #[test]
    fn builds_high_and_low_variants_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        touch(&media.join("plans/p002.jpg"));
        touch(&media.join("plans/p001.jpg"));
        touch(&media.join("plans_low/p001.jpg"));
        touch(&media.join("diagrams/d001.png"));

        let groups = vec!["plans".to_string(), "sections".to_string(), "diagrams".to_string()];
        let document = build(&media, &groups).unwrap();
        assert_eq!(document.keys().collect::<Vec<_>>(), vec!["plans", "sections", "diagrams"]);

        let out = dir.path().join("data/manifest.json");
        write(&document, &out).unwrap();

        let high = Manifest::load(&out, Quality::High).unwrap();
        let plans = high.images("plans").unwrap();
        assert_eq!(plans.len(), 2);
        assert!(plans[0].ends_with("media/plans/p001.jpg"));
        assert!(plans[1].ends_with("media/plans/p002.jpg"));
        assert!(high.images("sections").unwrap().is_empty());

        let low = Manifest::load(&out, Quality::Low).unwrap();
        assert!(low.images("plans").unwrap()[0].ends_with("media/plans_low/p001.jpg"));
        // No low folder for diagrams: falls back to high
        assert!(low.images("diagrams").unwrap()[0].ends_with("media/diagrams/d001.png"));
    }

    #[test]
    fn written_json_uses_variant_objects() {
        let dir = tempfile::tempdir().unwrap();
        let document = build(dir.path(), &["plans".to_string()]).unwrap();
        let out = dir.path().join("m.json");
        write(&document, &out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "plans": { "high": [], "low": [] } }));
    }
}
