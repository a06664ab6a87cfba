//! Batch renamer for media folders.
//!
//! Files in each group folder become `<prefix><index><ext>`, numbered in
//! lowercase file-name order. Applying is two-phase: every source is first
//! moved to a unique temporary name, then to its target, so targets that
//! collide with other sources never clobber them.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::warn;

use crate::constants::{GROUP_PREFIXES, RENAME_EXTENSIONS, RENAME_MIN_PAD, RENAME_START_INDEX};
use crate::manifest::Quality;
use crate::manifest_builder::has_extension;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenameOptions {
    pub force_jpg: bool,
    pub preserve_ext_case: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub from: PathBuf,
    pub to: PathBuf,
}

pub fn pad_width(items: usize) -> usize {
    let last = RENAME_START_INDEX + items.saturating_sub(1);
    RENAME_MIN_PAD.max(last.to_string().len())
}

fn target_extension(original: &Path, options: &RenameOptions) -> String {
    if options.force_jpg {
        return ".jpg".to_string();
    }
    match original.extension().and_then(|s| s.to_str()) {
        Some(ext) if options.preserve_ext_case => format!(".{}", ext),
        Some(ext) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

fn gather_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read directory {}", folder.display()))?;
    for entry in entries {
        let path = entry.context("Failed to read directory entry")?.path();
        if path.is_file() && has_extension(&path, RENAME_EXTENSIONS) {
            files.push(path);
        }
    }
    files.sort_by_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(files)
}

/// Plans renames for one folder. Files already named correctly are skipped.
pub fn plan_folder(folder: &Path, prefix: &str, options: &RenameOptions) -> Result<Vec<Move>> {
    let files = gather_files(folder)?;
    let pad = pad_width(files.len());
    let moves = files
        .into_iter()
        .enumerate()
        .filter_map(|(i, from)| {
            let name = format!(
                "{}{:0pad$}{}",
                prefix,
                RENAME_START_INDEX + i,
                target_extension(&from, options),
                pad = pad
            );
            let to = folder.join(name);
            (from != to).then_some(Move { from, to })
        })
        .collect();
    Ok(moves)
}

/// Plans renames for every known group folder of `variant` under `root`.
pub fn plan(root: &Path, variant: Quality, options: &RenameOptions) -> Result<Vec<Move>> {
    if !root.is_dir() {
        bail!("Media root not found: {}", root.display());
    }
    let mut moves = Vec::new();
    for (group, prefix) in GROUP_PREFIXES {
        let folder = root.join(variant.folder_name(group));
        if !folder.is_dir() {
            continue;
        }
        moves.extend(plan_folder(&folder, prefix, options)?);
    }
    Ok(moves)
}

/// Performs `moves` and records each one in a CSV log at `log_file`.
///
/// If moving files aside fails, the files already moved are put back. If a
/// final rename fails, every file still under a temporary name is written to
/// the log as `old_path,temp_path` before the error is returned.
pub fn apply(moves: &[Move], log_file: &Path) -> Result<()> {
    if moves.is_empty() {
        println!("Nothing to rename.");
        return Ok(());
    }

    let mut log = fs::File::create(log_file)
        .with_context(|| format!("Failed to create {}", log_file.display()))?;
    writeln!(log, "old_path,new_path")?;

    let temps = move_aside(moves)?;

    for (done, (mv, temp)) in moves.iter().zip(&temps).enumerate() {
        if let Err(e) = finish_move(mv, temp) {
            for (pending, temp) in moves[done..].iter().zip(&temps[done..]) {
                writeln!(log, "{},{}", csv_field(&pending.from), csv_field(temp))?;
            }
            return Err(e.context(format!(
                "Rename stopped; files left under temporary names are listed in {}",
                log_file.display()
            )));
        }
        writeln!(log, "{},{}", csv_field(&mv.from), csv_field(&mv.to))?;
        println!("{}  ->  {}", mv.from.display(), mv.to.display());
    }

    println!("Done. Log written to {}", log_file.display());
    Ok(())
}

// Phase one: every source gets a unique temporary name
fn move_aside(moves: &[Move]) -> Result<Vec<PathBuf>> {
    let mut temps: Vec<PathBuf> = Vec::with_capacity(moves.len());
    for mv in moves {
        let name = mv.from.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let temp = mv.from.with_file_name(format!("__tmp__{}__{}", uuid::Uuid::new_v4().simple(), name));
        if let Err(e) = fs::rename(&mv.from, &temp) {
            for (moved, temp) in moves.iter().zip(&temps) {
                if let Err(undo) = fs::rename(temp, &moved.from) {
                    warn!("Could not restore {} from {}: {}", moved.from.display(), temp.display(), undo);
                }
            }
            return Err(e).with_context(|| format!("Failed to move {} aside", mv.from.display()));
        }
        temps.push(temp);
    }
    Ok(temps)
}

// Phase two: one temporary name to its target
fn finish_move(mv: &Move, temp: &Path) -> Result<()> {
    if let Some(parent) = mv.to.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    if mv.to.exists() {
        warn!("Replacing existing {}", mv.to.display());
        fs::remove_file(&mv.to)?;
    }
    fs::rename(temp, &mv.to)
        .with_context(|| format!("Failed to rename {} -> {}", mv.from.display(), mv.to.display()))
}

pub fn print_dry_run(moves: &[Move]) {
    if moves.is_empty() {
        println!("Nothing to rename.");
        return;
    }
    for mv in moves {
        println!("[dry-run] {}  ->  {}", mv.from.display(), mv.to.display());
    }
    println!("\n(Dry-run) No files changed. Re-run with --apply to rename.");
}

fn csv_field(path: &Path) -> String {
    let text = path.to_string_lossy();
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.into_owned()
    }
}
