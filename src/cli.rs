use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::constants::{GLITCH_DEFAULT_INTENSITY, MANIFEST_FILE, MEDIA_DIR, RENAME_LOG_FILE};
use crate::controller::Frequency;
use crate::manifest::Quality;

/// Grid slideshow for grouped image sequences
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a manifest in a grid
    Play(PlayArgs),
    /// Scan a media folder and write the manifest
    Manifest(ManifestArgs),
    /// Rename media files to prefixed sequential names
    Rename(RenameArgs),
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Manifest JSON file
    #[arg(value_name = "MANIFEST", default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,

    /// Group to show on startup (repeatable, at most 4). Defaults to the first group
    #[arg(short = 'g', long = "group", value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Slideshow frequency in Hz
    #[arg(long = "hz", value_name = "HZ", default_value_t = Frequency::default(), value_parser = parse_frequency)]
    pub hz: Frequency,

    /// Which image variant to show
    #[arg(short = 'q', long = "quality", value_enum, default_value_t = Quality::High)]
    pub quality: Quality,

    /// Directory manifest references are relative to
    #[arg(short = 'r', long = "root", value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Start with the glitch overlay on
    #[arg(long = "glitch")]
    pub glitch: bool,

    /// Glitch intensity, 0-100
    #[arg(long = "glitch-intensity", value_name = "N", default_value_t = GLITCH_DEFAULT_INTENSITY,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    pub glitch_intensity: u8,

    /// Start paused
    #[arg(long = "paused")]
    pub paused: bool,

    /// Log frames instead of opening a window
    #[arg(long = "headless")]
    pub headless: bool,

    /// Stop after this many seconds (headless only)
    #[arg(long = "duration", value_name = "SECS")]
    pub duration: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Media folder holding one sub-folder per group
    #[arg(short = 'm', long = "media", value_name = "DIR", default_value = MEDIA_DIR)]
    pub media: PathBuf,

    /// Output file
    #[arg(short = 'o', long = "out", value_name = "FILE", default_value = MANIFEST_FILE)]
    pub out: PathBuf,

    /// Group to include (repeatable). Defaults to the built-in group list
    #[arg(short = 'g', long = "group", value_name = "GROUP")]
    pub groups: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Media folder holding one sub-folder per group
    #[arg(short = 'm', long = "media", value_name = "DIR", default_value = MEDIA_DIR)]
    pub media: PathBuf,

    /// Which folders to rename: `<group>` (high) or `<group>_low` (low)
    #[arg(long = "variant", value_enum, default_value_t = Quality::Low)]
    pub variant: Quality,

    /// Perform the rename (default is dry-run)
    #[arg(long = "apply")]
    pub apply: bool,

    /// Force all outputs to the .jpg extension
    #[arg(long = "jpg")]
    pub jpg: bool,

    /// Keep the original extension case (e.g. .JPG)
    #[arg(long = "preserve-ext-case")]
    pub preserve_ext_case: bool,

    /// CSV log of applied renames
    #[arg(long = "log", value_name = "FILE", default_value = RENAME_LOG_FILE)]
    pub log: PathBuf,
}

fn parse_frequency(text: &str) -> Result<Frequency, String> {
    Frequency::parse(text).map_err(|e| e.to_string())
}
