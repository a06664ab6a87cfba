pub const RENDER_WIDTH: i32 = 1920;           // Width of the window at full size
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the window at full size
pub const FPS: u32 = 60;                      // Window refresh rate (not the slideshow frequency)

pub const DEFAULT_HZ: u32 = 4;                // Slideshow frequency on startup
pub const MIN_HZ: u32 = 1;
pub const MAX_HZ: u32 = 60;

pub const MAX_CELLS: usize = 4;               // Largest selection the grid can lay out

pub const GLITCH_MAX_INTENSITY: u8 = 100;
pub const GLITCH_DEFAULT_INTENSITY: u8 = 30;
pub const GLITCH_STEP: u8 = 10;

pub const PANEL_HIDE_DELAY: f32 = 3.0;        // Seconds of inactivity before the panel hides

// Manifest builder / renamer defaults
pub const MEDIA_DIR: &str = "media";
pub const MANIFEST_FILE: &str = "data/manifest.json";
pub const RENAME_LOG_FILE: &str = "rename_log.csv";
pub const LOW_SUFFIX: &str = "_low";
pub const GROUPS: &[&str] = &["plans", "sections", "site-plans", "diagrams"];
pub const GROUP_PREFIXES: &[(&str, &str)] = &[
    ("plans", "p"),
    ("sections", "s"),
    ("site-plans", "sp"),
    ("diagrams", "d"),
];
pub const MANIFEST_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
pub const RENAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tif", "tiff"];
pub const RENAME_START_INDEX: usize = 1;
pub const RENAME_MIN_PAD: usize = 3;
