use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use exif::{In, Reader, Tag, Value};
use log::{debug, info, warn};
use raylib::prelude::*;

// --- Read EXIF orientation (JPEG only), 1 when absent ---
fn exif_orientation(image_path: &Path, file_bytes: &[u8], extension: &str) -> u16 {
    if extension != "jpg" && extension != "jpeg" {
        return 1;
    }
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY).map(|f| &f.value) {
            Some(Value::Short(values)) if !values.is_empty() => values[0],
            _ => 1,
        },
        Err(e) => {
            // Not fatal: draw the image as stored
            debug!("No EXIF data for {}: {}", image_path.display(), e);
            1
        }
    }
}

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D, String> {
    let file_bytes = fs::read(image_path)
        .map_err(|e| format!("Failed to read file {}: {}", image_path.display(), e))?;

    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let orientation = exif_orientation(image_path, &file_bytes, &extension);

    let mut image = Image::load_image_from_mem(&(".".to_string() + &extension), &file_bytes)
        .map_err(|e| format!("Failed to load image data for {}: {}", image_path.display(), e))?;

    // 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW; flips are ignored
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| format!("Failed to create texture for {}: {}", image_path.display(), e))?;

    // Free the CPU-side copy now that the GPU has it
    drop(image);

    Ok(texture)
}

/// Textures keyed by manifest reference.
///
/// Holds exactly the images of the selected groups: [`TextureCache::sync`]
/// loads the missing ones and frees the rest. Failed loads are remembered so
/// each broken file is reported once and the cell simply stays blank.
pub struct TextureCache {
    root: PathBuf,
    textures: HashMap<String, Option<Texture2D>>,
}

impl TextureCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root, textures: HashMap::new() }
    }

    fn ensure(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, reference: &str) {
        if self.textures.contains_key(reference) {
            return;
        }
        let path = self.root.join(reference);
        let texture = match load_texture_with_exif_rotation(rl, thread, &path) {
            Ok(texture) => {
                debug!("Loaded {} ({}x{})", path.display(), texture.width(), texture.height());
                Some(texture)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        };
        self.textures.insert(reference.to_string(), texture);
    }

    /// Loads every reference in `wanted` not yet cached and drops the others.
    pub fn sync(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, wanted: &[&str]) {
        let keep: HashSet<&str> = wanted.iter().copied().collect();
        let before = self.textures.len();
        self.textures.retain(|reference, _| keep.contains(reference.as_str()));
        let dropped = before - self.textures.len();

        for reference in wanted {
            self.ensure(rl, thread, reference);
        }
        info!("Textures ready: {} cached, {} released", self.textures.len(), dropped);
    }

    pub fn get(&self, reference: &str) -> Option<&Texture2D> {
        self.textures.get(reference).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }
}
