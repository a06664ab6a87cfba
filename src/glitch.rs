use rand::Rng;

use crate::constants::{GLITCH_DEFAULT_INTENSITY, GLITCH_MAX_INTENSITY};
use crate::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlitchSettings {
    pub enabled: bool,
    intensity: u8,
}

impl Default for GlitchSettings {
    fn default() -> Self {
        Self { enabled: false, intensity: GLITCH_DEFAULT_INTENSITY }
    }
}

impl GlitchSettings {
    pub fn new(enabled: bool, intensity: u8) -> Self {
        Self { enabled, intensity: intensity.min(GLITCH_MAX_INTENSITY) }
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: u8) {
        self.intensity = intensity.min(GLITCH_MAX_INTENSITY);
    }

    pub fn adjust_intensity(&mut self, delta: i16) {
        let next = (self.intensity as i16 + delta).clamp(0, GLITCH_MAX_INTENSITY as i16);
        self.intensity = next as u8;
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.intensity > 0
    }
}

/// One horizontal slice of the screen displaced sideways and tinted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlitchBand {
    pub rect: Rect,
    pub offset_x: f32,
    pub tint: [u8; 4],
}

/// Random band generator, regenerated every drawn frame.
pub struct GlitchOverlay;

impl GlitchOverlay {
    pub fn max_bands(intensity: u8) -> usize {
        intensity as usize / 10 + 1
    }

    pub fn bands<R: Rng>(rng: &mut R, area: Rect, settings: &GlitchSettings) -> Vec<GlitchBand> {
        if !settings.is_active() || area.width <= 0.0 || area.height <= 0.0 {
            return Vec::new();
        }
        let intensity = settings.intensity() as f32;
        let max_offset = area.width * intensity / 400.0;
        let max_height = (area.height * 0.08).max(1.0);
        let count = rng.random_range(0..=Self::max_bands(settings.intensity()));

        (0..count)
            .map(|_| {
                let height = rng.random_range(1.0..=max_height);
                let y = area.y + rng.random_range(0.0..=(area.height - height).max(0.0));
                let offset_x = if max_offset > 0.0 {
                    rng.random_range(-max_offset..=max_offset)
                } else {
                    0.0
                };
                let alpha = (intensity * 1.5).min(200.0) as u8;
                let tint = match rng.random_range(0..3) {
                    0 => [255, 0, 80, alpha],
                    1 => [0, 255, 200, alpha],
                    _ => [255, 255, 255, alpha / 2],
                };
                GlitchBand {
                    rect: Rect::new(area.x, y, area.width, height),
                    offset_x,
                    tint,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn inactive_settings_produce_no_bands() {
        let mut rng = StdRng::seed_from_u64(1);
        let area = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(GlitchOverlay::bands(&mut rng, area, &GlitchSettings::new(false, 80)).is_empty());
        assert!(GlitchOverlay::bands(&mut rng, area, &GlitchSettings::new(true, 0)).is_empty());
    }

    #[test]
    fn bands_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let area = Rect::new(10.0, 20.0, 800.0, 600.0);
        let settings = GlitchSettings::new(true, 100);
        for _ in 0..200 {
            let bands = GlitchOverlay::bands(&mut rng, area, &settings);
            assert!(bands.len() <= GlitchOverlay::max_bands(100));
            for band in bands {
                assert!(band.rect.y >= area.y);
                assert!(band.rect.y + band.rect.height <= area.y + area.height + 0.001);
                assert!(band.offset_x.abs() <= 800.0 * 100.0 / 400.0);
            }
        }
    }

    #[test]
    fn intensity_is_clamped() {
        let mut settings = GlitchSettings::new(true, 250);
        assert_eq!(settings.intensity(), GLITCH_MAX_INTENSITY);
        settings.adjust_intensity(-300);
        assert_eq!(settings.intensity(), 0);
        settings.adjust_intensity(10);
        assert_eq!(settings.intensity(), 10);
        settings.set_intensity(101);
        assert_eq!(settings.intensity(), GLITCH_MAX_INTENSITY);
        assert!(!settings.toggle());
    }
}
