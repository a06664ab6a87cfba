use log::info;

use crate::glitch::GlitchSettings;
use crate::layout::Grid;

/// Anything that can show a laid-out grid.
pub trait Surface {
    fn present(&mut self, grid: &Grid, frame_index: u64, glitch: &GlitchSettings);
    fn is_open(&self) -> bool;
}

/// Headless surface: logs each cell whose image changed.
#[derive(Debug, Default)]
pub struct LogSurface {
    shown: Vec<(String, Option<String>)>,
    presented: u64,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Surface for LogSurface {
    fn present(&mut self, grid: &Grid, frame_index: u64, _glitch: &GlitchSettings) {
        let current: Vec<(String, Option<String>)> = grid
            .cells()
            .iter()
            .map(|cell| (cell.group.clone(), cell.image.clone()))
            .collect();
        if current == self.shown {
            return;
        }
        let shape = grid.shape();
        for (idx, (group, image)) in current.iter().enumerate() {
            if self.shown.get(idx) != Some(&(group.clone(), image.clone())) {
                info!(
                    "[{}x{}] frame {} cell {} ({}): {}",
                    shape.columns,
                    shape.rows,
                    frame_index,
                    idx,
                    group,
                    image.as_deref().unwrap_or("-")
                );
            }
        }
        self.shown = current;
        self.presented += 1;
    }

    fn is_open(&self) -> bool {
        true
    }
}
