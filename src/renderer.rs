//! Frame renderer: resolves every cell to the image for the current frame.

use crate::layout::{Cell, Grid};
use crate::manifest::Manifest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAssignment {
    pub group: String,
    pub image: Option<String>,
}

/// Per-cell image assignments, in cell order.
pub type RenderPlan = Vec<CellAssignment>;

/// Index into a sequence of `len` images for `frame_index`, if any.
pub fn frame_position(frame_index: u64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some((frame_index % len as u64) as usize)
}

/// Image shown by `group` at `frame_index`. Missing or empty groups show nothing.
pub fn resolve<'m>(manifest: &'m Manifest, group: &str, frame_index: u64) -> Option<&'m str> {
    let images = manifest.images(group)?;
    frame_position(frame_index, images.len()).map(|idx| images[idx].as_str())
}

pub fn plan(manifest: &Manifest, cells: &[Cell], frame_index: u64) -> RenderPlan {
    cells
        .iter()
        .map(|cell| CellAssignment {
            group: cell.group.clone(),
            image: resolve(manifest, &cell.group, frame_index).map(str::to_string),
        })
        .collect()
}

/// Writes `plan` into the grid's cells. Returns true if any cell changed.
pub fn apply(grid: &mut Grid, plan: &RenderPlan) -> bool {
    let mut changed = false;
    for (cell, assignment) in grid.cells_mut().iter_mut().zip(plan) {
        debug_assert_eq!(cell.group, assignment.group);
        if cell.image != assignment.image {
            cell.image = assignment.image.clone();
            changed = true;
        }
    }
    changed
}

/// Plans and applies in one step.
pub fn render(manifest: &Manifest, grid: &mut Grid, frame_index: u64) -> bool {
    let plan = plan(manifest, grid.cells(), frame_index);
    apply(grid, &plan)
}
