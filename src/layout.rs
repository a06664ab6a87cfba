//! Grid layout engine.
//!
//! Maps the number of selected groups to a fixed grid shape and owns the
//! cells bound to those groups. Cells are rebuilt wholesale on every
//! selection change.

use log::debug;

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Largest rect with the given aspect ratio centered inside `self`.
    pub fn fit(&self, content_width: f32, content_height: f32) -> Rect {
        if content_width <= 0.0 || content_height <= 0.0 {
            return Rect::new(self.x, self.y, 0.0, 0.0);
        }
        let scale = (self.width / content_width).min(self.height / content_height);
        let width = content_width * scale;
        let height = content_height * scale;
        Rect::new(
            self.x + (self.width - width) * 0.5,
            self.y + (self.height - height) * 0.5,
            width,
            height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
}

impl GridShape {
    pub const EMPTY: GridShape = GridShape { columns: 0, rows: 0 };

    pub fn for_count(count: usize) -> Result<GridShape, LayoutError> {
        let (columns, rows) = match count {
            0 => (0, 0),
            1 => (1, 1),
            2 => (2, 1),
            3 => (3, 1),
            4 => (2, 2),
            n => return Err(LayoutError::TooManyCells(n)),
        };
        Ok(GridShape { columns, rows })
    }

    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    /// CSS-style track list, e.g. `"1fr 1fr"` for two equal columns.
    pub fn column_template(&self) -> String {
        vec!["1fr"; self.columns].join(" ")
    }

    pub fn row_template(&self) -> String {
        vec!["1fr"; self.rows].join(" ")
    }

    /// Rectangle of cell `index` (row-major) inside `area`.
    pub fn cell_rect(&self, index: usize, area: Rect) -> Option<Rect> {
        if index >= self.capacity() {
            return None;
        }
        let cell_width = area.width / self.columns as f32;
        let cell_height = area.height / self.rows as f32;
        let column = index % self.columns;
        let row = index / self.columns;
        Some(Rect::new(
            area.x + column as f32 * cell_width,
            area.y + row as f32 * cell_height,
            cell_width,
            cell_height,
        ))
    }
}

/// One display slot bound to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub group: String,
    pub image: Option<String>,
}

impl Cell {
    fn new(group: String) -> Self {
        Self { group, image: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    shape: GridShape,
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self { shape: GridShape::EMPTY, cells: Vec::new() }
    }
}

impl Grid {
    /// Replaces every cell with one fresh cell per group, in the given order.
    pub fn rebuild(&mut self, selection: &[String]) -> Result<(), LayoutError> {
        let shape = GridShape::for_count(selection.len())?;
        self.shape = shape;
        self.cells = selection.iter().cloned().map(Cell::new).collect();
        debug!(
            "Grid rebuilt: {}x{} for {:?}",
            shape.columns, shape.rows, selection
        );
        Ok(())
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("g{}", i)).collect()
    }

    #[test]
    fn shape_table() {
        let expected = [(0, 0, 0), (1, 1, 1), (2, 2, 1), (3, 3, 1), (4, 2, 2)];
        for (count, columns, rows) in expected {
            assert_eq!(
                GridShape::for_count(count),
                Ok(GridShape { columns, rows }),
                "count {}",
                count
            );
        }
        assert_eq!(GridShape::for_count(5), Err(LayoutError::TooManyCells(5)));
    }

    #[test]
    fn four_groups_use_two_by_two_templates() {
        let shape = GridShape::for_count(4).unwrap();
        assert_eq!(shape.column_template(), "1fr 1fr");
        assert_eq!(shape.row_template(), "1fr 1fr");
        assert_eq!(GridShape::for_count(3).unwrap().column_template(), "1fr 1fr 1fr");
        assert_eq!(GridShape::EMPTY.column_template(), "");
    }

    #[test]
    fn rebuild_creates_one_cell_per_group_in_order() {
        let mut grid = Grid::default();
        for n in 0..=4 {
            let selection = names(n);
            grid.rebuild(&selection).unwrap();
            assert_eq!(grid.cells().len(), n);
            let groups: Vec<_> = grid.cells().iter().map(|c| c.group.clone()).collect();
            assert_eq!(groups, selection);
            assert!(grid.cells().iter().all(|c| c.image.is_none()));
        }
    }

    #[test]
    fn rebuild_discards_previous_cells() {
        let mut grid = Grid::default();
        grid.rebuild(&names(2)).unwrap();
        grid.cells_mut()[0].image = Some("x.png".into());
        grid.rebuild(&names(2)).unwrap();
        assert!(grid.cells()[0].image.is_none());
    }

    #[test]
    fn too_many_groups_leaves_grid_untouched() {
        let mut grid = Grid::default();
        grid.rebuild(&names(3)).unwrap();
        assert!(grid.rebuild(&names(5)).is_err());
        assert_eq!(grid.cells().len(), 3);
        assert_eq!(grid.shape(), GridShape { columns: 3, rows: 1 });
    }

    #[test]
    fn cell_rects_are_row_major() {
        let area = Rect::new(0.0, 0.0, 200.0, 100.0);
        let shape = GridShape::for_count(4).unwrap();
        assert_eq!(shape.cell_rect(0, area), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert_eq!(shape.cell_rect(1, area), Some(Rect::new(100.0, 0.0, 100.0, 50.0)));
        assert_eq!(shape.cell_rect(2, area), Some(Rect::new(0.0, 50.0, 100.0, 50.0)));
        assert_eq!(shape.cell_rect(4, area), None);
        assert_eq!(GridShape::EMPTY.cell_rect(0, area), None);
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        let cell = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(cell.fit(200.0, 100.0), Rect::new(0.0, 25.0, 100.0, 50.0));
        assert_eq!(cell.fit(50.0, 100.0), Rect::new(25.0, 0.0, 50.0, 100.0));
    }
}
