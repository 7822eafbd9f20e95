/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It divides the window into square cells at least as wide as the vision
 * radius, so every boid within range of another lies in the surrounding 3x3
 * block of cells. The query is therefore exact: the explicit distance check
 * only removes the corners of the block that fall outside the circle.
 *
 * Optimized for performance by:
 * - Reusing cell storage across ticks instead of reallocating
 * - Returning query results from a scratch buffer owned by the grid
 * - Clamping coordinates so out-of-window positions still land in a cell
 */

use crate::boid::Boid;
use crate::error::ConfigError;
use crate::params::SimulationParams;

// Upper bound on cols * rows; larger grids are a configuration error
pub const MAX_GRID_CELLS: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub col: usize,
    pub row: usize,
}

pub struct SpatialGrid {
    cell_size: f64,
    cols: usize,
    rows: usize,
    radius_squared: f64,
    // Row-major cells holding indices into the boid slice
    cells: Vec<Vec<usize>>,
    // Scratch buffer backing `query_neighbors`
    neighbor_cache: Vec<usize>,
}

impl SpatialGrid {
    pub fn new(vision_radius: f64, width: f64, height: f64) -> Result<Self, ConfigError> {
        let cell_size = vision_radius.ceil();
        let (cols, rows) = grid_dimensions(cell_size, width, height)?;

        let mut cells = Vec::with_capacity(cols * rows);
        cells.resize_with(cols * rows, Vec::new);

        tracing::debug!(cell_size, cols, rows, "built spatial grid");

        Ok(Self {
            cell_size,
            cols,
            rows,
            radius_squared: vision_radius * vision_radius,
            cells,
            // 9 cells with a handful of boids each
            neighbor_cache: Vec::with_capacity(9 * 8),
        })
    }

    pub fn from_params(params: &SimulationParams) -> Result<Self, ConfigError> {
        Self::new(params.vision_radius, params.window_width, params.window_height)
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn radius_squared(&self) -> f64 {
        self.radius_squared
    }

    // Convert world coordinates to a grid cell, clamped to the grid
    #[inline]
    pub fn cell_coords(&self, x: f64, y: f64) -> CellCoord {
        CellCoord {
            col: axis_cell(x, self.cell_size, self.cols),
            row: axis_cell(y, self.cell_size, self.rows),
        }
    }

    #[inline]
    fn cell_index(&self, cell: CellCoord) -> usize {
        cell.row * self.cols + cell.col
    }

    pub fn cell(&self, cell: CellCoord) -> &[usize] {
        &self.cells[self.cell_index(cell)]
    }

    // Number of entries across all cells
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    // Clear the grid, keeping each cell's allocation
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    // Insert a boid into the grid and record the cell on the boid
    #[inline]
    pub fn insert(&mut self, index: usize, boid: &mut Boid) {
        let cell = self.cell_coords(boid.position.x, boid.position.y);
        let cell_index = self.cell_index(cell);
        self.cells[cell_index].push(index);
        boid.cell = Some(cell);
    }

    // Clear and reinsert every boid; afterwards each boid is in exactly one cell
    pub fn populate(&mut self, boids: &mut [Boid]) {
        self.clear();
        for (i, boid) in boids.iter_mut().enumerate() {
            self.insert(i, boid);
        }
    }

    /// Moves a boid to the cell containing its current position, using the
    /// cell it recorded on its last insertion. Boids without a recorded cell
    /// are inserted. Returns whether the grid changed.
    ///
    /// Only valid while the grid still holds the boid at its recorded cell,
    /// i.e. not after a `clear` without repopulating.
    pub fn relocate(&mut self, index: usize, boid: &mut Boid) -> bool {
        let new_cell = self.cell_coords(boid.position.x, boid.position.y);

        match boid.cell {
            Some(old_cell) if old_cell == new_cell => false,
            Some(old_cell) => {
                let old_index = self.cell_index(old_cell);
                let slot = &mut self.cells[old_index];
                if let Some(position) = slot.iter().position(|&i| i == index) {
                    slot.swap_remove(position);
                }

                let new_index = self.cell_index(new_cell);
                self.cells[new_index].push(index);
                boid.cell = Some(new_cell);
                true
            }
            None => {
                self.insert(index, boid);
                true
            }
        }
    }

    /// Appends to `out` the indices of every boid within the vision radius of
    /// `boids[index]` (inclusive), excluding the boid itself. `out` is cleared
    /// first. Takes `&self` so workers can share the grid with their own buffers.
    pub fn collect_neighbors(&self, boids: &[Boid], index: usize, out: &mut Vec<usize>) {
        out.clear();

        let boid = &boids[index];
        let center = boid
            .cell
            .unwrap_or_else(|| self.cell_coords(boid.position.x, boid.position.y));

        let cols = self.cols as isize;
        let rows = self.rows as isize;

        // Check the cell and its neighbors (3x3 grid)
        for row_offset in -1..=1 {
            let row = center.row as isize + row_offset;
            if row < 0 || row >= rows {
                continue;
            }

            for col_offset in -1..=1 {
                let col = center.col as isize + col_offset;
                if col < 0 || col >= cols {
                    continue;
                }

                let cell_index = row as usize * self.cols + col as usize;
                for &other in &self.cells[cell_index] {
                    if other == index {
                        continue;
                    }
                    if boid.distance_squared_to(&boids[other]) <= self.radius_squared {
                        out.push(other);
                    }
                }
            }
        }
    }

    /// Neighbors of `boids[index]`, borrowed from the grid's scratch buffer.
    /// The slice is overwritten by the next query.
    pub fn query_neighbors(&mut self, boids: &[Boid], index: usize) -> &[usize] {
        let mut cache = std::mem::take(&mut self.neighbor_cache);
        self.collect_neighbors(boids, index, &mut cache);
        self.neighbor_cache = cache;
        &self.neighbor_cache
    }
}

/// Columns and rows for a grid of `cell_size` cells over a `width` x `height`
/// window, rejecting sizes with no cells or more than [`MAX_GRID_CELLS`].
pub(crate) fn grid_dimensions(cell_size: f64, width: f64, height: f64) -> Result<(usize, usize), ConfigError> {
    if !(cell_size >= 1.0) || !cell_size.is_finite() {
        return Err(ConfigError::EmptyGrid { cell_size });
    }

    // Counted in f64 first so huge windows cannot overflow usize
    let cols = (width / cell_size).ceil().max(1.0);
    let rows = (height / cell_size).ceil().max(1.0);
    let cells = cols * rows;
    if !(cells <= MAX_GRID_CELLS as f64) {
        return Err(ConfigError::invalid(
            "vision_radius",
            format!("{width}x{height} window in {cell_size}-wide cells needs {cells} cells, limit is {MAX_GRID_CELLS}"),
        ));
    }

    Ok((cols as usize, rows as usize))
}

#[inline]
fn axis_cell(value: f64, cell_size: f64, count: usize) -> usize {
    let cell = (value / cell_size).floor();
    if cell <= 0.0 || cell.is_nan() {
        0
    } else {
        (cell as usize).min(count - 1)
    }
}
