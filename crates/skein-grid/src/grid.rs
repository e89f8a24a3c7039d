//! The uniform cell-list grid.

use crate::error::GridError;
use smallvec::SmallVec;

/// Sentinel for "no agent" in the `head` and `next` link arrays.
const NIL: i32 = -1;

/// A uniform grid over the world rectangle, holding one singly linked
/// list of agent ids per cell.
///
/// The grid is rebuilt from scratch every tick because every position
/// may change every tick. Storage is two integer arrays: `head[cell]`
/// points at the most recently inserted agent in that cell, and
/// `next[agent]` chains to the previous one. Insertion is
/// push-to-front, so each cell lists its agents in reverse id order —
/// an order the rest of the engine treats as part of the determinism
/// contract.
///
/// After construction neither [`rebuild`](UniformGrid::rebuild) nor
/// the queries allocate; [`grow`](UniformGrid::grow) is the only
/// method that touches capacity and is called in lockstep with agent
/// column growth.
#[derive(Debug, Clone)]
pub struct UniformGrid {
    cell_size: f32,
    inv_cell_size: f32,
    cols: usize,
    rows: usize,
    head: Vec<i32>,
    next: Vec<i32>,
}

/// Occupancy statistics for one rebuilt grid. Computed off the hot
/// path by [`UniformGrid::stats`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridStats {
    /// Number of cells in the grid.
    pub total_cells: usize,
    /// Cells holding at least one agent.
    pub occupied_cells: usize,
    /// Cells holding no agents.
    pub empty_cells: usize,
    /// Largest per-cell agent count.
    pub max_agents_per_cell: usize,
    /// Mean agent count over occupied cells; zero when nothing is
    /// occupied.
    pub avg_agents_per_occupied_cell: f64,
}

impl UniformGrid {
    /// Create a grid covering `width × height` with square cells of
    /// `cell_size`, sized for `capacity` agents.
    ///
    /// Cell counts round up, so the last column/row may overhang the
    /// world edge. `capacity` may be zero; [`grow`](UniformGrid::grow)
    /// extends the link array later.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if `cell_size`, `width`, or `height` is
    /// not finite and positive.
    pub fn new(
        cell_size: f32,
        width: f32,
        height: f32,
        capacity: usize,
    ) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize { value: cell_size });
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(GridError::InvalidDimension {
                name: "width",
                value: width,
            });
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(GridError::InvalidDimension {
                name: "height",
                value: height,
            });
        }
        let cols = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (height / cell_size).ceil().max(1.0) as usize;
        Ok(Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cols,
            rows,
            head: vec![NIL; cols * rows],
            next: vec![NIL; capacity],
        })
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of cells.
    pub fn total_cells(&self) -> usize {
        self.head.len()
    }

    /// Agent capacity of the link array.
    pub fn capacity(&self) -> usize {
        self.next.len()
    }

    /// Memory footprint of the head and link arrays in bytes.
    pub fn memory_bytes(&self) -> usize {
        (self.head.len() + self.next.len()) * std::mem::size_of::<i32>()
    }

    /// Extend the link array to `capacity` agents. No-op if already
    /// large enough. Called in lockstep with agent column growth.
    pub fn grow(&mut self, capacity: usize) {
        if capacity > self.next.len() {
            self.next.resize(capacity, NIL);
        }
    }

    /// Resolve one axis value to a cell index with saturating clamp.
    ///
    /// Positions exactly on the far edge land in the last cell;
    /// negative positions (an upstream invariant violation) land in
    /// cell zero. NaN also saturates to zero, keeping the mapping
    /// total and deterministic.
    #[inline]
    fn axis_cell(v: f32, inv: f32, n: usize) -> usize {
        let c = (v * inv).floor() as i64;
        c.clamp(0, n as i64 - 1) as usize
    }

    /// Flat cell index for a position.
    #[inline]
    pub fn cell_of(&self, x: f32, y: f32) -> usize {
        let col = Self::axis_cell(x, self.inv_cell_size, self.cols);
        let row = Self::axis_cell(y, self.inv_cell_size, self.rows);
        row * self.cols + col
    }

    /// Rebuild the cell lists from the first `count` entries of the
    /// position columns.
    ///
    /// Clears every head pointer, then pushes agents front-first in
    /// ascending id order. Zero allocations.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `count` exceeds the link-array
    /// capacity or the position columns.
    pub fn rebuild(&mut self, x: &[f32], y: &[f32], count: usize) {
        debug_assert!(count <= self.next.len());
        debug_assert!(count <= x.len() && count <= y.len());
        self.head.fill(NIL);
        for i in 0..count {
            let cell = self.cell_of(x[i], y[i]);
            self.next[i] = self.head[cell];
            self.head[cell] = i as i32;
        }
    }

    /// The flat indices of the up-to-9 cells in the 3×3 neighbourhood
    /// around the cell containing `(x, y)`.
    ///
    /// Out-of-range rows and columns are omitted, not clamped, so no
    /// cell appears twice. Row-major: `dy` outer, `dx` inner.
    fn neighbourhood(&self, x: f32, y: f32) -> SmallVec<[usize; 9]> {
        let col = Self::axis_cell(x, self.inv_cell_size, self.cols) as i64;
        let row = Self::axis_cell(y, self.inv_cell_size, self.rows) as i64;
        let mut cells = SmallVec::new();
        for dy in -1..=1i64 {
            let r = row + dy;
            if r < 0 || r >= self.rows as i64 {
                continue;
            }
            for dx in -1..=1i64 {
                let c = col + dx;
                if c < 0 || c >= self.cols as i64 {
                    continue;
                }
                cells.push(r as usize * self.cols + c as usize);
            }
        }
        cells
    }

    /// Invoke `visit` with the id of every agent in the 3×3 cell
    /// neighbourhood around `(x, y)`.
    ///
    /// Candidates arrive cell-by-cell (row-major over the
    /// neighbourhood) and, within a cell, in reverse insertion order.
    /// The caller filters by actual distance; the grid only bounds the
    /// candidate set.
    #[inline]
    pub fn query_3x3(&self, x: f32, y: f32, mut visit: impl FnMut(usize)) {
        for &cell in &self.neighbourhood(x, y) {
            let mut cursor = self.head[cell];
            while cursor != NIL {
                visit(cursor as usize);
                cursor = self.next[cursor as usize];
            }
        }
    }

    /// Write the ids from the 3×3 neighbourhood around `(x, y)` into
    /// `buf`, returning the total match count.
    ///
    /// The return value may exceed `buf.len()`; entries past the
    /// buffer are counted but not written.
    pub fn query_3x3_buffer(&self, x: f32, y: f32, buf: &mut [u32]) -> usize {
        let mut total = 0usize;
        self.query_3x3(x, y, |idx| {
            if total < buf.len() {
                buf[total] = idx as u32;
            }
            total += 1;
        });
        total
    }

    /// Occupancy statistics over the current cell lists.
    ///
    /// Walks every cell; intended for telemetry and tests, not the
    /// per-tick path. `count` is accepted for symmetry with
    /// [`rebuild`](UniformGrid::rebuild) and cross-checked in debug
    /// builds.
    pub fn stats(&self, count: usize) -> GridStats {
        let mut occupied = 0usize;
        let mut max_in_cell = 0usize;
        let mut seen = 0usize;
        for &h in &self.head {
            if h == NIL {
                continue;
            }
            occupied += 1;
            let mut in_cell = 0usize;
            let mut cursor = h;
            while cursor != NIL {
                in_cell += 1;
                cursor = self.next[cursor as usize];
            }
            seen += in_cell;
            max_in_cell = max_in_cell.max(in_cell);
        }
        debug_assert_eq!(seen, count, "cell lists out of sync with agent count");
        GridStats {
            total_cells: self.head.len(),
            occupied_cells: occupied,
            empty_cells: self.head.len() - occupied,
            max_agents_per_cell: max_in_cell,
            avg_agents_per_occupied_cell: if occupied == 0 {
                0.0
            } else {
                seen as f64 / occupied as f64
            },
        }
    }
}
