//! Test fixtures for Skein development.
//!
//! [`ColumnFixture`] builds the parallel column slices the pipeline
//! stages consume, without dragging a full world into unit tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use skein_core::AgentState;
use skein_grid::UniformGrid;

/// Hand-built agent columns for stage tests.
///
/// Push agents one by one, then borrow the columns directly or ask
/// for a rebuilt [`UniformGrid`] over the current positions.
#[derive(Debug, Default, Clone)]
pub struct ColumnFixture {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
    pub state: Vec<AgentState>,
}

impl ColumnFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a live agent; returns its index.
    pub fn push(&mut self, pos: (f32, f32), vel: (f32, f32)) -> usize {
        self.push_with_state(pos, vel, AgentState::empty())
    }

    /// Append a dead agent; returns its index.
    pub fn push_dead(&mut self, pos: (f32, f32), vel: (f32, f32)) -> usize {
        let mut state = AgentState::empty();
        state.insert(AgentState::DEAD);
        self.push_with_state(pos, vel, state)
    }

    /// Append an agent with explicit state flags; returns its index.
    pub fn push_with_state(
        &mut self,
        pos: (f32, f32),
        vel: (f32, f32),
        state: AgentState,
    ) -> usize {
        let i = self.x.len();
        self.x.push(pos.0);
        self.y.push(pos.1);
        self.vx.push(vel.0);
        self.vy.push(vel.1);
        self.state.push(state);
        i
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// A grid over the current positions, already rebuilt.
    ///
    /// # Panics
    ///
    /// Panics on invalid grid dimensions — fixtures are test code.
    pub fn grid(&self, cell_size: f32, width: f32, height: f32) -> UniformGrid {
        let mut grid =
            UniformGrid::new(cell_size, width, height, self.len()).expect("fixture grid");
        grid.rebuild(&self.x, &self.y, self.len());
        grid
    }
}
