//! The agent column store.

use skein_core::{AgentId, AgentState, Genome};

/// Column floor when a zero-capacity store first grows.
const MIN_CAPACITY: usize = 4;

/// Owner of all per-agent columns.
///
/// Agent ids are dense indices into the columns; `add` hands out ids
/// in insertion order (`id == count` before the call). Dead slots are
/// never handed out again — external systems mark agents dead via the
/// state column and the id stays allocated.
///
/// Accessors expose the live prefix (`..count`) of each column, so a
/// slice obtained before an `add` must not be assumed valid after it:
/// growth reallocates every column.
#[derive(Debug, Clone)]
pub struct AgentStore {
    x: Vec<f32>,
    y: Vec<f32>,
    vx: Vec<f32>,
    vy: Vec<f32>,
    fx: Vec<f32>,
    fy: Vec<f32>,
    state: Vec<AgentState>,
    group: Vec<u8>,
    genome: Vec<Genome>,
    count: usize,
}

/// Exclusive views over every live column, split so stages can read
/// some columns while writing others within one borrow of the store.
pub struct ColumnsMut<'a> {
    /// Position x.
    pub x: &'a mut [f32],
    /// Position y.
    pub y: &'a mut [f32],
    /// Velocity x.
    pub vx: &'a mut [f32],
    /// Velocity y.
    pub vy: &'a mut [f32],
    /// Force accumulator x.
    pub fx: &'a mut [f32],
    /// Force accumulator y.
    pub fy: &'a mut [f32],
    /// Lifecycle flags.
    pub state: &'a mut [AgentState],
    /// Group tags.
    pub group: &'a mut [u8],
    /// Immutable trait tuples.
    pub genome: &'a mut [Genome],
}

impl AgentStore {
    /// Create an empty store with all columns preallocated to
    /// `capacity` agents.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: vec![0.0; capacity],
            y: vec![0.0; capacity],
            vx: vec![0.0; capacity],
            vy: vec![0.0; capacity],
            fx: vec![0.0; capacity],
            fy: vec![0.0; capacity],
            state: vec![AgentState::empty(); capacity],
            group: vec![0; capacity],
            genome: vec![Genome::default(); capacity],
            count: 0,
        }
    }

    /// Number of agents.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if no agents have been added.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current column length.
    pub fn capacity(&self) -> usize {
        self.x.len()
    }

    /// Append an agent and return its id (the pre-call count).
    ///
    /// Grows all columns in lockstep when at capacity. Force starts at
    /// zero and state starts empty.
    pub fn add(&mut self, pos: (f32, f32), vel: (f32, f32), group: u8, genome: Genome) -> AgentId {
        if self.count == self.capacity() {
            self.grow();
        }
        let i = self.count;
        self.x[i] = pos.0;
        self.y[i] = pos.1;
        self.vx[i] = vel.0;
        self.vy[i] = vel.1;
        self.fx[i] = 0.0;
        self.fy[i] = 0.0;
        self.state[i] = AgentState::empty();
        self.group[i] = group;
        self.genome[i] = genome;
        self.count = i + 1;
        AgentId(i as u32)
    }

    /// Double every column. All columns reallocate together so they
    /// never disagree on length.
    fn grow(&mut self) {
        let new_cap = (self.capacity() * 2).max(MIN_CAPACITY);
        self.x.resize(new_cap, 0.0);
        self.y.resize(new_cap, 0.0);
        self.vx.resize(new_cap, 0.0);
        self.vy.resize(new_cap, 0.0);
        self.fx.resize(new_cap, 0.0);
        self.fy.resize(new_cap, 0.0);
        self.state.resize(new_cap, AgentState::empty());
        self.group.resize(new_cap, 0);
        self.genome.resize(new_cap, Genome::default());
    }

    /// Memory footprint of the backing columns in bytes.
    pub fn memory_bytes(&self) -> usize {
        let cap = self.capacity();
        cap * 6 * std::mem::size_of::<f32>()
            + cap * std::mem::size_of::<AgentState>()
            + cap * std::mem::size_of::<u8>()
            + cap * std::mem::size_of::<Genome>()
    }

    /// Reset both force columns to zero. Called at tick start, before
    /// any stage runs.
    pub fn zero_forces(&mut self) {
        self.fx[..self.count].fill(0.0);
        self.fy[..self.count].fill(0.0);
    }

    /// Position x column, live prefix.
    pub fn x(&self) -> &[f32] {
        &self.x[..self.count]
    }

    /// Position y column, live prefix.
    pub fn y(&self) -> &[f32] {
        &self.y[..self.count]
    }

    /// Velocity x column, live prefix.
    pub fn vx(&self) -> &[f32] {
        &self.vx[..self.count]
    }

    /// Velocity y column, live prefix.
    pub fn vy(&self) -> &[f32] {
        &self.vy[..self.count]
    }

    /// Force x column, live prefix.
    pub fn fx(&self) -> &[f32] {
        &self.fx[..self.count]
    }

    /// Force y column, live prefix.
    pub fn fy(&self) -> &[f32] {
        &self.fy[..self.count]
    }

    /// State column, live prefix.
    pub fn states(&self) -> &[AgentState] {
        &self.state[..self.count]
    }

    /// State column, mutable. External systems use this to set and
    /// clear lifecycle flags; the core only reads it.
    pub fn states_mut(&mut self) -> &mut [AgentState] {
        &mut self.state[..self.count]
    }

    /// Group tag column, live prefix.
    pub fn groups(&self) -> &[u8] {
        &self.group[..self.count]
    }

    /// Genome column, live prefix.
    pub fn genomes(&self) -> &[Genome] {
        &self.genome[..self.count]
    }

    /// Both force columns, mutable. For auxiliary force systems that
    /// add onto the steering output before integration.
    pub fn forces_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.fx[..self.count], &mut self.fy[..self.count])
    }

    /// Split the store into exclusive per-column views over the live
    /// prefix.
    ///
    /// The views borrow the store for their whole lifetime, so no
    /// growth can occur while they exist.
    pub fn columns_mut(&mut self) -> ColumnsMut<'_> {
        let n = self.count;
        ColumnsMut {
            x: &mut self.x[..n],
            y: &mut self.y[..n],
            vx: &mut self.vx[..n],
            vy: &mut self.vy[..n],
            fx: &mut self.fx[..n],
            fy: &mut self.fy[..n],
            state: &mut self.state[..n],
            group: &mut self.group[..n],
            genome: &mut self.genome[..n],
        }
    }
}
