//! The immutable per-agent trait tuple.

/// Heritable traits fixed at spawn time.
///
/// The core reads none of these during a tick; they are carried for
/// external systems and for callers that scale behaviour per agent.
/// All fields are validated against their declared ranges at
/// construction sites that accept external input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Genome {
    /// Multiplier on cruise speed, in `[0.5, 2.0]`.
    pub speed_factor: f32,
    /// Multiplier on sense radius, in `[0.5, 2.0]`.
    pub sense_factor: f32,
    /// Disposition toward other agents, in `[-1.0, 1.0]`.
    pub aggression: f32,
    /// Palette index for visualisation, in `0..16`.
    pub color_idx: u8,
}

impl Genome {
    /// Valid range for [`speed_factor`](Genome::speed_factor) and
    /// [`sense_factor`](Genome::sense_factor).
    pub const FACTOR_RANGE: (f32, f32) = (0.5, 2.0);
    /// Valid range for [`aggression`](Genome::aggression).
    pub const AGGRESSION_RANGE: (f32, f32) = (-1.0, 1.0);
    /// Number of palette entries; `color_idx` must be below this.
    pub const PALETTE_SIZE: u8 = 16;

    /// Check all trait values against their declared ranges.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first violated
    /// range. NaN fails every range check.
    pub fn validate(&self) -> Result<(), String> {
        let (lo, hi) = Self::FACTOR_RANGE;
        if !(self.speed_factor >= lo && self.speed_factor <= hi) {
            return Err(format!(
                "speed_factor must be in [{lo}, {hi}], got {}",
                self.speed_factor
            ));
        }
        if !(self.sense_factor >= lo && self.sense_factor <= hi) {
            return Err(format!(
                "sense_factor must be in [{lo}, {hi}], got {}",
                self.sense_factor
            ));
        }
        let (alo, ahi) = Self::AGGRESSION_RANGE;
        if !(self.aggression >= alo && self.aggression <= ahi) {
            return Err(format!(
                "aggression must be in [{alo}, {ahi}], got {}",
                self.aggression
            ));
        }
        if self.color_idx >= Self::PALETTE_SIZE {
            return Err(format!(
                "color_idx must be below {}, got {}",
                Self::PALETTE_SIZE,
                self.color_idx
            ));
        }
        Ok(())
    }
}

impl Default for Genome {
    /// Neutral traits: unit factors, zero aggression, palette slot 0.
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            sense_factor: 1.0,
            aggression: 0.0,
            color_idx: 0,
        }
    }
}
