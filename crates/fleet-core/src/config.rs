//! Fleet-wide configuration.

use crate::{CoreError, CoreResult};

/// Slowest accepted `speed_per_tick`.  Below this, `f32` progress near the
/// end of an edge stops growing and the robot never arrives.
pub const MIN_SPEED_PER_TICK: f32 = 1e-3;

/// Top-level fleet configuration.
///
/// Typically loaded from a JSON file by the application crate (with the
/// `serde` feature) and passed to the fleet builder.  Missing fields fall
/// back to [`FleetConfig::default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FleetConfig {
    /// Fraction of an edge a robot covers in one granted tick.  Must lie in
    /// `[MIN_SPEED_PER_TICK, 1]`; `1.0` crosses a whole edge per tick.
    pub speed_per_tick: f32,

    /// Master RNG seed.  The same seed always produces identical task streams.
    pub seed: u64,

    /// Named level to load from a nested graph source.  `None` picks the only
    /// level, or the lexicographically first one when there are several.
    pub level: Option<String>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            speed_per_tick: 0.1,
            seed:           42,
            level:          None,
        }
    }
}

impl FleetConfig {
    /// Reject values the tick loop cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(MIN_SPEED_PER_TICK..=1.0).contains(&self.speed_per_tick) {
            return Err(CoreError::Config(format!(
                "speed_per_tick must be in [{MIN_SPEED_PER_TICK}, 1], got {}",
                self.speed_per_tick
            )));
        }
        Ok(())
    }

    /// Number of granted ticks a robot needs to cross one edge.
    pub fn ticks_per_edge(&self) -> u32 {
        (1.0 / self.speed_per_tick).ceil() as u32
    }
}
