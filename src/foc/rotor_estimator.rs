// Rotor kinematic state estimation from hall sensor sector transitions
// Each hall edge pins the position to the entered sector's midpoint and
// refreshes speed/acceleration from the edge timing; between edges the state
// is extrapolated with a constant-acceleration model.

use crate::fmt::*;
use crate::units::{Radians, RadiansPerSecond, RadiansPerSecondSquared, Seconds};
use core::f32::consts::{FRAC_PI_3, TAU};

/// Angular width of one hall sector [rad]
pub const SECTOR_WIDTH: Radians = Radians::new(FRAC_PI_3);

/// One full revolution [rad]
pub const FULL_TURN: Radians = Radians::new(TAU);

/// Number of hall sectors per revolution
pub const SECTOR_COUNT: u8 = 6;

/// Rotation direction inferred from two consecutive sector indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Clockwise: sector index increasing, 6 → 1 at the wrap
    Cw,
    /// Counter-clockwise: sector index decreasing, 1 → 6 at the wrap
    Ccw,
}

/// Rotor kinematic state
///
/// `position` accumulates across revolutions and is never wrapped back to
/// 0..2π; one full clockwise revolution adds exactly 2π.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotorState {
    /// Accumulated shaft angle [rad]
    pub position: Radians,
    /// Angular speed [rad/s], signed (positive: clockwise)
    pub speed: RadiansPerSecond,
    /// Angular acceleration [rad/s²]
    pub acceleration: RadiansPerSecondSquared,
}

/// Rejected hall sector-change events
///
/// Every variant is a caller contract violation; the estimator state is left
/// untouched when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SectorEventError {
    /// Sector index outside 1..=6
    InvalidSector,
    /// Event timestamp not later than the previous event's
    NonMonotonicTimestamp,
    /// Same sector reported twice in a row; duplicate edges must be
    /// filtered by the caller so direction inference stays sound
    SameSector,
}

/// Hall sensor-based rotor state estimator
///
/// `on_sector_change` is meant to run in interrupt context: it performs no
/// allocation, no blocking and completes in bounded time. `extrapolate` runs
/// in the lower-priority control context and never mutates the estimator.
/// The two must not interleave on the same instance without external mutual
/// exclusion (e.g. masking the hall interrupt around the read); the state
/// fields are updated as a group and a torn read is a correctness hazard.
#[derive(Debug)]
pub struct RotorEstimator {
    state: RotorState,
    /// Timestamp of the last accepted hall edge
    last_timestamp: Seconds,
    /// Last accepted sector index, always in 1..=6
    last_sector: u8,
    /// Direction inferred at the last accepted hall edge
    direction: Option<Rotation>,
    /// Whole revolutions accumulated at the 6/1 sector boundary
    rev_offset: Radians,
}

impl RotorEstimator {
    /// Create an estimator from the startup state supplied by the caller
    ///
    /// # Arguments
    /// * `position` - Initial shaft angle [rad]
    /// * `timestamp` - System time matching the hall event clock [s]
    /// * `sector` - Sector the rotor currently rests in (1..=6)
    ///
    /// # Returns
    /// * `Err(SectorEventError::InvalidSector)` if `sector` is out of range
    pub fn new(position: Radians, timestamp: Seconds, sector: u8) -> Result<Self, SectorEventError> {
        if !Self::is_valid_sector(sector) {
            return Err(SectorEventError::InvalidSector);
        }

        Ok(Self {
            state: RotorState {
                position,
                speed: RadiansPerSecond::ZERO,
                acceleration: RadiansPerSecondSquared::ZERO,
            },
            last_timestamp: timestamp,
            last_sector: sector,
            direction: None,
            rev_offset: Radians::ZERO,
        })
    }

    /// Check if a sector index is valid
    #[inline]
    pub fn is_valid_sector(sector: u8) -> bool {
        (1..=SECTOR_COUNT).contains(&sector)
    }

    /// Process a hall edge: the rotor entered `new_sector` at `timestamp`
    ///
    /// Replaces speed with the one-sector average over the edge interval,
    /// acceleration with the finite difference of consecutive speeds, and
    /// pins position to the midpoint of the entered sector. Neither speed
    /// nor acceleration is filtered here; callers needing noise rejection
    /// filter downstream.
    ///
    /// # Arguments
    /// * `timestamp` - Hardware capture time of the edge [s]
    /// * `new_sector` - Sector the rotor just entered (1..=6)
    ///
    /// # Returns
    /// * `Err(_)` on a contract violation; state is unchanged in that case
    pub fn on_sector_change(
        &mut self,
        timestamp: Seconds,
        new_sector: u8,
    ) -> Result<(), SectorEventError> {
        if !Self::is_valid_sector(new_sector) {
            warn!("hall edge rejected: invalid sector {}", new_sector);
            return Err(SectorEventError::InvalidSector);
        }

        if new_sector == self.last_sector {
            warn!("hall edge rejected: duplicate sector {}", new_sector);
            return Err(SectorEventError::SameSector);
        }

        let delta_t = timestamp - self.last_timestamp;
        if delta_t.raw() <= 0.0 {
            // A stale or duplicated timestamp would divide to ±inf/NaN and
            // poison every later estimate, so the event is dropped loudly.
            warn!(
                "hall edge rejected: non-monotonic timestamp ({} after {})",
                timestamp.raw(),
                self.last_timestamp.raw()
            );
            return Err(SectorEventError::NonMonotonicTimestamp);
        }

        let direction = self.direction_of(new_sector);

        let new_speed = match direction {
            Rotation::Cw => SECTOR_WIDTH / delta_t,
            Rotation::Ccw => -(SECTOR_WIDTH / delta_t),
        };

        // Crossing the 6/1 boundary moves the revolution accumulator so the
        // position keeps growing (or shrinking) instead of wrapping.
        match direction {
            Rotation::Cw if self.last_sector == SECTOR_COUNT && new_sector == 1 => {
                self.rev_offset = self.rev_offset + FULL_TURN;
            }
            Rotation::Ccw if self.last_sector == 1 && new_sector == SECTOR_COUNT => {
                self.rev_offset = self.rev_offset - FULL_TURN;
            }
            _ => {}
        }

        trace!(
            "hall edge: sector {} -> {}, speed {} rad/s",
            self.last_sector,
            new_sector,
            new_speed.raw()
        );

        self.state.acceleration = (new_speed - self.state.speed) / delta_t;
        self.state.speed = new_speed;
        self.state.position = self.rev_offset + Self::sector_midpoint(new_sector, direction);
        self.last_timestamp = timestamp;
        self.last_sector = new_sector;
        self.direction = Some(direction);

        Ok(())
    }

    /// Project the state forward to `now` with the constant-acceleration model
    ///
    /// The position term integrates with the pre-extrapolation speed
    /// (`position + speed·Δt`), so no acceleration leaks into a single Euler
    /// step; the speed term gets the full `acceleration·Δt`. Total over its
    /// input: `now == last event time` returns the state unchanged, and a
    /// `now` in the past (caller error) simply projects backwards.
    ///
    /// # Arguments
    /// * `now` - Current system time, same clock as the hall events [s]
    ///
    /// # Returns
    /// A fresh state snapshot; the estimator itself is not mutated
    pub fn extrapolate(&self, now: Seconds) -> RotorState {
        let delta_t = now - self.last_timestamp;

        RotorState {
            position: self.state.position + self.state.speed * delta_t,
            speed: self.state.speed + self.state.acceleration * delta_t,
            acceleration: self.state.acceleration,
        }
    }

    /// State as of the last accepted hall edge, without extrapolation
    #[inline]
    pub fn state(&self) -> RotorState {
        self.state
    }

    /// Sector entered at the last accepted hall edge
    #[inline]
    pub fn last_sector(&self) -> u8 {
        self.last_sector
    }

    /// Timestamp of the last accepted hall edge
    #[inline]
    pub fn last_event_timestamp(&self) -> Seconds {
        self.last_timestamp
    }

    /// Direction inferred at the last accepted hall edge
    ///
    /// `None` until the first edge is seen; rejected events never change it.
    #[inline]
    pub fn direction(&self) -> Option<Rotation> {
        self.direction
    }

    /// Infer the rotation direction for a transition into `new_sector`
    ///
    /// Increasing sector index is clockwise, except at the wrap where
    /// 6 → 1 is clockwise and 1 → 6 is counter-clockwise.
    fn direction_of(&self, new_sector: u8) -> Rotation {
        if self.last_sector == SECTOR_COUNT && new_sector == 1 {
            return Rotation::Cw;
        }

        if self.last_sector == 1 && new_sector == SECTOR_COUNT {
            return Rotation::Ccw;
        }

        if new_sector > self.last_sector {
            Rotation::Cw
        } else {
            Rotation::Ccw
        }
    }

    /// Midpoint angle the position is pinned to when entering `sector`
    ///
    /// The reference midpoint sits half a sector behind the boundary just
    /// crossed, so it depends on the travel direction.
    fn sector_midpoint(sector: u8, direction: Rotation) -> Radians {
        let s = sector as f32;
        match direction {
            Rotation::Cw => Radians::new((s - 1.5) * FRAC_PI_3),
            Rotation::Ccw => Radians::new((s - 0.5) * FRAC_PI_3),
        }
    }
}
