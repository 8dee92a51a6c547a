// Hall sensor-based rotor state estimation and FOC reference frame transforms
// for BLDC/PMDC motor control. The surrounding firmware owns scheduling,
// sensor hardware and PWM generation; this crate is the pure computation core.
#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod foc;
pub mod units;

// Re-export main types for easier access
pub use foc::rotor_estimator::{Rotation, RotorEstimator, RotorState, SectorEventError};
pub use foc::transforms::{ab_to_abc, ab_to_dq, abc_to_ab, dq_to_ab, Ab, Abc, Dq};
pub use units::{Radians, RadiansPerSecond, RadiansPerSecondSquared, Seconds};
