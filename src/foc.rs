// FOC (Field Oriented Control) module
// Hall sensor-based rotor state estimation and reference frame transforms

pub mod rotor_estimator;
pub mod transforms;

// Re-export main types for easier access
pub use rotor_estimator::{Rotation, RotorEstimator, RotorState, SectorEventError};
pub use transforms::{ab_to_abc, ab_to_dq, abc_to_ab, dq_to_ab};
