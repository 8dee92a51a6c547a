// Reference frame transforms for FOC (Field Oriented Control)
// Park and Clarke transforms between the rotor frame (dq), the two-axis
// stator frame (ab) and the three-phase stator frame (abc), generic over the
// electrical quantity (voltage, current, flux, ...)

use core::f32::consts::{PI, TAU};
use core::ops::{Add, Mul};

use libm::{cosf, fmodf, sinf};

use crate::units::Radians;

// Enable idsp-based fast trigonometric functions (~40 cycles on Cortex-M
// versus ~100-200 for libm::cosf/sinf)
const USE_IDSP_COSSIN: bool = true;

const SQRT3_DIV_2: f32 = 0.866_025_4; // sqrt(3) / 2
const FRAC_1_SQRT3: f32 = 0.577_350_26; // 1 / sqrt(3)

/// Quantities aligned with the rotor (direct / quadrature axes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dq<T> {
    pub d: T,
    pub q: T,
}

/// Quantities aligned with the stator, two orthogonal axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ab<T> {
    pub a: T,
    pub b: T,
}

/// Quantities in the three-phase stator system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Abc<T> {
    pub a: T,
    pub b: T,
    pub c: T,
}

/// Park transform: rotate stator-aligned values onto the rotor axes
///
/// # Arguments
/// * `ab` - Values in the two-axis stator frame
/// * `angle` - Electrical angle between stator and rotor [rad]
pub fn ab_to_dq<T>(ab: Ab<T>, angle: Radians) -> Dq<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let (cos, sin) = cos_sin(angle);

    Dq {
        d: ab.a * cos + ab.b * sin,
        q: ab.a * -sin + ab.b * cos,
    }
}

/// Inverse Park transform: rotate rotor-aligned values back onto the stator
///
/// The rotation matrix is orthogonal, so the inverse is the same rotation
/// applied with the negated angle; reusing `ab_to_dq` keeps the two exact
/// algebraic inverses of each other.
///
/// # Arguments
/// * `dq` - Values in the rotor frame
/// * `angle` - Electrical angle between stator and rotor [rad]
pub fn dq_to_ab<T>(dq: Dq<T>, angle: Radians) -> Ab<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let rotated = ab_to_dq(Ab { a: dq.d, b: dq.q }, -angle);

    Ab {
        a: rotated.d,
        b: rotated.q,
    }
}

/// Inverse Clarke transform: two-axis stator values to three phases
///
/// Produces a balanced system (a + b + c = 0) by construction.
pub fn ab_to_abc<T>(ab: Ab<T>) -> Abc<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    Abc {
        a: ab.a,
        b: ab.a * -0.5 + ab.b * SQRT3_DIV_2,
        c: ab.a * -0.5 + ab.b * -SQRT3_DIV_2,
    }
}

/// Clarke transform: three phases to two-axis stator values
///
/// Amplitude-invariant convention. Phase c carries no independent
/// information under the balanced assumption a + b + c = 0 and is ignored;
/// an unbalanced input silently yields an approximation.
pub fn abc_to_ab<T>(abc: Abc<T>) -> Ab<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    Ab {
        a: abc.a,
        b: abc.a * FRAC_1_SQRT3 + abc.b * (2.0 * FRAC_1_SQRT3),
    }
}

impl<T> Dq<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    /// Convert to the two-axis stator frame
    pub fn to_ab(self, angle: Radians) -> Ab<T> {
        dq_to_ab(self, angle)
    }

    /// Convert to the three-phase stator frame
    pub fn to_abc(self, angle: Radians) -> Abc<T> {
        ab_to_abc(dq_to_ab(self, angle))
    }
}

impl<T> Ab<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    /// Convert to the rotor frame
    pub fn to_dq(self, angle: Radians) -> Dq<T> {
        ab_to_dq(self, angle)
    }

    /// Convert to the three-phase stator frame
    pub fn to_abc(self) -> Abc<T> {
        ab_to_abc(self)
    }
}

impl<T> Abc<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    /// Convert to the two-axis stator frame
    pub fn to_ab(self) -> Ab<T> {
        abc_to_ab(self)
    }

    /// Convert to the rotor frame
    pub fn to_dq(self, angle: Radians) -> Dq<T> {
        ab_to_dq(abc_to_ab(self), angle)
    }
}

/// Cosine and sine of a rotation angle
///
/// The angle is not required to be range-reduced; sector-accumulated
/// positions many revolutions from zero are valid inputs.
fn cos_sin(angle: Radians) -> (f32, f32) {
    if USE_IDSP_COSSIN {
        cos_sin_idsp(angle.raw())
    } else {
        cos_sin_libm(angle.raw())
    }
}

/// idsp::cossin backend (fast, lookup-table based)
#[inline]
fn cos_sin_idsp(theta: f32) -> (f32, f32) {
    // idsp represents the phase as a full-scale i32 spanning -π..π, so the
    // angle has to be wrapped into that window first
    let mut wrapped = fmodf(theta, TAU);
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped < -PI {
        wrapped += TAU;
    }

    const SCALE: f32 = 2_147_483_648.0 / PI; // 2^31 / π
    let phase = (wrapped * SCALE) as i32;

    let (cos_i32, sin_i32) = idsp::cossin(phase);

    const I32_TO_F32: f32 = 1.0 / 2_147_483_648.0; // 1 / 2^31
    (cos_i32 as f32 * I32_TO_F32, sin_i32 as f32 * I32_TO_F32)
}

/// libm backend (slower, no table)
#[inline]
fn cos_sin_libm(theta: f32) -> (f32, f32) {
    (cosf(theta), sinf(theta))
}
