// Dimensioned scalar types for the motor core
// Only the few quantities the estimator actually needs are defined here;
// mixing units in an expression is a compile error, not a runtime surprise.

use core::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! unit {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(transparent)]
        pub struct $name(f32);

        impl $name {
            pub const ZERO: Self = Self(0.0);

            /// Wrap a raw numeric value
            #[inline]
            pub const fn new(value: f32) -> Self {
                Self(value)
            }

            /// Raw numeric value in the unit named by the type
            #[inline]
            pub const fn raw(self) -> f32 {
                self.0
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        // Scaling by a dimensionless real keeps the unit
        impl Mul<f32> for $name {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: f32) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;

            #[inline]
            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f32> for $name {
            type Output = Self;

            #[inline]
            fn div(self, rhs: f32) -> Self {
                Self(self.0 / rhs)
            }
        }
    };
}

unit!(
    /// Time since the hardware's arbitrary epoch [s]
    Seconds
);
unit!(
    /// Angle [rad]
    Radians
);
unit!(
    /// Angular speed [rad/s], signed (positive: clockwise)
    RadiansPerSecond
);
unit!(
    /// Angular acceleration [rad/s²]
    RadiansPerSecondSquared
);

impl Div<Seconds> for Radians {
    type Output = RadiansPerSecond;

    #[inline]
    fn div(self, rhs: Seconds) -> RadiansPerSecond {
        RadiansPerSecond(self.0 / rhs.0)
    }
}

impl Div<Seconds> for RadiansPerSecond {
    type Output = RadiansPerSecondSquared;

    #[inline]
    fn div(self, rhs: Seconds) -> RadiansPerSecondSquared {
        RadiansPerSecondSquared(self.0 / rhs.0)
    }
}

impl Mul<Seconds> for RadiansPerSecond {
    type Output = Radians;

    #[inline]
    fn mul(self, rhs: Seconds) -> Radians {
        Radians(self.0 * rhs.0)
    }
}

impl Mul<Seconds> for RadiansPerSecondSquared {
    type Output = RadiansPerSecond;

    #[inline]
    fn mul(self, rhs: Seconds) -> RadiansPerSecond {
        RadiansPerSecond(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_same_unit_arithmetic() {
        let a = Radians::new(1.5);
        let b = Radians::new(0.5);
        assert!(approx_eq((a + b).raw(), 2.0));
        assert!(approx_eq((a - b).raw(), 1.0));
        assert!(approx_eq((-a).raw(), -1.5));
    }

    #[test]
    fn test_scaling() {
        let s = RadiansPerSecond::new(4.0);
        assert!(approx_eq((s * 0.5).raw(), 2.0));
        assert!(approx_eq((0.5 * s).raw(), 2.0));
        assert!(approx_eq((s / 4.0).raw(), 1.0));
    }

    #[test]
    fn test_derived_units() {
        let angle = Radians::new(3.0);
        let dt = Seconds::new(2.0);

        let speed = angle / dt;
        assert!(approx_eq(speed.raw(), 1.5));

        let accel = speed / dt;
        assert!(approx_eq(accel.raw(), 0.75));

        // and back up the chain
        assert!(approx_eq((accel * dt).raw(), 1.5));
        assert!(approx_eq((speed * dt).raw(), 3.0));
    }

    #[test]
    fn test_timestamp_delta() {
        let t0 = Seconds::new(1.25);
        let t1 = Seconds::new(1.75);
        assert!(approx_eq((t1 - t0).raw(), 0.5));
        assert!(t1 > t0);
    }
}
