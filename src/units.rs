//! This module defines the unit types used for plant data, demand and costs.
//!
//! Production in a period is treated as a power level held for one period, so "power" and
//! "energy per period" are the same quantity here.
use serde::{Deserialize, Serialize};
use std::iter::Sum;

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn new(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is finite
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                $name(iter.map(|x| x.0).sum())
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

/// Represents a dimensionless quantity (e.g. the renewable penetration factor).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Display,
)]
pub struct Dimensionless(pub f64);

impl Dimensionless {
    /// Creates a new dimensionless quantity
    pub fn new(val: f64) -> Self {
        Self(val)
    }

    /// Returns the value as a f64
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

// Base quantities
unit_struct!(Power);
unit_struct!(Money);

// Derived quantities
unit_struct!(MoneyPerPower);

// Multiplication rules
impl_mul!(MoneyPerPower, Power, Money);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_money_per_power_times_power() {
        let cost = MoneyPerPower(7.5) * Power(4.0);
        assert_approx_eq!(f64, cost.value(), 30.0);

        let cost = Power(4.0) * MoneyPerPower(7.5);
        assert_approx_eq!(f64, cost.value(), 30.0);
    }

    #[test]
    fn test_scale_by_dimensionless() {
        let credited = Dimensionless(0.25) * Power(200.0);
        assert_eq!(credited, Power(50.0));
    }

    #[test]
    fn test_sum() {
        let total: Power = [Power(1.0), Power(2.5), Power(3.5)].into_iter().sum();
        assert_eq!(total, Power(7.0));
    }
}
