#![allow(missing_docs)]

//! This module defines the quantity types used by the cost models and their conversions.
//!
//! Capital costs are carried in millions of dollars (M$) and operating costs in M$/year.
//! Flows are in cubic metres per hour; cost curves that were regressed against US-customary
//! flow bases (gal/day, gal/min, Mgal/day) convert via the accessor methods on [`FlowRate`].

/// US gallons in one cubic metre.
pub const GALLONS_PER_CUBIC_METRE: f64 = 264.172;

/// Pounds in one kilogram.
pub const POUNDS_PER_KILOGRAM: f64 = 2.20462;

/// Hours in one day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Hours in one year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Minutes in one day.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Kilowatts in one horsepower.
pub const KILOWATTS_PER_HORSEPOWER: f64 = 0.7457;

/// Represents a dimensionless quantity.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Add, derive_more::Sub)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::from(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless::from(self.0 / rhs.0)
    }
}

impl Dimensionless {
    pub fn powi(self, rhs: i32) -> Self {
        Dimensionless::from(self.0.powi(rhs))
    }
}

impl From<f64> for Dimensionless {
    fn from(val: f64) -> Self {
        Self(val)
    }
}

impl From<Dimensionless> for f64 {
    fn from(val: Dimensionless) -> Self {
        val.0
    }
}

macro_rules! unit_struct {
    ($name:ident) => {
        /// Represents a type of quantity.
        #[derive(Debug, Clone, Copy, PartialEq, derive_more::Add, derive_more::Sub)]
        pub struct $name(pub f64);

        impl $name {
            /// Creates a new instance of the unit type from a f64 value.
            pub fn from(val: f64) -> Self {
                Self(val)
            }

            /// Returns the value of the unit type as a f64.
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name::from(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name::from(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name::from(self.0 / rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::from(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::from(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::from(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Money);
unit_struct!(MoneyPerYear);
unit_struct!(FlowRate);
unit_struct!(Volume);
unit_struct!(Hours);
unit_struct!(Dose);
unit_struct!(Density);
unit_struct!(MassRate);
unit_struct!(Power);
unit_struct!(Head);

// Derived quantities
unit_struct!(ElectricityIntensity);
unit_struct!(MoneyPerMass);
unit_struct!(MoneyPerEnergy);
unit_struct!(MoneyPerVolume);

// Multiplication rules
impl_mul!(FlowRate, Dose, MassRate);
impl_mul!(FlowRate, Hours, Volume);

// Division rules
impl_div!(MassRate, Density, FlowRate);
impl_div!(Power, FlowRate, ElectricityIntensity);

impl FlowRate {
    /// The flow in cubic metres per year.
    pub fn cubic_metres_per_year(self) -> f64 {
        self.0 * HOURS_PER_YEAR
    }

    /// The flow in US gallons per day.
    pub fn gallons_per_day(self) -> f64 {
        self.0 * GALLONS_PER_CUBIC_METRE * HOURS_PER_DAY
    }

    /// The flow in US gallons per minute.
    pub fn gallons_per_minute(self) -> f64 {
        self.gallons_per_day() / MINUTES_PER_DAY
    }

    /// The flow in millions of US gallons per day.
    pub fn million_gallons_per_day(self) -> f64 {
        self.gallons_per_day() * 1e-6
    }
}

impl Dose {
    /// Creates a dose in kg/m³ from a value in mg/L.
    pub fn from_mg_per_litre(val: f64) -> Self {
        Self(val * 1e-3)
    }
}

impl MassRate {
    /// The mass rate in kilograms per day.
    pub fn kilograms_per_day(self) -> f64 {
        self.0 * HOURS_PER_DAY
    }

    /// The mass rate in pounds per day.
    pub fn pounds_per_day(self) -> f64 {
        self.kilograms_per_day() * POUNDS_PER_KILOGRAM
    }
}

impl Power {
    /// Creates a power in kilowatts from a value in horsepower.
    pub fn from_horsepower(val: f64) -> Self {
        Self(val * KILOWATTS_PER_HORSEPOWER)
    }
}
