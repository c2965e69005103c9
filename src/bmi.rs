//! Body Mass Index calculation.

use std::fmt;
use std::str::FromStr;

const METERS_PER_FOOT: f64 = 0.3048;
const METERS_PER_INCH: f64 = 0.0254;

/// Unit a height is given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightUnit {
    /// Meters.
    #[default]
    Meters,
    /// Centimeters.
    Centimeters,
    /// Feet, with inches as the decimal digit: `5.7` is 5 ft 7 in.
    Feet,
}

impl HeightUnit {
    /// Convert `height` in this unit to meters.
    pub fn to_meters(self, height: f64) -> f64 {
        match self {
            Self::Meters => height,
            Self::Centimeters => height / 100.0,
            Self::Feet => {
                let feet = height.trunc();
                let inches = (height - feet) * 10.0;
                feet * METERS_PER_FOOT + inches * METERS_PER_INCH
            }
        }
    }
}

impl FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "m" => Ok(Self::Meters),
            "cm" => Ok(Self::Centimeters),
            "ft" => Ok(Self::Feet),
            other => Err(format!("unknown height unit '{other}' (expected m, cm or ft)")),
        }
    }
}

/// Weight category for a BMI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    /// Below 18.5.
    Underweight,
    /// 18.5 up to 25.
    NormalWeight,
    /// 25 up to 30.
    Overweight,
    /// 30 and above.
    Obese,
}

impl BmiCategory {
    /// Categorize an unrounded BMI.
    pub fn for_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::NormalWeight
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Underweight => "Underweight",
            Self::NormalWeight => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        })
    }
}

/// A computed BMI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiReading {
    /// BMI rounded to two decimals.
    pub value: f64,
    /// Category of the unrounded BMI.
    pub category: BmiCategory,
}

/// Compute BMI from a weight in kilograms and a height in `unit`.
///
/// Returns `None` for a non-positive weight or height.
pub fn calculate(weight_kg: f64, height: f64, unit: HeightUnit) -> Option<BmiReading> {
    if !(weight_kg > 0.0 && height > 0.0) {
        return None;
    }
    let meters = unit.to_meters(height);
    if meters <= 0.0 {
        return None;
    }
    let bmi = weight_kg / (meters * meters);
    Some(BmiReading {
        value: (bmi * 100.0).round() / 100.0,
        category: BmiCategory::for_bmi(bmi),
    })
}
