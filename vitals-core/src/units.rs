//! Quy đổi về đơn vị chuẩn của engine (°F, lb, mg/dL).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{VitalType, VitalsError};

const POUNDS_PER_KILOGRAM: f64 = 2.20462;
const MG_DL_PER_MMOL_L: f64 = 18.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn to_fahrenheit(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Fahrenheit => value,
            TemperatureUnit::Celsius => value * 9.0 / 5.0 + 32.0,
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = VitalsError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "[degF]" | "degF" | "°F" | "F" | "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "Cel" | "degC" | "°C" | "C" | "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            other => Err(unsupported(VitalType::Temperature, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Pound,
    Kilogram,
    Gram,
}

impl WeightUnit {
    pub fn to_pounds(self, value: f64) -> f64 {
        match self {
            WeightUnit::Pound => value,
            WeightUnit::Kilogram => value * POUNDS_PER_KILOGRAM,
            WeightUnit::Gram => value / 1000.0 * POUNDS_PER_KILOGRAM,
        }
    }
}

impl FromStr for WeightUnit {
    type Err = VitalsError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "[lb_av]" | "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Pound),
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kilogram),
            "g" | "gram" | "grams" => Ok(WeightUnit::Gram),
            other => Err(unsupported(VitalType::Weight, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GlucoseUnit {
    MilligramsPerDeciliter,
    MillimolesPerLiter,
}

impl GlucoseUnit {
    pub fn to_mg_dl(self, value: f64) -> f64 {
        match self {
            GlucoseUnit::MilligramsPerDeciliter => value,
            GlucoseUnit::MillimolesPerLiter => value * MG_DL_PER_MMOL_L,
        }
    }
}

impl FromStr for GlucoseUnit {
    type Err = VitalsError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "mg/dL" | "mg/dl" => Ok(GlucoseUnit::MilligramsPerDeciliter),
            "mmol/L" | "mmol/l" => Ok(GlucoseUnit::MillimolesPerLiter),
            other => Err(unsupported(VitalType::BloodGlucose, other)),
        }
    }
}

/// Kiểm tra `unit` là đơn vị hợp lệ của `vital`.
///
/// Nhịp tim, nhịp thở, SpO2 và huyết áp không quy đổi: chỉ nhận đơn vị chuẩn và mã
/// UCUM tương đương. Các chỉ số còn lại nhận mọi đơn vị quy đổi được.
pub fn ensure_unit(vital: VitalType, unit: &str) -> Result<(), VitalsError> {
    let accepted: &[&str] = match vital {
        VitalType::HeartRate => &["/min", "beats/min", "beats/minute", "{beats}/min", "{beat}/min"],
        VitalType::RespiratoryRate => &[
            "/min",
            "breaths/minute",
            "{breaths}/min",
            "{breath}/min",
        ],
        VitalType::OxygenSaturation => &["%{saturation}", "%{oxygen}"],
        VitalType::SystolicBloodPressure
        | VitalType::DiastolicBloodPressure
        | VitalType::BloodPressure => &["mm[Hg]"],
        VitalType::Temperature => return unit.parse::<TemperatureUnit>().map(drop),
        VitalType::Weight => return unit.parse::<WeightUnit>().map(drop),
        VitalType::BloodGlucose => return unit.parse::<GlucoseUnit>().map(drop),
    };

    let unit = unit.trim();
    if unit.eq_ignore_ascii_case(vital.canonical_unit())
        || accepted.iter().any(|alias| unit.eq_ignore_ascii_case(alias))
    {
        Ok(())
    } else {
        Err(unsupported(vital, unit))
    }
}

fn unsupported(vital: VitalType, unit: &str) -> VitalsError {
    VitalsError::UnsupportedUnit {
        vital,
        unit: unit.to_string(),
    }
}
