//! Lõi phân loại chỉ số sống và quyết định mức cảnh báo.
//!
//! Mỗi phép kiểm tra là một hàm thuần: nhận một giá trị đo (hai giá trị với huyết áp),
//! ngữ cảnh tuổi tùy chọn, và trả về [`ValidationResult`]. Không lưu trạng thái,
//! không I/O; việc ghi dữ liệu và gửi thông báo thuộc về lớp gọi.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod age;
pub mod ranges;
pub mod result;
pub mod units;
pub mod validators;

pub use age::{classify, resolve_age_group, AgeGroup, PatientContext};
pub use ranges::{RangeTable, VitalRangeEntry};
pub use result::{AlertLevel, ValidationResult};
pub use units::{ensure_unit, GlucoseUnit, TemperatureUnit, WeightUnit};
pub use validators::{
    parse_blood_pressure, parse_measurement, validate, validate_blood_glucose,
    validate_blood_pressure, validate_heart_rate, validate_oxygen_saturation,
    validate_respiratory_rate, validate_temperature, validate_text, validate_weight,
    VitalReading,
};

/// Loại chỉ số sống mà engine hỗ trợ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    HeartRate,
    RespiratoryRate,
    SystolicBloodPressure,
    DiastolicBloodPressure,
    BloodPressure,
    OxygenSaturation,
    Temperature,
    BloodGlucose,
    Weight,
}

impl VitalType {
    /// Các loại chỉ số người dùng có thể nhập (huyết áp là một cặp).
    pub const MEASURABLE: [VitalType; 7] = [
        VitalType::HeartRate,
        VitalType::RespiratoryRate,
        VitalType::BloodPressure,
        VitalType::OxygenSaturation,
        VitalType::Temperature,
        VitalType::BloodGlucose,
        VitalType::Weight,
    ];

    /// Chỉ số có bảng tham chiếu theo nhóm tuổi.
    pub fn is_age_stratified(self) -> bool {
        matches!(
            self,
            VitalType::HeartRate
                | VitalType::RespiratoryRate
                | VitalType::SystolicBloodPressure
                | VitalType::DiastolicBloodPressure
                | VitalType::BloodPressure
        )
    }

    /// Đơn vị chuẩn mà validator mong đợi.
    pub fn canonical_unit(self) -> &'static str {
        match self {
            VitalType::HeartRate => "bpm",
            VitalType::RespiratoryRate => "breaths/min",
            VitalType::SystolicBloodPressure
            | VitalType::DiastolicBloodPressure
            | VitalType::BloodPressure => "mmHg",
            VitalType::OxygenSaturation => "%",
            VitalType::Temperature => "°F",
            VitalType::BloodGlucose => "mg/dL",
            VitalType::Weight => "lb",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VitalType::HeartRate => "Heart rate",
            VitalType::RespiratoryRate => "Respiratory rate",
            VitalType::SystolicBloodPressure => "Systolic blood pressure",
            VitalType::DiastolicBloodPressure => "Diastolic blood pressure",
            VitalType::BloodPressure => "Blood pressure",
            VitalType::OxygenSaturation => "Oxygen saturation",
            VitalType::Temperature => "Temperature",
            VitalType::BloodGlucose => "Blood glucose",
            VitalType::Weight => "Weight",
        }
    }
}

impl fmt::Display for VitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VitalType::HeartRate => "heart_rate",
            VitalType::RespiratoryRate => "respiratory_rate",
            VitalType::SystolicBloodPressure => "systolic_blood_pressure",
            VitalType::DiastolicBloodPressure => "diastolic_blood_pressure",
            VitalType::BloodPressure => "blood_pressure",
            VitalType::OxygenSaturation => "oxygen_saturation",
            VitalType::Temperature => "temperature",
            VitalType::BloodGlucose => "blood_glucose",
            VitalType::Weight => "weight",
        };
        f.write_str(name)
    }
}

impl FromStr for VitalType {
    type Err = VitalsError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "heart_rate" | "hr" | "pulse" => Ok(VitalType::HeartRate),
            "respiratory_rate" | "rr" | "resp" => Ok(VitalType::RespiratoryRate),
            "systolic_blood_pressure" | "systolic" => Ok(VitalType::SystolicBloodPressure),
            "diastolic_blood_pressure" | "diastolic" => Ok(VitalType::DiastolicBloodPressure),
            "blood_pressure" | "bp" => Ok(VitalType::BloodPressure),
            "oxygen_saturation" | "spo2" | "o2_sat" => Ok(VitalType::OxygenSaturation),
            "temperature" | "temp" => Ok(VitalType::Temperature),
            "blood_glucose" | "glucose" | "bg" => Ok(VitalType::BloodGlucose),
            "weight" | "wt" => Ok(VitalType::Weight),
            _ => Err(VitalsError::UnsupportedVital(input.to_string())),
        }
    }
}

/// Cấu hình cho các lớp cầu nối (FHIR, WASM, CLI) khi dữ liệu vào thiếu đơn vị.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VitalsConfig {
    pub default_temperature_unit: TemperatureUnit,
    pub default_weight_unit: WeightUnit,
    pub default_glucose_unit: GlucoseUnit,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            default_temperature_unit: TemperatureUnit::Fahrenheit,
            default_weight_unit: WeightUnit::Pound,
            default_glucose_unit: GlucoseUnit::MilligramsPerDeciliter,
        }
    }
}

impl VitalsConfig {
    /// Dựng reading một giá trị đã quy về đơn vị chuẩn. Thiếu đơn vị thì dùng đơn vị
    /// mặc định của cấu hình; đơn vị không khớp với chỉ số là lỗi.
    pub fn reading(
        &self,
        vital: VitalType,
        value: f64,
        unit: Option<&str>,
        fasting: Option<bool>,
    ) -> Result<VitalReading, VitalsError> {
        let reading = match vital {
            VitalType::Temperature => {
                let unit = match unit {
                    Some(unit) => unit.parse::<TemperatureUnit>()?,
                    None => self.default_temperature_unit,
                };
                VitalReading::Temperature {
                    value: unit.to_fahrenheit(value),
                }
            }
            VitalType::Weight => {
                let unit = match unit {
                    Some(unit) => unit.parse::<WeightUnit>()?,
                    None => self.default_weight_unit,
                };
                VitalReading::Weight {
                    value: unit.to_pounds(value),
                }
            }
            VitalType::BloodGlucose => {
                let unit = match unit {
                    Some(unit) => unit.parse::<GlucoseUnit>()?,
                    None => self.default_glucose_unit,
                };
                VitalReading::BloodGlucose {
                    value: unit.to_mg_dl(value),
                    fasting,
                }
            }
            other => {
                if let Some(unit) = unit {
                    ensure_unit(other, unit)?;
                }
                VitalReading::single(other, value).ok_or_else(|| {
                    VitalsError::Parse(format!("{other} cần hai giá trị tâm thu/tâm trương"))
                })?
            }
        };

        Ok(reading)
    }
}

/// Lỗi của phần hạ tầng xung quanh engine.
///
/// Kết quả phân loại (kể cả cấp cứu) không bao giờ là lỗi; chúng luôn đi qua
/// [`ValidationResult`].
#[derive(Debug, thiserror::Error)]
pub enum VitalsError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Chỉ số không được hỗ trợ: {0}")]
    UnsupportedVital(String),
    #[error("Đơn vị '{unit}' không hợp lệ cho {vital}")]
    UnsupportedUnit { vital: VitalType, unit: String },
    #[error("Lỗi khác: {0}")]
    Other(String),
}
