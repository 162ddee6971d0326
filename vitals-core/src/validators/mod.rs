//! Validator cho từng loại chỉ số và bộ điều phối chung.
//!
//! Mọi validator (trừ cân nặng) đi theo cùng một bậc thang: từ chối đầu vào sai
//! định dạng, rồi cấp cứu, nguy kịch (ngoài ±2SD), cảnh báo, bình thường. Bậc đầu
//! tiên khớp sẽ thắng.

use serde::{Deserialize, Serialize};

use crate::{AlertLevel, PatientContext, RangeTable, ValidationResult, VitalRangeEntry, VitalType};

mod blood_pressure;
mod glucose;
mod heart_rate;
mod oxygen_saturation;
mod respiratory_rate;
mod temperature;
mod weight;

pub use blood_pressure::validate_blood_pressure;
pub use glucose::validate_blood_glucose;
pub use heart_rate::validate_heart_rate;
pub use oxygen_saturation::validate_oxygen_saturation;
pub use respiratory_rate::validate_respiratory_rate;
pub use temperature::validate_temperature;
pub use weight::validate_weight;

/// Một lần đo đã quy về đơn vị chuẩn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "vital", rename_all = "snake_case")]
pub enum VitalReading {
    HeartRate {
        value: f64,
    },
    RespiratoryRate {
        value: f64,
    },
    BloodPressure {
        systolic: f64,
        diastolic: f64,
    },
    OxygenSaturation {
        value: f64,
    },
    Temperature {
        value: f64,
    },
    BloodGlucose {
        value: f64,
        #[serde(default)]
        fasting: Option<bool>,
    },
    Weight {
        value: f64,
    },
}

impl VitalReading {
    pub fn vital(&self) -> VitalType {
        match self {
            VitalReading::HeartRate { .. } => VitalType::HeartRate,
            VitalReading::RespiratoryRate { .. } => VitalType::RespiratoryRate,
            VitalReading::BloodPressure { .. } => VitalType::BloodPressure,
            VitalReading::OxygenSaturation { .. } => VitalType::OxygenSaturation,
            VitalReading::Temperature { .. } => VitalType::Temperature,
            VitalReading::BloodGlucose { .. } => VitalType::BloodGlucose,
            VitalReading::Weight { .. } => VitalType::Weight,
        }
    }

    /// Dựng reading từ một giá trị số cho các chỉ số đơn trị.
    pub fn single(vital: VitalType, value: f64) -> Option<Self> {
        match vital {
            VitalType::HeartRate => Some(VitalReading::HeartRate { value }),
            VitalType::RespiratoryRate => Some(VitalReading::RespiratoryRate { value }),
            VitalType::OxygenSaturation => Some(VitalReading::OxygenSaturation { value }),
            VitalType::Temperature => Some(VitalReading::Temperature { value }),
            VitalType::BloodGlucose => Some(VitalReading::BloodGlucose {
                value,
                fasting: None,
            }),
            VitalType::Weight => Some(VitalReading::Weight { value }),
            VitalType::BloodPressure
            | VitalType::SystolicBloodPressure
            | VitalType::DiastolicBloodPressure => None,
        }
    }

    /// Giá trị hiển thị, ví dụ `120/80` hoặc `98.6`.
    pub fn display_value(&self) -> String {
        match self {
            VitalReading::BloodPressure {
                systolic,
                diastolic,
            } => format!("{}/{}", format_value(*systolic), format_value(*diastolic)),
            VitalReading::HeartRate { value }
            | VitalReading::RespiratoryRate { value }
            | VitalReading::OxygenSaturation { value }
            | VitalReading::Temperature { value }
            | VitalReading::BloodGlucose { value, .. }
            | VitalReading::Weight { value } => format_value(*value),
        }
    }
}

/// Điểm vào chung: chọn validator theo loại chỉ số.
pub fn validate(
    table: &RangeTable,
    reading: &VitalReading,
    context: Option<&PatientContext>,
) -> ValidationResult {
    let result = match *reading {
        VitalReading::HeartRate { value } => validate_heart_rate(table, value, context),
        VitalReading::RespiratoryRate { value } => {
            validate_respiratory_rate(table, value, context)
        }
        VitalReading::BloodPressure {
            systolic,
            diastolic,
        } => validate_blood_pressure(table, systolic, diastolic, context),
        VitalReading::OxygenSaturation { value } => validate_oxygen_saturation(value),
        VitalReading::Temperature { value } => validate_temperature(value, context),
        VitalReading::BloodGlucose { value, fasting } => validate_blood_glucose(value, fasting),
        VitalReading::Weight { value } => validate_weight(value),
    };

    let vital = reading.vital();
    match result.alert_level {
        _ if result.is_rejected() => {
            log::warn!("{vital} input rejected: {}", result.message);
        }
        AlertLevel::Emergency => {
            log::info!("{vital} {} classified as emergency", reading.display_value());
        }
        level => {
            log::debug!("{vital} {} classified as {level}", reading.display_value());
        }
    }

    result
}

/// Kiểm tra giá trị do người dùng gõ vào. Chữ không phải số bị từ chối với thông
/// báo hướng dẫn; huyết áp nhận dạng `120/80`.
pub fn validate_text(
    table: &RangeTable,
    vital: VitalType,
    raw: &str,
    context: Option<&PatientContext>,
) -> ValidationResult {
    let reading = match vital {
        VitalType::BloodPressure => parse_blood_pressure(raw).map(|(systolic, diastolic)| {
            VitalReading::BloodPressure {
                systolic,
                diastolic,
            }
        }),
        VitalType::SystolicBloodPressure | VitalType::DiastolicBloodPressure => {
            return ValidationResult::rejected(
                "Please enter both blood pressure numbers, for example 120/80.",
            );
        }
        other => parse_measurement(raw).and_then(|value| VitalReading::single(other, value)),
    };

    match reading {
        Some(reading) => validate(table, &reading, context),
        None => {
            log::warn!("{vital} input {raw:?} is not a number");
            ValidationResult::rejected(format!(
                "Please enter a valid number for {}.",
                vital.label().to_lowercase()
            ))
        }
    }
}

/// Số hữu hạn, bỏ khoảng trắng. `NaN` và vô cực không được nhận.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Tách `"120/80"` thành (tâm thu, tâm trương).
pub fn parse_blood_pressure(raw: &str) -> Option<(f64, f64)> {
    let (systolic, diastolic) = raw.trim().split_once('/')?;
    Some((parse_measurement(systolic)?, parse_measurement(diastolic)?))
}

/// Giá trị dương và hữu hạn. Không có trần trên: giá trị cực đoan vẫn được lưu ở
/// bậc cấp cứu.
pub(crate) fn is_recordable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn format_value(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else if ((value * 10.0).round() - value * 10.0).abs() < 1e-9 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

/// Cách gọi tên một chỉ số nhịp (tim, thở) trong thông báo.
pub(crate) struct RateTerms {
    pub label: &'static str,
    pub unit: &'static str,
    pub low: &'static str,
    pub high: &'static str,
}

/// Bậc thang cho chỉ số có bảng theo tuổi: cấp cứu, ±2SD, [min, max], bình thường.
///
/// Cảnh báo ở bậc này không tự gửi cho bác sĩ; bậc nguy kịch đã làm việc đó.
pub(crate) fn classify_stratified(
    value: f64,
    entry: &VitalRangeEntry,
    emergency_low: f64,
    emergency_high: f64,
    group_name: &str,
    terms: &RateTerms,
) -> ValidationResult {
    let shown = format!("{} {}", format_value(value), terms.unit);
    let expected = format!(
        "{}-{} {}",
        format_value(entry.min),
        format_value(entry.max),
        terms.unit
    );

    if value < emergency_low {
        return ValidationResult::emergency(format!(
            "{} of {shown} is dangerously {}.",
            terms.label, terms.low
        ));
    }
    if value > emergency_high {
        return ValidationResult::emergency(format!(
            "{} of {shown} is dangerously {}.",
            terms.label, terms.high
        ));
    }

    if !entry.within_two_sd(value) {
        let direction = if value < entry.mean { terms.low } else { terms.high };
        return ValidationResult::critical(format!(
            "{} of {shown} is critically {direction} for {group_name} (expected {expected}).",
            terms.label
        ));
    }

    if !entry.contains(value) {
        let direction = if value < entry.min { terms.low } else { terms.high };
        return ValidationResult::warning(
            format!(
                "{} of {shown} is slightly {direction} for {group_name} (expected {expected}).",
                terms.label
            ),
            "Rest for a few minutes and measure again. Contact your care team if it persists.",
            false,
        );
    }

    ValidationResult::normal(format!(
        "{} of {shown} is within the expected range.",
        terms.label
    ))
}

/// Dòng tham chiếu của một chỉ số có bảng theo tuổi. Bảng tham chiếu có đủ dòng cho
/// nhịp tim, nhịp thở và hai thành phần huyết áp.
pub(crate) fn stratified_entry(
    table: &RangeTable,
    vital: VitalType,
    group: crate::AgeGroup,
) -> Result<VitalRangeEntry, ValidationResult> {
    table.entry_or_adult(vital, group).ok_or_else(|| {
        log::error!("no range entry for {vital}/{group}");
        ValidationResult::rejected(format!(
            "{} cannot be checked right now. Please try again later.",
            vital.label()
        ))
    })
}

/// Tên nhóm tuổi dùng trong câu thông báo.
pub(crate) fn group_phrase(group: crate::AgeGroup) -> &'static str {
    use crate::AgeGroup::*;
    match group {
        Neonate => "a newborn",
        Infant => "an infant",
        Toddler => "a toddler",
        Child => "a child",
        Adolescent => "an adolescent",
        Adult => "an adult",
        Elderly => "an older adult",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgeGroup;

    #[test]
    fn non_numeric_text_is_rejected_with_guidance() {
        let result = validate_text(
            RangeTable::reference(),
            VitalType::HeartRate,
            "eighty",
            None,
        );
        assert!(!result.can_save);
        assert!(result.message.contains("valid number"));
    }

    #[test]
    fn nan_and_infinity_are_not_numbers() {
        assert_eq!(parse_measurement("NaN"), None);
        assert_eq!(parse_measurement("inf"), None);
        assert_eq!(parse_measurement(" 98.6 "), Some(98.6));
    }

    #[test]
    fn blood_pressure_text_is_split_on_slash() {
        assert_eq!(parse_blood_pressure("120/80"), Some((120.0, 80.0)));
        assert_eq!(parse_blood_pressure(" 118 / 76 "), Some((118.0, 76.0)));
        assert_eq!(parse_blood_pressure("120"), None);
        assert_eq!(parse_blood_pressure("high/low"), None);

        let result = validate_text(
            RangeTable::reference(),
            VitalType::BloodPressure,
            "115/75",
            None,
        );
        assert_eq!(result.alert_level, AlertLevel::Normal);
    }

    #[test]
    fn single_component_pressure_is_rejected() {
        let result = validate_text(
            RangeTable::reference(),
            VitalType::SystolicBloodPressure,
            "120",
            None,
        );
        assert!(result.is_rejected());
    }

    #[test]
    fn dispatcher_uses_context_for_stratified_vitals() {
        let table = RangeTable::reference();
        let reading = VitalReading::HeartRate { value: 130.0 };
        let adult = validate(table, &reading, None);
        let infant = validate(
            table,
            &reading,
            Some(&PatientContext::with_age_group(AgeGroup::Infant)),
        );
        assert_eq!(adult.alert_level, AlertLevel::Critical);
        assert_eq!(infant.alert_level, AlertLevel::Normal);
    }

    #[test]
    fn reading_deserializes_with_vital_tag() {
        let reading: VitalReading = serde_json::from_str(
            r#"{"vital": "blood_glucose", "value": 88, "fasting": true}"#,
        )
        .unwrap();
        assert_eq!(
            reading,
            VitalReading::BloodGlucose {
                value: 88.0,
                fasting: Some(true)
            }
        );
        assert_eq!(reading.vital(), VitalType::BloodGlucose);
    }

    #[test]
    fn display_value_trims_trailing_zeroes() {
        assert_eq!(format_value(80.0), "80");
        assert_eq!(format_value(98.6), "98.6");
        assert_eq!(
            VitalReading::BloodPressure {
                systolic: 130.0,
                diastolic: 85.0
            }
            .display_value(),
            "130/85"
        );
    }
}
