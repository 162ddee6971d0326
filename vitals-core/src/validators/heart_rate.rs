use crate::{resolve_age_group, PatientContext, RangeTable, ValidationResult, VitalType};

use super::{classify_stratified, group_phrase, is_recordable, stratified_entry, RateTerms};

/// Ngưỡng cấp cứu cố định cho người lớn và người cao tuổi.
const ADULT_EMERGENCY_LOW: f64 = 40.0;
const ADULT_EMERGENCY_HIGH: f64 = 180.0;
/// Trẻ em: nhân với min/max của nhóm tuổi.
const PEDIATRIC_LOW_FACTOR: f64 = 0.6;
const PEDIATRIC_HIGH_FACTOR: f64 = 1.5;

const TERMS: RateTerms = RateTerms {
    label: "Heart rate",
    unit: "bpm",
    low: "low",
    high: "high",
};

/// Nhịp tim (lần/phút).
pub fn validate_heart_rate(
    table: &RangeTable,
    bpm: f64,
    context: Option<&PatientContext>,
) -> ValidationResult {
    if !is_recordable(bpm) {
        return ValidationResult::rejected("Please enter a valid heart rate in beats per minute.");
    }

    let group = resolve_age_group(context);
    let entry = match stratified_entry(table, VitalType::HeartRate, group) {
        Ok(entry) => entry,
        Err(result) => return result,
    };
    let (emergency_low, emergency_high) = if group.is_pediatric() {
        (
            entry.min * PEDIATRIC_LOW_FACTOR,
            entry.max * PEDIATRIC_HIGH_FACTOR,
        )
    } else {
        (ADULT_EMERGENCY_LOW, ADULT_EMERGENCY_HIGH)
    };

    classify_stratified(
        bpm,
        &entry,
        emergency_low,
        emergency_high,
        group_phrase(group),
        &TERMS,
    )
}
