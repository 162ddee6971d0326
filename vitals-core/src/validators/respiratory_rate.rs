use crate::{resolve_age_group, PatientContext, RangeTable, ValidationResult, VitalType};

use super::{classify_stratified, group_phrase, is_recordable, stratified_entry, RateTerms};

const ADULT_EMERGENCY_LOW: f64 = 8.0;
const ADULT_EMERGENCY_HIGH: f64 = 35.0;
const PEDIATRIC_LOW_FACTOR: f64 = 0.5;
const PEDIATRIC_HIGH_FACTOR: f64 = 1.5;

const TERMS: RateTerms = RateTerms {
    label: "Respiratory rate",
    unit: "breaths/min",
    low: "slow",
    high: "fast",
};

/// Nhịp thở (lần/phút). Cùng hình dạng với nhịp tim, khác ngưỡng cấp cứu.
pub fn validate_respiratory_rate(
    table: &RangeTable,
    breaths_per_minute: f64,
    context: Option<&PatientContext>,
) -> ValidationResult {
    if !is_recordable(breaths_per_minute) {
        return ValidationResult::rejected(
            "Please enter a valid respiratory rate in breaths per minute.",
        );
    }

    let group = resolve_age_group(context);
    let entry = match stratified_entry(table, VitalType::RespiratoryRate, group) {
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
        breaths_per_minute,
        &entry,
        emergency_low,
        emergency_high,
        group_phrase(group),
        &TERMS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgeGroup, AlertLevel};

    fn check(rate: f64, group: Option<AgeGroup>) -> ValidationResult {
        let context = group.map(PatientContext::with_age_group);
        validate_respiratory_rate(RangeTable::reference(), rate, context.as_ref())
    }

    #[test]
    fn adult_ladder() {
        assert_eq!(check(16.0, None).alert_level, AlertLevel::Normal);
        assert_eq!(check(21.0, None).alert_level, AlertLevel::Warning);
        assert_eq!(check(11.0, None).alert_level, AlertLevel::Warning);
        assert_eq!(check(24.0, None).alert_level, AlertLevel::Critical);
        assert_eq!(check(8.0, None).alert_level, AlertLevel::Critical);
        assert_eq!(check(7.0, None).alert_level, AlertLevel::Emergency);
        assert_eq!(check(36.0, None).alert_level, AlertLevel::Emergency);
    }

    #[test]
    fn warning_does_not_page() {
        let result = check(21.0, None);
        assert!(result.can_save);
        assert!(!result.notify_provider);
        assert!(result.message.contains("fast"));
    }

    #[test]
    fn infant_uses_scaled_emergency_bounds() {
        // infant range 25-50: emergency below 12.5 or above 75
        assert_eq!(check(40.0, Some(AgeGroup::Infant)).alert_level, AlertLevel::Normal);
        assert_eq!(check(13.0, Some(AgeGroup::Infant)).alert_level, AlertLevel::Critical);
        assert_eq!(check(12.0, Some(AgeGroup::Infant)).alert_level, AlertLevel::Emergency);
        assert_eq!(check(76.0, Some(AgeGroup::Infant)).alert_level, AlertLevel::Emergency);
    }

    #[test]
    fn elderly_uses_adult_emergency_constants() {
        assert_eq!(check(22.0, Some(AgeGroup::Elderly)).alert_level, AlertLevel::Normal);
        assert_eq!(check(35.0, Some(AgeGroup::Elderly)).alert_level, AlertLevel::Critical);
        assert_eq!(check(36.0, Some(AgeGroup::Elderly)).alert_level, AlertLevel::Emergency);
    }

    #[test]
    fn zero_is_rejected() {
        assert!(check(0.0, None).is_rejected());
    }

    #[test]
    fn extreme_rate_is_saved_as_emergency() {
        let result = check(180.0, Some(AgeGroup::Neonate));
        assert_eq!(result.alert_level, AlertLevel::Emergency);
        assert!(result.can_save);
        assert!(result.notify_provider);
    }
}
