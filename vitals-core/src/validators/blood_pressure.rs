//! Huyết áp (tâm thu/tâm trương, mmHg).
//!
//! Bậc cảnh báo/bình thường của người lớn, vị thành niên và người cao tuổi dùng các
//! dải có tên riêng; các nhóm trẻ nhỏ hơn dùng [min, max] của bảng tham chiếu.

use crate::{
    resolve_age_group, AgeGroup, PatientContext, RangeTable, ValidationResult, VitalRangeEntry,
    VitalType,
};

use super::{format_value, group_phrase, is_recordable, stratified_entry};

const ADULT_EMERGENCY_SYSTOLIC_HIGH: f64 = 180.0;
const ADULT_EMERGENCY_DIASTOLIC_HIGH: f64 = 120.0;
const ADULT_EMERGENCY_SYSTOLIC_LOW: f64 = 70.0;

const PEDIATRIC_SYSTOLIC_HIGH_MARGIN: f64 = 30.0;
const PEDIATRIC_DIASTOLIC_HIGH_MARGIN: f64 = 20.0;
const PEDIATRIC_SYSTOLIC_LOW_MARGIN: f64 = 20.0;

const RECHECK_ACTION: &str =
    "Sit quietly for five minutes and measure again. Share the reading at your next visit.";
const ELEVATED_NOTIFY_ACTION: &str =
    "Measure again in five minutes. Your care team has been asked to review this reading.";

/// Ngưỡng cấp cứu. Chạm hoặc vượt ngưỡng cao là cấp cứu; thấp hơn ngưỡng thấp cũng vậy.
struct EmergencyLimits {
    systolic_high: f64,
    diastolic_high: f64,
    systolic_low: f64,
}

impl EmergencyLimits {
    fn for_group(group: AgeGroup, systolic: &VitalRangeEntry, diastolic: &VitalRangeEntry) -> Self {
        if group.is_pediatric() {
            Self {
                systolic_high: systolic.max + PEDIATRIC_SYSTOLIC_HIGH_MARGIN,
                diastolic_high: diastolic.max + PEDIATRIC_DIASTOLIC_HIGH_MARGIN,
                systolic_low: systolic.min - PEDIATRIC_SYSTOLIC_LOW_MARGIN,
            }
        } else {
            Self {
                systolic_high: ADULT_EMERGENCY_SYSTOLIC_HIGH,
                diastolic_high: ADULT_EMERGENCY_DIASTOLIC_HIGH,
                systolic_low: ADULT_EMERGENCY_SYSTOLIC_LOW,
            }
        }
    }
}

/// Dải bình thường có tên và ngưỡng gọi bác sĩ cho mức "elevated".
struct NamedBand {
    systolic: (f64, f64),
    diastolic: (f64, f64),
    notify_systolic_above: f64,
    notify_diastolic_above: f64,
}

const ADULT_BAND: NamedBand = NamedBand {
    systolic: (90.0, 120.0),
    diastolic: (60.0, 80.0),
    notify_systolic_above: 130.0,
    notify_diastolic_above: 85.0,
};

const ADOLESCENT_BAND: NamedBand = NamedBand {
    systolic: (90.0, 120.0),
    diastolic: (60.0, 80.0),
    notify_systolic_above: 125.0,
    notify_diastolic_above: 82.0,
};

const ELDERLY_BAND: NamedBand = NamedBand {
    systolic: (90.0, 130.0),
    diastolic: (60.0, 85.0),
    notify_systolic_above: 140.0,
    notify_diastolic_above: 88.0,
};

fn named_band(group: AgeGroup) -> Option<&'static NamedBand> {
    match group {
        AgeGroup::Adult => Some(&ADULT_BAND),
        AgeGroup::Adolescent => Some(&ADOLESCENT_BAND),
        AgeGroup::Elderly => Some(&ELDERLY_BAND),
        _ => None,
    }
}

pub fn validate_blood_pressure(
    table: &RangeTable,
    systolic: f64,
    diastolic: f64,
    context: Option<&PatientContext>,
) -> ValidationResult {
    if !is_recordable(systolic) || !is_recordable(diastolic) {
        return ValidationResult::rejected(
            "Please enter blood pressure as two valid numbers, for example 120/80.",
        );
    }
    if systolic <= diastolic {
        return ValidationResult::rejected(
            "The top (systolic) number must be higher than the bottom (diastolic) number.",
        );
    }

    let group = resolve_age_group(context);
    let (systolic_range, diastolic_range) = match (
        stratified_entry(table, VitalType::SystolicBloodPressure, group),
        stratified_entry(table, VitalType::DiastolicBloodPressure, group),
    ) {
        (Ok(systolic), Ok(diastolic)) => (systolic, diastolic),
        (Err(result), _) | (_, Err(result)) => return result,
    };
    let limits = EmergencyLimits::for_group(group, &systolic_range, &diastolic_range);
    let shown = format!(
        "{}/{} mmHg",
        format_value(systolic),
        format_value(diastolic)
    );

    if systolic >= limits.systolic_high || diastolic >= limits.diastolic_high {
        return ValidationResult::emergency(format!(
            "Blood pressure of {shown} is in the hypertensive crisis range."
        ));
    }
    if systolic < limits.systolic_low {
        return ValidationResult::emergency(format!(
            "Blood pressure of {shown} is dangerously low."
        ));
    }

    let systolic_outside = !systolic_range.within_two_sd(systolic);
    let diastolic_outside = !diastolic_range.within_two_sd(diastolic);
    if systolic_outside || diastolic_outside {
        let high = (systolic_outside && systolic > systolic_range.mean)
            || (diastolic_outside && diastolic > diastolic_range.mean);
        let direction = if high { "high" } else { "low" };
        return ValidationResult::critical(format!(
            "Blood pressure of {shown} is critically {direction} for {}.",
            group_phrase(group)
        ));
    }

    match named_band(group) {
        Some(band) => classify_named(systolic, diastolic, band, &shown),
        None => classify_generic(
            systolic,
            diastolic,
            &systolic_range,
            &diastolic_range,
            group,
            &shown,
        ),
    }
}

fn classify_named(systolic: f64, diastolic: f64, band: &NamedBand, shown: &str) -> ValidationResult {
    if systolic > band.systolic.1 || diastolic > band.diastolic.1 {
        let notify = systolic > band.notify_systolic_above || diastolic > band.notify_diastolic_above;
        let action = if notify {
            ELEVATED_NOTIFY_ACTION
        } else {
            RECHECK_ACTION
        };
        return ValidationResult::warning(
            format!("Blood pressure of {shown} is elevated."),
            action,
            notify,
        );
    }

    if systolic < band.systolic.0 || diastolic < band.diastolic.0 {
        return ValidationResult::warning(
            format!("Blood pressure of {shown} is lower than usual."),
            "Sit or lie down if you feel dizzy and measure again.",
            false,
        );
    }

    ValidationResult::normal(format!("Blood pressure of {shown} is normal."))
}

fn classify_generic(
    systolic: f64,
    diastolic: f64,
    systolic_range: &VitalRangeEntry,
    diastolic_range: &VitalRangeEntry,
    group: AgeGroup,
    shown: &str,
) -> ValidationResult {
    let expected = format!(
        "{}-{}/{}-{} mmHg",
        format_value(systolic_range.min),
        format_value(systolic_range.max),
        format_value(diastolic_range.min),
        format_value(diastolic_range.max)
    );

    if systolic > systolic_range.max || diastolic > diastolic_range.max {
        return ValidationResult::warning(
            format!(
                "Blood pressure of {shown} is above the expected range for {} ({expected}).",
                group_phrase(group)
            ),
            RECHECK_ACTION,
            false,
        );
    }

    if systolic < systolic_range.min || diastolic < diastolic_range.min {
        return ValidationResult::warning(
            format!(
                "Blood pressure of {shown} is below the expected range for {} ({expected}).",
                group_phrase(group)
            ),
            RECHECK_ACTION,
            false,
        );
    }

    ValidationResult::normal(format!("Blood pressure of {shown} is normal."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlertLevel;

    fn bp(systolic: f64, diastolic: f64, group: Option<AgeGroup>) -> ValidationResult {
        let context = group.map(PatientContext::with_age_group);
        validate_blood_pressure(RangeTable::reference(), systolic, diastolic, context.as_ref())
    }

    #[test]
    fn adult_normal_and_elevated() {
        assert_eq!(bp(115.0, 75.0, None).alert_level, AlertLevel::Normal);

        let borderline = bp(130.0, 85.0, None);
        assert_eq!(borderline.alert_level, AlertLevel::Warning);
        assert!(!borderline.notify_provider);
        assert!(borderline.can_save);

        let paged = bp(132.0, 78.0, None);
        assert_eq!(paged.alert_level, AlertLevel::Warning);
        assert!(paged.notify_provider);

        let diastolic_paged = bp(118.0, 86.0, None);
        assert_eq!(diastolic_paged.alert_level, AlertLevel::Warning);
        assert!(diastolic_paged.notify_provider);
    }

    #[test]
    fn adult_critical_and_emergency() {
        // 2SD: systolic 86-134, diastolic 54-86
        assert_eq!(bp(140.0, 80.0, None).alert_level, AlertLevel::Critical);
        assert_eq!(bp(120.0, 90.0, None).alert_level, AlertLevel::Critical);
        assert_eq!(bp(110.0, 50.0, None).alert_level, AlertLevel::Critical);
        assert_eq!(bp(180.0, 100.0, None).alert_level, AlertLevel::Emergency);
        assert_eq!(bp(170.0, 120.0, None).alert_level, AlertLevel::Emergency);
        assert_eq!(bp(69.0, 40.0, None).alert_level, AlertLevel::Emergency);
    }

    #[test]
    fn adult_low_side_warning_does_not_page() {
        let result = bp(88.0, 62.0, None);
        assert_eq!(result.alert_level, AlertLevel::Warning);
        assert!(!result.notify_provider);
    }

    #[test]
    fn relational_violation_is_rejected() {
        for (systolic, diastolic) in [(80.0, 80.0), (70.0, 90.0)] {
            let result = bp(systolic, diastolic, None);
            assert!(!result.is_valid);
            assert!(!result.can_save);
            assert!(result.message.contains("systolic"));
        }
    }

    #[test]
    fn impossible_values_are_rejected() {
        assert!(bp(0.0, 0.0, None).is_rejected());
        assert!(bp(120.0, -4.0, None).is_rejected());
        assert!(bp(f64::NAN, 80.0, None).is_rejected());
    }

    #[test]
    fn extreme_pressure_is_saved_as_emergency() {
        for (systolic, diastolic) in [(320.0, 205.0), (260.0, 130.0)] {
            let result = bp(systolic, diastolic, None);
            assert_eq!(result.alert_level, AlertLevel::Emergency);
            assert!(result.is_valid);
            assert!(result.can_save);
            assert!(result.notify_provider);
        }
    }

    #[test]
    fn pediatric_emergency_margins() {
        // toddler systolic 80-110, diastolic 40-70
        assert_eq!(
            bp(140.0, 60.0, Some(AgeGroup::Toddler)).alert_level,
            AlertLevel::Emergency
        );
        assert_eq!(
            bp(100.0, 90.0, Some(AgeGroup::Toddler)).alert_level,
            AlertLevel::Emergency
        );
        assert_eq!(
            bp(59.0, 35.0, Some(AgeGroup::Toddler)).alert_level,
            AlertLevel::Emergency
        );
        assert_eq!(
            bp(139.0, 60.0, Some(AgeGroup::Toddler)).alert_level,
            AlertLevel::Critical
        );
    }

    #[test]
    fn young_children_fall_back_to_table_range() {
        assert_eq!(
            bp(95.0, 55.0, Some(AgeGroup::Toddler)).alert_level,
            AlertLevel::Normal
        );
        let high = bp(111.0, 60.0, Some(AgeGroup::Toddler));
        assert_eq!(high.alert_level, AlertLevel::Warning);
        assert!(!high.notify_provider);
        let low = bp(79.0, 50.0, Some(AgeGroup::Toddler));
        assert_eq!(low.alert_level, AlertLevel::Warning);
        assert!(low.message.contains("below"));
    }

    #[test]
    fn adult_reading_is_normal_for_elderly_but_elevated_for_adolescent() {
        assert_eq!(
            bp(125.0, 82.0, Some(AgeGroup::Elderly)).alert_level,
            AlertLevel::Normal
        );
        let adolescent = bp(125.0, 78.0, Some(AgeGroup::Adolescent));
        assert_eq!(adolescent.alert_level, AlertLevel::Warning);
        assert!(!adolescent.notify_provider);
        assert!(bp(126.0, 78.0, Some(AgeGroup::Adolescent)).notify_provider);
    }

    #[test]
    fn elderly_emergency_uses_adult_constants() {
        assert_eq!(
            bp(180.0, 90.0, Some(AgeGroup::Elderly)).alert_level,
            AlertLevel::Emergency
        );
        assert_eq!(
            bp(142.0, 80.0, Some(AgeGroup::Elderly)).alert_level,
            AlertLevel::Warning
        );
        assert!(bp(142.0, 80.0, Some(AgeGroup::Elderly)).notify_provider);
    }
}
