use vitals_core::{
    validate, validate_blood_glucose, validate_blood_pressure, validate_heart_rate,
    validate_oxygen_saturation, validate_temperature, AgeGroup, AlertLevel, PatientContext,
    RangeTable, VitalReading,
};

fn table() -> &'static RangeTable {
    RangeTable::reference()
}

#[test]
fn adult_heart_rate_scenarios() {
    assert_eq!(
        validate_heart_rate(table(), 80.0, None).alert_level,
        AlertLevel::Normal
    );
    assert_eq!(
        validate_heart_rate(table(), 45.0, None).alert_level,
        AlertLevel::Critical
    );
    assert_eq!(
        validate_heart_rate(table(), 35.0, None).alert_level,
        AlertLevel::Emergency
    );
}

#[test]
fn adult_blood_pressure_130_over_85_warns_without_paging() {
    let result = validate_blood_pressure(table(), 130.0, 85.0, None);
    assert_eq!(result.alert_level, AlertLevel::Warning);
    assert!(!result.notify_provider);
    assert!(result.can_save);
}

#[test]
fn low_oxygen_saturation_is_an_emergency() {
    let result = validate_oxygen_saturation(88.0);
    assert_eq!(result.alert_level, AlertLevel::Emergency);
    assert!(result.notify_provider);
}

#[test]
fn glucose_scenarios() {
    assert_eq!(
        validate_blood_glucose(45.0, None).alert_level,
        AlertLevel::Emergency
    );
    let low = validate_blood_glucose(55.0, None);
    assert_eq!(low.alert_level, AlertLevel::Warning);
    assert!(low.notify_provider);
}

#[test]
fn temperature_100_depends_on_pediatric_status() {
    let pediatric = PatientContext::with_age(8, 0);
    assert_eq!(
        validate_temperature(100.0, Some(&pediatric)).alert_level,
        AlertLevel::Normal
    );
    let adult = PatientContext::with_age(40, 0);
    assert_eq!(
        validate_temperature(100.0, Some(&adult)).alert_level,
        AlertLevel::Warning
    );
}

#[test]
fn explicit_age_group_drives_dispatch() {
    let neonate = PatientContext::with_age_group(AgeGroup::Neonate);
    let reading = VitalReading::RespiratoryRate { value: 50.0 };
    assert_eq!(
        validate(table(), &reading, Some(&neonate)).alert_level,
        AlertLevel::Normal
    );
    assert_eq!(
        validate(table(), &reading, None).alert_level,
        AlertLevel::Emergency
    );
}

#[test]
fn emergency_action_tells_patient_to_seek_care() {
    let result = validate_heart_rate(table(), 200.0, None);
    assert_eq!(result.alert_level, AlertLevel::Emergency);
    assert!(result.action.contains("911"));
}

#[test]
fn normal_results_have_no_action() {
    for reading in [
        VitalReading::HeartRate { value: 72.0 },
        VitalReading::RespiratoryRate { value: 14.0 },
        VitalReading::BloodPressure {
            systolic: 112.0,
            diastolic: 72.0,
        },
        VitalReading::OxygenSaturation { value: 98.0 },
        VitalReading::Temperature { value: 98.6 },
        VitalReading::BloodGlucose {
            value: 90.0,
            fasting: Some(true),
        },
        VitalReading::Weight { value: 165.0 },
    ] {
        let result = validate(table(), &reading, None);
        assert_eq!(result.alert_level, AlertLevel::Normal, "{reading:?}");
        assert!(result.action.is_empty());
        assert!(!result.notify_provider);
    }
}
