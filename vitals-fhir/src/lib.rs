//! FHIR `Observation` to `ValidationResult` bridge.
//!
//! Vital-sign observations are recognised by LOINC code (falling back to the display
//! text), normalised to the engine's canonical units and run through the validators
//! with an age context derived from the bundle's `Patient.birthDate`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vitals_core::{
    validate, AlertLevel, PatientContext, RangeTable, ValidationResult, VitalReading, VitalType,
    VitalsConfig, VitalsError,
};

const LOINC_SYSTEM: &str = "http://loinc.org";

const SYSTOLIC_CODE: &str = "8480-6";
const DIASTOLIC_CODE: &str = "8462-4";

/// LOINC codes for the vitals the engine understands. The flag marks fasting glucose.
const LOINC_VITALS: [(&str, VitalType, Option<bool>); 14] = [
    ("8867-4", VitalType::HeartRate, None),
    ("9279-1", VitalType::RespiratoryRate, None),
    ("85354-9", VitalType::BloodPressure, None),
    ("55284-4", VitalType::BloodPressure, None),
    ("59408-5", VitalType::OxygenSaturation, None),
    ("2708-6", VitalType::OxygenSaturation, None),
    ("8310-5", VitalType::Temperature, None),
    ("8331-1", VitalType::Temperature, None),
    ("2339-0", VitalType::BloodGlucose, None),
    ("2345-7", VitalType::BloodGlucose, None),
    ("15074-8", VitalType::BloodGlucose, None),
    ("1558-6", VitalType::BloodGlucose, Some(true)),
    ("29463-7", VitalType::Weight, None),
    ("3141-9", VitalType::Weight, None),
];

/// One vital-sign observation and its classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservationAssessment {
    pub id: String,
    pub vital: VitalType,
    pub recorded_at: Option<DateTime<Utc>>,
    pub reading: VitalReading,
    pub result: ValidationResult,
}

/// Every vital in a bundle, plus the roll-up the paging layer reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleAssessment {
    pub generated_at: DateTime<Utc>,
    pub assessments: Vec<ObservationAssessment>,
    /// Most severe tier among accepted readings.
    pub highest_alert: Option<AlertLevel>,
    pub notify_provider: bool,
    /// Vital observations that could not be read (missing value, unknown unit).
    pub skipped: usize,
}

impl BundleAssessment {
    fn from_assessments(assessments: Vec<ObservationAssessment>, skipped: usize) -> Self {
        let highest_alert = assessments
            .iter()
            .filter(|assessment| assessment.result.is_valid)
            .map(|assessment| assessment.result.alert_level)
            .max();
        let notify_provider = assessments
            .iter()
            .any(|assessment| assessment.result.notify_provider);

        Self {
            generated_at: Utc::now(),
            assessments,
            highest_alert,
            notify_provider,
            skipped,
        }
    }

    /// Assessments the care team should be paged about.
    pub fn paging(&self) -> impl Iterator<Item = &ObservationAssessment> {
        self.assessments
            .iter()
            .filter(|assessment| assessment.result.notify_provider)
    }
}

/// Assess a bundle from a JSON string.
pub fn assess_bundle_str(
    bundle_json: &str,
    config: &VitalsConfig,
) -> Result<BundleAssessment, VitalsError> {
    let value: Value =
        serde_json::from_str(bundle_json).map_err(|err| VitalsError::Parse(err.to_string()))?;
    assess_bundle_value(&value, config)
}

/// Assess a bundle from a `serde_json::Value`.
pub fn assess_bundle_value(
    bundle: &Value,
    config: &VitalsConfig,
) -> Result<BundleAssessment, VitalsError> {
    let bundle_type = bundle
        .get("resourceType")
        .and_then(Value::as_str)
        .ok_or(VitalsError::MissingData)?;

    if bundle_type != "Bundle" {
        return Err(VitalsError::Parse(format!(
            "Expected resourceType Bundle, received {bundle_type}"
        )));
    }

    let entries = bundle
        .get("entry")
        .and_then(Value::as_array)
        .ok_or(VitalsError::MissingData)?;

    let resources: Vec<&Value> = entries
        .iter()
        .filter_map(|entry| entry.get("resource"))
        .collect();

    let birth_date = resources
        .iter()
        .find(|resource| resource_type(resource) == Some("Patient"))
        .and_then(|patient| patient.get("birthDate"))
        .and_then(Value::as_str)
        .and_then(parse_date);

    let mut assessments = Vec::new();
    let mut skipped = 0;

    for resource in resources {
        if resource_type(resource) != Some("Observation") {
            continue;
        }

        let context = birth_date.and_then(|birth| {
            let on = extract_observation_timestamp(resource)
                .map(|recorded| recorded.date_naive())
                .unwrap_or_else(|| Utc::now().date_naive());
            PatientContext::from_birth_date(birth, on)
        });

        match assess_observation(resource, context.as_ref(), config) {
            Ok(Some(assessment)) => assessments.push(assessment),
            Ok(None) => {}
            Err(err) => {
                log::warn!(
                    "skipping observation {}: {err}",
                    resource_id(resource, "observation")
                );
                skipped += 1;
            }
        }
    }

    assessments.sort_by_key(|assessment| assessment.recorded_at);

    Ok(BundleAssessment::from_assessments(assessments, skipped))
}

/// Assess a single `Observation`. Observations that are not vitals, or that were
/// entered in error, yield `Ok(None)`.
pub fn assess_observation(
    resource: &Value,
    context: Option<&PatientContext>,
    config: &VitalsConfig,
) -> Result<Option<ObservationAssessment>, VitalsError> {
    if resource_type(resource) != Some("Observation") {
        return Ok(None);
    }

    if matches!(
        resource.get("status").and_then(Value::as_str),
        Some("entered-in-error" | "cancelled")
    ) {
        return Ok(None);
    }

    let Some((vital, fasting)) = identify_vital(resource) else {
        return Ok(None);
    };

    let reading = extract_reading(resource, vital, fasting, config)?;
    let result = validate(RangeTable::reference(), &reading, context);

    Ok(Some(ObservationAssessment {
        id: resource_id(resource, "observation"),
        vital,
        recorded_at: extract_observation_timestamp(resource),
        reading,
        result,
    }))
}

fn identify_vital(resource: &Value) -> Option<(VitalType, Option<bool>)> {
    let code = resource.get("code")?;

    if let Some(codings) = code.get("coding").and_then(Value::as_array) {
        for coding in codings {
            let system = coding.get("system").and_then(Value::as_str);
            if system.is_some_and(|system| system != LOINC_SYSTEM) {
                continue;
            }
            let Some(code) = coding.get("code").and_then(Value::as_str) else {
                continue;
            };
            if let Some((_, vital, fasting)) =
                LOINC_VITALS.iter().find(|(loinc, _, _)| *loinc == code)
            {
                return Some((*vital, *fasting));
            }
        }
    }

    extract_codeable_text(code).and_then(|text| infer_vital(&text))
}

fn infer_vital(name: &str) -> Option<(VitalType, Option<bool>)> {
    let lower = name.to_lowercase();
    // "pulse oximetry" names an SpO2 reading, so saturation is matched before pulse.
    if lower.contains("spo2") || lower.contains("oxygen saturation") {
        Some((VitalType::OxygenSaturation, None))
    } else if lower.contains("heart rate") || lower.contains("pulse") {
        Some((VitalType::HeartRate, None))
    } else if lower.contains("respiratory rate") {
        Some((VitalType::RespiratoryRate, None))
    } else if lower.contains("blood pressure") {
        Some((VitalType::BloodPressure, None))
    } else if lower.contains("temperature") {
        Some((VitalType::Temperature, None))
    } else if lower.contains("glucose") {
        let fasting = lower.contains("fasting").then_some(true);
        Some((VitalType::BloodGlucose, fasting))
    } else if lower.contains("body weight") || lower == "weight" {
        Some((VitalType::Weight, None))
    } else {
        None
    }
}

fn extract_reading(
    resource: &Value,
    vital: VitalType,
    fasting: Option<bool>,
    config: &VitalsConfig,
) -> Result<VitalReading, VitalsError> {
    if vital == VitalType::BloodPressure {
        let components = resource
            .get("component")
            .and_then(Value::as_array)
            .ok_or(VitalsError::MissingData)?;
        let (systolic, diastolic) =
            blood_pressure_components(components).ok_or(VitalsError::MissingData)?;
        return Ok(VitalReading::BloodPressure {
            systolic,
            diastolic,
        });
    }

    let quantity = resource
        .get("valueQuantity")
        .ok_or(VitalsError::MissingData)?;
    let value = quantity
        .get("value")
        .and_then(Value::as_f64)
        .ok_or(VitalsError::MissingData)?;
    config.reading(vital, value, quantity_unit(quantity), fasting)
}

fn blood_pressure_components(components: &[Value]) -> Option<(f64, f64)> {
    let mut systolic: Option<f64> = None;
    let mut diastolic: Option<f64> = None;

    for component in components {
        let Some(code) = component.get("code") else {
            continue;
        };
        let value = component
            .get("valueQuantity")
            .and_then(|quantity| quantity.get("value"))
            .and_then(Value::as_f64);
        let label = extract_codeable_text(code)
            .unwrap_or_default()
            .to_lowercase();

        if systolic.is_none() && (has_coding(code, SYSTOLIC_CODE) || label.contains("systolic")) {
            systolic = value;
        } else if diastolic.is_none()
            && (has_coding(code, DIASTOLIC_CODE) || label.contains("diastolic"))
        {
            diastolic = value;
        }
    }

    Some((systolic?, diastolic?))
}

fn has_coding(code: &Value, wanted: &str) -> bool {
    code.get("coding")
        .and_then(Value::as_array)
        .is_some_and(|codings| {
            codings
                .iter()
                .any(|coding| coding.get("code").and_then(Value::as_str) == Some(wanted))
        })
}

/// UCUM `code` first, then the free-text `unit`.
fn quantity_unit(quantity: &Value) -> Option<&str> {
    ["code", "unit"]
        .iter()
        .filter_map(|field| quantity.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|unit| !unit.is_empty())
}

fn resource_type(resource: &Value) -> Option<&str> {
    resource.get("resourceType").and_then(Value::as_str)
}

fn resource_id(resource: &Value, fallback: &str) -> String {
    resource
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{fallback}-unknown"))
}

fn extract_codeable_text(value: &Value) -> Option<String> {
    if let Some(text) = value.get("text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            return Some(text.trim().to_string());
        }
    }

    let codings = value.get("coding").and_then(Value::as_array)?;
    codings
        .iter()
        .filter_map(|coding| coding.get("display").and_then(Value::as_str))
        .map(str::trim)
        .find(|display| !display.is_empty())
        .map(str::to_string)
}

fn extract_observation_timestamp(resource: &Value) -> Option<DateTime<Utc>> {
    for field in ["effectiveDateTime", "effectiveInstant", "effectivePeriod", "issued"] {
        let Some(value) = resource.get(field) else {
            continue;
        };

        if let Some(dt) = value.as_str().and_then(parse_datetime) {
            return Some(dt);
        }

        if let Some(obj) = value.as_object() {
            for bound in ["end", "start"] {
                if let Some(dt) = obj.get(bound).and_then(Value::as_str).and_then(parse_datetime) {
                    return Some(dt);
                }
            }
        }
    }
    None
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
