//! Bridge WASM <-> JavaScript cho cổng thông tin bệnh nhân.

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use vitals_core::{
    validate, validate_text, GlucoseUnit, PatientContext, RangeTable, TemperatureUnit,
    ValidationResult, VitalReading, VitalType, VitalsConfig, VitalsError, WeightUnit,
};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsVitalsConfig {
    #[serde(default)]
    default_temperature_unit: Option<TemperatureUnit>,
    #[serde(default)]
    default_weight_unit: Option<WeightUnit>,
    #[serde(default)]
    default_glucose_unit: Option<GlucoseUnit>,
}

impl From<JsVitalsConfig> for VitalsConfig {
    fn from(cfg: JsVitalsConfig) -> Self {
        let mut base = VitalsConfig::default();
        if let Some(unit) = cfg.default_temperature_unit {
            base.default_temperature_unit = unit;
        }
        if let Some(unit) = cfg.default_weight_unit {
            base.default_weight_unit = unit;
        }
        if let Some(unit) = cfg.default_glucose_unit {
            base.default_glucose_unit = unit;
        }
        base
    }
}

/// Giá trị đo từ form: số, chuỗi người dùng gõ, hoặc cặp huyết áp.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsReading {
    Number(f64),
    Text(String),
    Pair {
        systolic: f64,
        diastolic: f64,
    },
    Glucose {
        value: f64,
        #[serde(default)]
        fasting: Option<bool>,
    },
}

/// Kiểm tra một chỉ số. `reading` là số, chuỗi (`"120/80"` với huyết áp) hoặc
/// `{systolic, diastolic}`; `context` là `{ageGroup}` hoặc `{ageYears, ageMonths}`.
#[wasm_bindgen]
pub fn validate_vital(
    vital: &str,
    reading: JsValue,
    context: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let vital = vital
        .parse::<VitalType>()
        .map_err(|err| JsValue::from_str(&format_vitals_error(err)))?;

    let context = match context {
        Some(js_ctx) if !js_ctx.is_null() && !js_ctx.is_undefined() => Some(
            from_value::<PatientContext>(js_ctx)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được context: {err}")))?,
        ),
        _ => None,
    };

    let reading = from_value::<JsReading>(reading)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được giá trị đo: {err}")))?;

    let result = classify_js_reading(vital, reading, context.as_ref());

    to_value(&result).map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Đánh giá toàn bộ bundle FHIR.
#[wasm_bindgen]
pub fn assess_bundle(input_bundle: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let bundle_value = from_value::<serde_json::Value>(input_bundle)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON bundle: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsVitalsConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            VitalsConfig::from(cfg)
        }
        None => VitalsConfig::default(),
    };

    let assessment = vitals_fhir::assess_bundle_value(&bundle_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_vitals_error(err)))?;

    to_value(&assessment)
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

fn classify_js_reading(
    vital: VitalType,
    reading: JsReading,
    context: Option<&PatientContext>,
) -> ValidationResult {
    let table = RangeTable::reference();
    match (vital, reading) {
        (_, JsReading::Text(raw)) => validate_text(table, vital, &raw, context),
        (
            VitalType::BloodPressure,
            JsReading::Pair {
                systolic,
                diastolic,
            },
        ) => validate(
            table,
            &VitalReading::BloodPressure {
                systolic,
                diastolic,
            },
            context,
        ),
        (VitalType::BloodGlucose, JsReading::Glucose { value, fasting }) => validate(
            table,
            &VitalReading::BloodGlucose { value, fasting },
            context,
        ),
        (_, JsReading::Number(value)) | (_, JsReading::Glucose { value, .. }) => {
            match VitalReading::single(vital, value) {
                Some(reading) => validate(table, &reading, context),
                None => ValidationResult::rejected(
                    "Please enter both blood pressure numbers, for example 120/80.",
                ),
            }
        }
        (_, JsReading::Pair { .. }) => ValidationResult::rejected(format!(
            "{} takes a single number.",
            vital.label()
        )),
    }
}

fn format_vitals_error(err: VitalsError) -> String {
    format!("Vitals error: {err}")
}
