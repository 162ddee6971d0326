use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use vitals_core::{
    ensure_unit, validate, validate_text, AgeGroup, PatientContext, RangeTable, ValidationResult,
    VitalReading, VitalType, VitalsConfig,
};
use vitals_fhir::assess_bundle_str;

#[derive(Parser, Debug)]
#[command(
    name = "vitals-cli",
    about = "Phân loại chỉ số sống và mức cảnh báo."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Kiểm tra một giá trị đo.
    Check {
        /// heart_rate, respiratory_rate, blood_pressure, spo2, temperature, glucose, weight
        vital: String,
        /// Giá trị đo; huyết áp có thể viết `120/80`.
        value: String,
        /// Tâm trương khi `value` chỉ là tâm thu.
        #[arg(long)]
        diastolic: Option<f64>,
        #[arg(long)]
        age_years: Option<u32>,
        #[arg(long)]
        age_months: Option<u32>,
        /// neonate, infant, toddler, child, adolescent, adult, elderly
        #[arg(long)]
        age_group: Option<String>,
        /// Đường huyết lúc đói.
        #[arg(long)]
        fasting: bool,
        /// Đơn vị của giá trị (Cel, kg, mmol/L...).
        #[arg(long)]
        unit: Option<String>,
    },
    /// Đánh giá các chỉ số trong một bundle FHIR JSON.
    Bundle {
        /// Đường dẫn tới file JSON bundle.
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = VitalsConfig::default();

    match args.command {
        Command::Check {
            vital,
            value,
            diastolic,
            age_years,
            age_months,
            age_group,
            fasting,
            unit,
        } => {
            let vital: VitalType = vital.parse()?;
            let context = match age_group {
                Some(group) => Some(PatientContext::with_age_group(group.parse::<AgeGroup>()?)),
                None if age_years.is_some() || age_months.is_some() => Some(PatientContext {
                    age_group: None,
                    age_years,
                    age_months,
                }),
                None => None,
            };

            log::debug!("checking {vital} value {value}");
            let result = check(
                &config,
                vital,
                &value,
                diastolic,
                fasting,
                unit.as_deref(),
                context.as_ref(),
            )?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Bundle { input } => {
            let data = std::fs::read_to_string(&input)
                .with_context(|| format!("Không đọc được file {:?}", input))?;

            let assessment = assess_bundle_str(&data, &config)?;

            println!(
                "Generated at: {}\nVitals assessed: {}\nSkipped: {}\nHighest alert: {}\nNotify provider: {}",
                assessment.generated_at,
                assessment.assessments.len(),
                assessment.skipped,
                assessment
                    .highest_alert
                    .map_or_else(|| "none".to_string(), |level| level.to_string()),
                assessment.notify_provider
            );
            for item in &assessment.assessments {
                println!(
                    "  [{}] {} {}: {}",
                    item.result.alert_level,
                    item.id,
                    item.reading.display_value(),
                    item.result.message
                );
            }
        }
    }

    Ok(())
}

fn check(
    config: &VitalsConfig,
    vital: VitalType,
    value: &str,
    diastolic: Option<f64>,
    fasting: bool,
    unit: Option<&str>,
    context: Option<&PatientContext>,
) -> anyhow::Result<ValidationResult> {
    let table = RangeTable::reference();

    if vital == VitalType::BloodPressure {
        if let Some(unit) = unit {
            ensure_unit(vital, unit)?;
        }
        return Ok(match diastolic {
            Some(diastolic) => match vitals_core::parse_measurement(value) {
                Some(systolic) => validate(
                    table,
                    &VitalReading::BloodPressure {
                        systolic,
                        diastolic,
                    },
                    context,
                ),
                None => validate_text(table, vital, value, context),
            },
            None => validate_text(table, vital, value, context),
        });
    }

    let Some(raw) = vitals_core::parse_measurement(value) else {
        return Ok(validate_text(table, vital, value, context));
    };

    let reading = config.reading(vital, raw, unit, fasting.then_some(true))?;
    Ok(validate(table, &reading, context))
}
