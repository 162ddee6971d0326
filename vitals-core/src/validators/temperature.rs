//! Nhiệt độ (°F). Ngưỡng không theo tuổi, trừ dải 99.5–100.4 coi là bình thường với trẻ em.

use crate::{resolve_age_group, PatientContext, ValidationResult};

use super::format_value;

const MIN_RECORDABLE: f64 = 85.0;
const MAX_RECORDABLE: f64 = 110.0;
const EMERGENCY_HIGH_ABOVE: f64 = 103.5;
const EMERGENCY_LOW_BELOW: f64 = 93.0;
const NORMAL_LOW: f64 = 97.8;
const NORMAL_HIGH: f64 = 99.5;
const FEVER_FROM: f64 = 100.4;
const FEVER_NOTIFY_FROM: f64 = 102.0;
const LOW_NOTIFY_BELOW: f64 = 96.0;

pub fn validate_temperature(fahrenheit: f64, context: Option<&PatientContext>) -> ValidationResult {
    if !fahrenheit.is_finite() || !(MIN_RECORDABLE..=MAX_RECORDABLE).contains(&fahrenheit) {
        return ValidationResult::rejected(
            "Please enter a valid temperature between 85 and 110 °F.",
        );
    }

    let shown = format!("{} °F", format_value(fahrenheit));

    if fahrenheit > EMERGENCY_HIGH_ABOVE {
        return ValidationResult::emergency(format!(
            "Temperature of {shown} is a dangerously high fever."
        ));
    }
    if fahrenheit < EMERGENCY_LOW_BELOW {
        return ValidationResult::emergency(format!(
            "Temperature of {shown} is dangerously low."
        ));
    }

    if (NORMAL_LOW..=NORMAL_HIGH).contains(&fahrenheit) {
        return ValidationResult::normal(format!("Temperature of {shown} is normal."));
    }

    if fahrenheit > NORMAL_HIGH && fahrenheit < FEVER_FROM {
        if resolve_age_group(context).is_pediatric() {
            return ValidationResult::normal(format!(
                "Temperature of {shown} is within the normal range for a child."
            ));
        }
        return ValidationResult::warning(
            format!("Temperature of {shown} is slightly elevated."),
            "Rest, drink fluids and measure again in an hour.",
            false,
        );
    }

    if fahrenheit >= FEVER_FROM {
        let notify = fahrenheit >= FEVER_NOTIFY_FROM;
        let action = if notify {
            "Take a fever reducer if one has been prescribed. Your care team has been notified."
        } else {
            "Rest, drink fluids and measure again in a few hours."
        };
        return ValidationResult::warning(
            format!("Temperature of {shown} indicates a fever."),
            action,
            notify,
        );
    }

    let notify = fahrenheit < LOW_NOTIFY_BELOW;
    let action = if notify {
        "Warm up with blankets and measure again. Your care team has been notified."
    } else {
        "Warm up and measure again in 15 minutes."
    };
    ValidationResult::warning(
        format!("Temperature of {shown} is below normal."),
        action,
        notify,
    )
}
