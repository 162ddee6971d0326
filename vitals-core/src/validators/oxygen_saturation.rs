use crate::ValidationResult;

use super::format_value;

const EMERGENCY_BELOW: f64 = 90.0;
const NORMAL_FROM: f64 = 95.0;

/// SpO2 (%). Không phụ thuộc tuổi; chỉ có ba bậc.
pub fn validate_oxygen_saturation(percent: f64) -> ValidationResult {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return ValidationResult::rejected(
            "Please enter a valid oxygen saturation between 0 and 100%.",
        );
    }

    let shown = format!("{}%", format_value(percent));

    if percent < EMERGENCY_BELOW {
        return ValidationResult::emergency(format!(
            "Oxygen saturation of {shown} is dangerously low."
        ));
    }

    if percent < NORMAL_FROM {
        return ValidationResult::warning(
            format!("Oxygen saturation of {shown} is below normal."),
            "Sit upright, breathe slowly and measure again. Your care team has been notified.",
            true,
        );
    }

    ValidationResult::normal(format!("Oxygen saturation of {shown} is normal."))
}
