use crate::ValidationResult;

use super::format_value;

const MIN_RECORDABLE_LB: f64 = 20.0;
const MAX_RECORDABLE_LB: f64 = 800.0;

/// Cân nặng (lb): chỉ kiểm tra biên, không có bậc cảnh báo.
pub fn validate_weight(pounds: f64) -> ValidationResult {
    if !pounds.is_finite() || !(MIN_RECORDABLE_LB..=MAX_RECORDABLE_LB).contains(&pounds) {
        return ValidationResult::rejected("Please enter a valid weight between 20 and 800 lbs.");
    }

    ValidationResult::normal(format!("Weight of {} lbs recorded.", format_value(pounds)))
}
