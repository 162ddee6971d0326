use crate::ValidationResult;

use super::format_value;

/// Trung bình và độ lệch chuẩn tham chiếu cố định (mg/dL).
const REFERENCE_MEAN: f64 = 95.0;
const REFERENCE_SD: f64 = 25.0;
const NORMAL_LOW: f64 = 70.0;
const NORMAL_HIGH: f64 = 120.0;
const EMERGENCY_LOW_BELOW: f64 = 50.0;
const EMERGENCY_HIGH_ABOVE: f64 = 350.0;
const NOTIFY_BELOW: f64 = 60.0;
const NOTIFY_ABOVE: f64 = 180.0;

/// Đường huyết (mg/dL). Cờ nhịn ăn chỉ đổi cách diễn đạt, không đổi ngưỡng.
pub fn validate_blood_glucose(mg_dl: f64, fasting: Option<bool>) -> ValidationResult {
    if !mg_dl.is_finite() || mg_dl <= 0.0 {
        return ValidationResult::rejected("Please enter a valid blood glucose value in mg/dL.");
    }

    let shown = match fasting {
        Some(true) => format!("Fasting blood glucose of {} mg/dL", format_value(mg_dl)),
        Some(false) => format!("Random blood glucose of {} mg/dL", format_value(mg_dl)),
        None => format!("Blood glucose of {} mg/dL", format_value(mg_dl)),
    };

    if mg_dl < EMERGENCY_LOW_BELOW {
        return ValidationResult::emergency(format!("{shown} is dangerously low."));
    }
    if mg_dl > EMERGENCY_HIGH_ABOVE {
        return ValidationResult::emergency(format!("{shown} is dangerously high."));
    }

    let lower = REFERENCE_MEAN - 2.0 * REFERENCE_SD;
    let upper = REFERENCE_MEAN + 2.0 * REFERENCE_SD;
    if mg_dl < lower || mg_dl > upper {
        let direction = if mg_dl < lower { "low" } else { "high" };
        return ValidationResult::critical(format!("{shown} is critically {direction}."));
    }

    if mg_dl < NORMAL_LOW {
        let notify = mg_dl < NOTIFY_BELOW;
        let action = if notify {
            "Take 15 g of fast-acting sugar and recheck in 15 minutes. Your care team has been notified."
        } else {
            "Have a snack and recheck in 15 minutes."
        };
        return ValidationResult::warning(format!("{shown} is low."), action, notify);
    }
    if mg_dl > NORMAL_HIGH {
        return ValidationResult::warning(
            format!("{shown} is above the target range."),
            "Drink water and recheck before your next meal.",
            mg_dl > NOTIFY_ABOVE,
        );
    }

    ValidationResult::normal(format!("{shown} is in the target range."))
}
