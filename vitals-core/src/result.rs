//! Kết quả trả về cho lớp lưu trữ và lớp thông báo.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mức cảnh báo, sắp theo độ nghiêm trọng tăng dần.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
    Emergency,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
            AlertLevel::Emergency => "emergency",
        };
        f.write_str(name)
    }
}

pub(crate) const EMERGENCY_ACTION: &str =
    "Seek emergency care immediately: call 911 or go to the nearest emergency department.";
pub(crate) const CRITICAL_ACTION: &str =
    "Contact your care team today. Your provider has been notified of this reading.";

/// Kết quả của một lần kiểm tra.
///
/// `can_save == false` chỉ khi đầu vào sai cấu trúc. Mọi giá trị đọc được, dù
/// cực đoan đến đâu, đều phải được lưu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub can_save: bool,
    pub alert_level: AlertLevel,
    pub message: String,
    pub action: String,
    pub notify_provider: bool,
}

impl ValidationResult {
    /// Đầu vào sai định dạng: không lưu, mức `warning` chỉ là gợi ý cho UI.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            can_save: false,
            alert_level: AlertLevel::Warning,
            message: message.into(),
            action: "Please check the value and enter it again.".to_string(),
            notify_provider: false,
        }
    }

    pub fn emergency(message: impl Into<String>) -> Self {
        Self::saved(AlertLevel::Emergency, message, EMERGENCY_ACTION, true)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::saved(AlertLevel::Critical, message, CRITICAL_ACTION, true)
    }

    pub fn warning(
        message: impl Into<String>,
        action: impl Into<String>,
        notify_provider: bool,
    ) -> Self {
        Self::saved(AlertLevel::Warning, message, action, notify_provider)
    }

    pub fn normal(message: impl Into<String>) -> Self {
        Self::saved(AlertLevel::Normal, message, "", false)
    }

    fn saved(
        alert_level: AlertLevel,
        message: impl Into<String>,
        action: impl Into<String>,
        notify_provider: bool,
    ) -> Self {
        Self {
            is_valid: true,
            can_save: true,
            alert_level,
            message: message.into(),
            action: action.into(),
            notify_provider,
        }
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_levels_are_ordered_by_severity() {
        assert!(AlertLevel::Normal < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Critical);
        assert!(AlertLevel::Critical < AlertLevel::Emergency);
    }

    #[test]
    fn rejected_result_blocks_save() {
        let result = ValidationResult::rejected("Please enter a valid number");
        assert!(!result.is_valid);
        assert!(!result.can_save);
        assert!(!result.notify_provider);
        assert_eq!(result.alert_level, AlertLevel::Warning);
        assert!(result.is_rejected());
    }

    #[test]
    fn emergency_result_is_saved_and_pages() {
        let result = ValidationResult::emergency("Heart rate 35 bpm is dangerously low");
        assert!(result.can_save);
        assert!(result.notify_provider);
        assert!(result.action.contains("emergency"));
    }

    #[test]
    fn serializes_with_portal_field_names() {
        let value = serde_json::to_value(ValidationResult::normal("ok")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "isValid": true,
                "canSave": true,
                "alertLevel": "normal",
                "message": "ok",
                "action": "",
                "notifyProvider": false
            })
        );
    }
}
