//! Phân nhóm tuổi dùng để chọn khoảng tham chiếu sinh lý.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::VitalsError;

/// Bảy nhóm tuổi theo thứ tự tăng dần.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Neonate,
    Infant,
    Toddler,
    Child,
    Adolescent,
    Adult,
    Elderly,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 7] = [
        AgeGroup::Neonate,
        AgeGroup::Infant,
        AgeGroup::Toddler,
        AgeGroup::Child,
        AgeGroup::Adolescent,
        AgeGroup::Adult,
        AgeGroup::Elderly,
    ];

    /// Sơ sinh tới vị thành niên.
    pub fn is_pediatric(self) -> bool {
        self < AgeGroup::Adult
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgeGroup::Neonate => "neonate",
            AgeGroup::Infant => "infant",
            AgeGroup::Toddler => "toddler",
            AgeGroup::Child => "child",
            AgeGroup::Adolescent => "adolescent",
            AgeGroup::Adult => "adult",
            AgeGroup::Elderly => "elderly",
        };
        f.write_str(name)
    }
}

impl FromStr for AgeGroup {
    type Err = VitalsError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|group| group.to_string().eq_ignore_ascii_case(input.trim()))
            .ok_or_else(|| VitalsError::Parse(format!("Nhóm tuổi không hợp lệ: {input}")))
    }
}

/// Xếp nhóm tuổi từ số năm và số tháng.
///
/// Không có tuổi thì mặc định là người lớn. Tổng số tháng = năm × 12 + tháng,
/// ngưỡng đầu tiên khớp sẽ thắng.
pub fn classify(age_years: Option<u32>, age_months: Option<u32>) -> AgeGroup {
    if age_years.is_none() && age_months.is_none() {
        return AgeGroup::Adult;
    }

    let total_months = age_years
        .unwrap_or(0)
        .saturating_mul(12)
        .saturating_add(age_months.unwrap_or(0));

    match total_months {
        m if m < 1 => AgeGroup::Neonate,
        m if m < 12 => AgeGroup::Infant,
        m if m < 3 * 12 => AgeGroup::Toddler,
        m if m < 12 * 12 => AgeGroup::Child,
        m if m < 18 * 12 => AgeGroup::Adolescent,
        m if m < 65 * 12 => AgeGroup::Adult,
        _ => AgeGroup::Elderly,
    }
}

/// Ngữ cảnh tuổi của bệnh nhân cho một lần kiểm tra. Engine không lưu lại.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatientContext {
    #[serde(default)]
    pub age_group: Option<AgeGroup>,
    #[serde(default)]
    pub age_years: Option<u32>,
    #[serde(default)]
    pub age_months: Option<u32>,
}

impl PatientContext {
    pub fn with_age_group(age_group: AgeGroup) -> Self {
        Self {
            age_group: Some(age_group),
            ..Self::default()
        }
    }

    pub fn with_age(age_years: u32, age_months: u32) -> Self {
        Self {
            age_group: None,
            age_years: Some(age_years),
            age_months: Some(age_months),
        }
    }

    /// Tuổi tính theo ngày sinh tại thời điểm `on`. Trả về `None` nếu ngày sinh
    /// nằm sau ngày đo.
    pub fn from_birth_date(birth_date: NaiveDate, on: NaiveDate) -> Option<Self> {
        if birth_date > on {
            return None;
        }

        let mut months = (on.year() - birth_date.year()) * 12 + on.month() as i32
            - birth_date.month() as i32;
        if on.day() < birth_date.day() {
            months -= 1;
        }

        let months = u32::try_from(months).ok()?;
        Some(Self::with_age(months / 12, months % 12))
    }

    /// Nhóm tuổi đã chỉ định thắng; nếu không thì tính từ năm/tháng.
    pub fn age_group(&self) -> AgeGroup {
        self.age_group
            .unwrap_or_else(|| classify(self.age_years, self.age_months))
    }
}

pub fn resolve_age_group(context: Option<&PatientContext>) -> AgeGroup {
    context.map_or(AgeGroup::Adult, PatientContext::age_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_age_defaults_to_adult() {
        assert_eq!(classify(None, None), AgeGroup::Adult);
        assert_eq!(resolve_age_group(None), AgeGroup::Adult);
        assert_eq!(
            resolve_age_group(Some(&PatientContext::default())),
            AgeGroup::Adult
        );
    }

    #[test]
    fn band_edges_follow_first_match() {
        assert_eq!(classify(Some(0), Some(0)), AgeGroup::Neonate);
        assert_eq!(classify(Some(0), Some(1)), AgeGroup::Infant);
        assert_eq!(classify(Some(0), Some(11)), AgeGroup::Infant);
        assert_eq!(classify(Some(1), Some(0)), AgeGroup::Toddler);
        assert_eq!(classify(Some(2), Some(11)), AgeGroup::Toddler);
        assert_eq!(classify(Some(3), None), AgeGroup::Child);
        assert_eq!(classify(Some(11), Some(11)), AgeGroup::Child);
        assert_eq!(classify(Some(12), None), AgeGroup::Adolescent);
        assert_eq!(classify(Some(17), Some(11)), AgeGroup::Adolescent);
        assert_eq!(classify(Some(18), None), AgeGroup::Adult);
        assert_eq!(classify(Some(64), Some(11)), AgeGroup::Adult);
        assert_eq!(classify(Some(65), None), AgeGroup::Elderly);
    }

    #[test]
    fn months_alone_are_enough() {
        assert_eq!(classify(None, Some(0)), AgeGroup::Neonate);
        assert_eq!(classify(None, Some(30)), AgeGroup::Toddler);
        assert_eq!(classify(None, Some(u32::MAX)), AgeGroup::Elderly);
    }

    #[test]
    fn explicit_group_wins_over_years() {
        let context = PatientContext {
            age_group: Some(AgeGroup::Infant),
            age_years: Some(40),
            age_months: None,
        };
        assert_eq!(context.age_group(), AgeGroup::Infant);
    }

    #[test]
    fn birth_date_counts_completed_months() {
        let birth = NaiveDate::from_ymd_opt(2020, 3, 15).unwrap();
        let on = NaiveDate::from_ymd_opt(2023, 3, 14).unwrap();
        let context = PatientContext::from_birth_date(birth, on).unwrap();
        assert_eq!(context.age_years, Some(2));
        assert_eq!(context.age_months, Some(11));
        assert_eq!(context.age_group(), AgeGroup::Toddler);

        let on_birthday = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        let context = PatientContext::from_birth_date(birth, on_birthday).unwrap();
        assert_eq!(context.age_group(), AgeGroup::Child);
    }

    #[test]
    fn birth_date_after_measurement_is_ignored() {
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let on = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert!(PatientContext::from_birth_date(birth, on).is_none());
    }

    #[test]
    fn context_deserializes_from_camel_case() {
        let context: PatientContext =
            serde_json::from_str(r#"{"ageYears": 5, "ageMonths": 2}"#).unwrap();
        assert_eq!(context.age_group(), AgeGroup::Child);

        let context: PatientContext = serde_json::from_str(r#"{"ageGroup": "elderly"}"#).unwrap();
        assert_eq!(context.age_group(), AgeGroup::Elderly);
    }

    #[test]
    fn pediatric_stops_at_adolescent() {
        assert!(AgeGroup::Adolescent.is_pediatric());
        assert!(AgeGroup::Neonate.is_pediatric());
        assert!(!AgeGroup::Adult.is_pediatric());
        assert!(!AgeGroup::Elderly.is_pediatric());
    }
}
