//! Bảng khoảng tham chiếu theo nhóm tuổi.
//!
//! Chỉ nhịp tim, nhịp thở, huyết áp tâm thu và tâm trương có bảng này. Các số liệu
//! là dữ liệu tham chiếu lâm sàng, không suy ra từ công thức.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{AgeGroup, VitalType};

/// Khoảng tham chiếu cho một cặp (chỉ số, nhóm tuổi).
///
/// `min < mean < max`. Dải ±2SD và dải [min, max] được soạn độc lập nên có thể
/// trùng nhau ở biên.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VitalRangeEntry {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub standard_deviation: f64,
}

impl VitalRangeEntry {
    const fn new(min: f64, max: f64, mean: f64, standard_deviation: f64) -> Self {
        Self {
            min,
            max,
            mean,
            standard_deviation,
        }
    }

    /// mean − 2·SD
    pub fn lower_two_sd(&self) -> f64 {
        self.mean - 2.0 * self.standard_deviation
    }

    /// mean + 2·SD
    pub fn upper_two_sd(&self) -> f64 {
        self.mean + 2.0 * self.standard_deviation
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn within_two_sd(&self, value: f64) -> bool {
        value >= self.lower_two_sd() && value <= self.upper_two_sd()
    }
}

use AgeGroup::*;

const HEART_RATE: [(AgeGroup, VitalRangeEntry); 7] = [
    (Neonate, VitalRangeEntry::new(100.0, 160.0, 130.0, 15.0)),
    (Infant, VitalRangeEntry::new(90.0, 150.0, 120.0, 15.0)),
    (Toddler, VitalRangeEntry::new(80.0, 130.0, 105.0, 12.5)),
    (Child, VitalRangeEntry::new(70.0, 110.0, 90.0, 10.0)),
    (Adolescent, VitalRangeEntry::new(60.0, 100.0, 80.0, 10.0)),
    (Adult, VitalRangeEntry::new(60.0, 100.0, 80.0, 10.0)),
    (Elderly, VitalRangeEntry::new(60.0, 100.0, 80.0, 10.0)),
];

const RESPIRATORY_RATE: [(AgeGroup, VitalRangeEntry); 7] = [
    (Neonate, VitalRangeEntry::new(30.0, 60.0, 45.0, 8.0)),
    (Infant, VitalRangeEntry::new(25.0, 50.0, 37.0, 7.0)),
    (Toddler, VitalRangeEntry::new(20.0, 40.0, 30.0, 5.0)),
    (Child, VitalRangeEntry::new(18.0, 30.0, 24.0, 3.0)),
    (Adolescent, VitalRangeEntry::new(12.0, 20.0, 16.0, 2.5)),
    (Adult, VitalRangeEntry::new(12.0, 20.0, 16.0, 3.0)),
    (Elderly, VitalRangeEntry::new(12.0, 22.0, 17.0, 3.0)),
];

const SYSTOLIC: [(AgeGroup, VitalRangeEntry); 7] = [
    (Neonate, VitalRangeEntry::new(60.0, 90.0, 75.0, 8.0)),
    (Infant, VitalRangeEntry::new(70.0, 100.0, 85.0, 8.0)),
    (Toddler, VitalRangeEntry::new(80.0, 110.0, 95.0, 8.0)),
    (Child, VitalRangeEntry::new(90.0, 115.0, 102.0, 7.0)),
    (Adolescent, VitalRangeEntry::new(90.0, 120.0, 106.0, 10.0)),
    (Adult, VitalRangeEntry::new(90.0, 120.0, 110.0, 12.0)),
    (Elderly, VitalRangeEntry::new(90.0, 130.0, 115.0, 15.0)),
];

const DIASTOLIC: [(AgeGroup, VitalRangeEntry); 7] = [
    (Neonate, VitalRangeEntry::new(30.0, 60.0, 45.0, 8.0)),
    (Infant, VitalRangeEntry::new(35.0, 65.0, 50.0, 8.0)),
    (Toddler, VitalRangeEntry::new(40.0, 70.0, 55.0, 8.0)),
    (Child, VitalRangeEntry::new(50.0, 75.0, 62.0, 7.0)),
    (Adolescent, VitalRangeEntry::new(60.0, 80.0, 70.0, 7.0)),
    (Adult, VitalRangeEntry::new(60.0, 80.0, 70.0, 8.0)),
    (Elderly, VitalRangeEntry::new(60.0, 85.0, 72.0, 9.0)),
];

/// Bảng bất biến `(VitalType, AgeGroup) -> VitalRangeEntry`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    entries: HashMap<(VitalType, AgeGroup), VitalRangeEntry>,
}

static REFERENCE: Lazy<RangeTable> = Lazy::new(RangeTable::build_reference);

impl RangeTable {
    /// Bảng tham chiếu chuẩn, dựng một lần khi dùng lần đầu.
    pub fn reference() -> &'static RangeTable {
        &REFERENCE
    }

    fn build_reference() -> Self {
        let mut entries = HashMap::with_capacity(4 * AgeGroup::ALL.len());
        let sources = [
            (VitalType::HeartRate, &HEART_RATE),
            (VitalType::RespiratoryRate, &RESPIRATORY_RATE),
            (VitalType::SystolicBloodPressure, &SYSTOLIC),
            (VitalType::DiastolicBloodPressure, &DIASTOLIC),
        ];
        for (vital, rows) in sources {
            for (group, entry) in rows.iter() {
                entries.insert((vital, *group), *entry);
            }
        }
        Self { entries }
    }

    /// Bảng tùy chỉnh, ví dụ khi sản phẩm thay đổi khoảng tham chiếu.
    pub fn from_entries(
        entries: impl IntoIterator<Item = ((VitalType, AgeGroup), VitalRangeEntry)>,
    ) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, vital: VitalType, group: AgeGroup) -> Option<&VitalRangeEntry> {
        self.entries.get(&(vital, group))
    }

    /// Như [`RangeTable::get`] nhưng khi bảng tùy chỉnh thiếu dòng thì rơi về dòng
    /// người lớn của chính bảng, rồi tới bảng tham chiếu. `None` khi chỉ số không có
    /// bảng theo tuổi.
    pub fn entry_or_adult(&self, vital: VitalType, group: AgeGroup) -> Option<VitalRangeEntry> {
        if let Some(entry) = self.get(vital, group) {
            return Some(*entry);
        }
        let fallback = self
            .get(vital, AgeGroup::Adult)
            .or_else(|| REFERENCE.get(vital, group))
            .copied();
        if fallback.is_some() {
            log::warn!("missing range entry for {vital}/{group}, using fallback row");
        }
        fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
