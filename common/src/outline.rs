//! チェックリスト構成（アウトライン）モジュール
//!
//! セクションと項目の固定カタログ。起動時に一度だけ構築し、
//! 以降は不変のまま State Store とレポート生成に明示的に渡す。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 総合評価メモの予約キー（セクションキーとしては使用不可）
pub const OVERALL_NOTE_KEY: &str = "overallAssessment";

/// セクション定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// 一意なセクションキー
    pub key: String,
    /// 表示タイトル
    pub title: String,
    /// 項目ラベル（セクション内で一意・順序あり）
    pub items: Vec<String>,
}

impl Section {
    pub fn new(key: impl Into<String>, title: impl Into<String>, items: &[&str]) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }
}

/// 順序付きセクション列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Outline {
    sections: Vec<Section>,
}

impl Outline {
    /// セクション列から構築（キー重複などを検証）
    pub fn new(sections: Vec<Section>) -> Result<Self> {
        let mut keys = HashSet::new();
        for section in &sections {
            if section.key.trim().is_empty() {
                return Err(Error::InvalidOutline(format!(
                    "セクションキーが空です: {}",
                    section.title
                )));
            }
            if section.key == OVERALL_NOTE_KEY {
                return Err(Error::InvalidOutline(format!(
                    "予約キーはセクションに使用できません: {}",
                    OVERALL_NOTE_KEY
                )));
            }
            if !keys.insert(section.key.as_str()) {
                return Err(Error::InvalidOutline(format!(
                    "セクションキーが重複しています: {}",
                    section.key
                )));
            }
            let mut items = HashSet::new();
            for item in &section.items {
                if !items.insert(item.as_str()) {
                    return Err(Error::InvalidOutline(format!(
                        "項目が重複しています: {} / {}",
                        section.key, item
                    )));
                }
            }
        }
        Ok(Self { sections })
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let sections: Vec<Section> = serde_json::from_str(json)?;
        Self::new(sections)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// (セクション, 項目) がアウトラインに含まれるか
    pub fn contains(&self, section_key: &str, item: &str) -> bool {
        self.section(section_key).is_some_and(|s| s.contains(item))
    }

    /// 全項目数
    pub fn total_tasks(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// 訪問診療同行評価の組み込みアウトライン
    pub fn home_visit() -> Self {
        let sections = HOME_VISIT
            .iter()
            .map(|(key, title, items)| Section::new(*key, *title, items))
            .collect();
        Self { sections }
    }
}

impl Default for Outline {
    fn default() -> Self {
        Self::home_visit()
    }
}

type SectionDef = (&'static str, &'static str, &'static [&'static str]);

const HOME_VISIT: &[SectionDef] = &[
    (
        "documentationReview",
        "Pre-Visit Documentation Review",
        &[
            "Chart Review",
            "Past Medical History reviewed",
            "Past Surgical History reviewed",
            "Allergies documented",
            "Family History documented",
            "Social History documented",
            "Medications reviewed",
            "Prior Hospitalizations documented",
            "Insurance eligibility verified in Zephyr",
            "Medical records from PCP, hospital, specialists in eCW",
            "Trucare checked for Care Management notes",
        ],
    ),
    (
        "visitPreparation",
        "Visit Preparation (48-Hour Pre-Visit Tasks)",
        &[
            "Patient contact attempted (3 tries if needed)",
            "Address confirmed",
            "Gate codes obtained",
            "Pet containment arranged",
            "Route mapping verified by MA",
            "Pharmacy information verified",
            "Medical supplies checked in red kit and trunk kit",
        ],
    ),
    (
        "documentation",
        "Required Documentation and Consents",
        &[
            "Consent to treat",
            "Release of health information consent",
            "Assignment of benefits",
            "Photography consent",
            "Telemedicine consent",
            "Home safety contract",
            "Controlled substance contract (if applicable)",
            "MPOA/OOH-DNR (if applicable)",
            "Patient Portal Authorization",
            "Prescription History Authorization",
            "Medical Group Health Information Authorization",
            "HIE Authorization",
            "Digital Communications Consent",
            "Financial Policy Notice",
            "Privacy Practices Notice",
        ],
    ),
    (
        "screenings",
        "Required Screenings and Assessments",
        &[
            "Edmonton Symptom Assessment (ESAS)",
            "ADLs/IADLs",
            "PHQ-2/PHQ-9 as needed",
            "Fall Risk Assessment",
            "Bladder screening",
            "Smoking screening",
            "KATZ/PPS metrics",
            "Vital signs documented in eCW",
            "Home safety assessment",
            "Medicine cabinet assessment",
            "Refrigerator Inventory",
        ],
    ),
    (
        "communicationSkills",
        "Communication Skills",
        &[
            "Appropriate interaction with patient/family",
            "Visit well-organized with clear agenda",
            "Uses understandable non-medical language",
            "Allows appropriate patient/family speaking time",
            "Addresses cultural/literacy barriers",
            "Comfortable completing required assessments",
            "Serious Illness Conversation completed appropriately",
            "Goals of Care reviewed for terminal patients",
            "Program contact information provided",
            "PCP contacted upon admission",
            "Appropriate use of Secure Messaging",
        ],
    ),
    (
        "technicalSkills",
        "Technical Skills",
        &[
            "Proper EMR usage in real-time",
            "Equipment functioning properly (computer, Grandpad, SIM card)",
            "Proper PPE and infection control",
            "Proper technique for lab draws/injections",
            "Documentation accuracy",
            "Medication refills handled appropriately",
            "Referrals submitted correctly",
            "Zephyr usage and attestations complete",
        ],
    ),
    (
        "knowledgeAssessment",
        "Knowledge Assessment",
        &[
            "Understands different programs",
            "Knows safe discharge procedures",
            "Demonstrates chronic disease management knowledge",
            "Understands palliation of conditions",
            "Appropriate delegation to RN/LVN/MA",
        ],
    ),
    (
        "postVisitTasks",
        "Post-Visit Tasks",
        &[
            "Lab specimens properly handled and delivered",
            "Action items completed",
            "Documents uploaded to EMR",
            "Program outcome communicated to PSR",
            "Notes locked within 72 business hours",
            "Care Plan Form completed",
            "Follow-up appointment scheduled (if Longitudinal)",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_visit_outline_shape() {
        let outline = Outline::home_visit();
        assert_eq!(outline.sections().len(), 8);
        assert_eq!(outline.total_tasks(), 75);
        assert_eq!(outline.sections()[0].key, "documentationReview");
        assert_eq!(outline.sections()[7].key, "postVisitTasks");
    }

    #[test]
    fn test_home_visit_outline_is_valid() {
        let outline = Outline::home_visit();
        let rebuilt = Outline::new(outline.sections().to_vec());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_contains() {
        let outline = Outline::home_visit();
        assert!(outline.contains("screenings", "Fall Risk Assessment"));
        assert!(!outline.contains("screenings", "Chart Review"));
        assert!(!outline.contains("unknown", "Chart Review"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"key": "a", "title": "Section A", "items": ["one", "two"]},
            {"key": "b", "title": "Section B", "items": []}
        ]"#;
        let outline = Outline::from_json(json).expect("パース失敗");
        assert_eq!(outline.sections().len(), 2);
        assert_eq!(outline.total_tasks(), 2);
        assert_eq!(outline.section("a").map(|s| s.title.as_str()), Some("Section A"));
    }

    #[test]
    fn test_duplicate_section_key_rejected() {
        let result = Outline::new(vec![
            Section::new("a", "A", &["x"]),
            Section::new("a", "A again", &["y"]),
        ]);
        assert!(matches!(result, Err(Error::InvalidOutline(_))));
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let result = Outline::new(vec![Section::new("a", "A", &["x", "x"])]);
        assert!(matches!(result, Err(Error::InvalidOutline(_))));
    }

    #[test]
    fn test_reserved_key_rejected() {
        let result = Outline::new(vec![Section::new(OVERALL_NOTE_KEY, "Overall", &[])]);
        assert!(matches!(result, Err(Error::InvalidOutline(_))));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = Outline::new(vec![Section::new("  ", "Blank", &["x"])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_outline_allowed() {
        let outline = Outline::new(Vec::new()).expect("空のアウトラインは許可");
        assert!(outline.is_empty());
        assert_eq!(outline.total_tasks(), 0);
    }
}
