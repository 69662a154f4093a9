use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::utils::error::PricingError;

/// 唱片與封套共用的八級品相，排序即好壞 (P 最差、M 最好)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GradeCode {
    #[serde(rename = "P")]
    Poor,
    #[serde(rename = "F")]
    Fair,
    #[serde(rename = "G")]
    Good,
    #[serde(rename = "G+")]
    GoodPlus,
    #[serde(rename = "VG")]
    VeryGood,
    #[serde(rename = "VG+")]
    VeryGoodPlus,
    #[serde(rename = "NM")]
    NearMint,
    #[serde(rename = "M")]
    Mint,
}

impl GradeCode {
    pub const ALL: [GradeCode; 8] = [
        GradeCode::Poor,
        GradeCode::Fair,
        GradeCode::Good,
        GradeCode::GoodPlus,
        GradeCode::VeryGood,
        GradeCode::VeryGoodPlus,
        GradeCode::NearMint,
        GradeCode::Mint,
    ];

    pub fn code(self) -> &'static str {
        match self {
            GradeCode::Poor => "P",
            GradeCode::Fair => "F",
            GradeCode::Good => "G",
            GradeCode::GoodPlus => "G+",
            GradeCode::VeryGood => "VG",
            GradeCode::VeryGoodPlus => "VG+",
            GradeCode::NearMint => "NM",
            GradeCode::Mint => "M",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            GradeCode::Poor => "Poor",
            GradeCode::Fair => "Fair",
            GradeCode::Good => "Good",
            GradeCode::GoodPlus => "Good Plus",
            GradeCode::VeryGood => "Very Good",
            GradeCode::VeryGoodPlus => "Very Good Plus",
            GradeCode::NearMint => "Near Mint",
            GradeCode::Mint => "Mint",
        }
    }

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn is_better_than(self, other: GradeCode) -> bool {
        self.rank() > other.rank()
    }

    /// 只認標準代碼 (含 M- 這個 NM 別名)，不做模糊比對
    fn from_code(text: &str) -> Option<GradeCode> {
        let upper = text.trim().to_ascii_uppercase();
        if upper == "M-" {
            return Some(GradeCode::NearMint);
        }
        GradeCode::ALL.into_iter().find(|g| g.code() == upper)
    }

    fn from_full_name(text: &str) -> Option<GradeCode> {
        let lower = text.trim().to_ascii_lowercase();
        let lower = lower.split_whitespace().collect::<Vec<_>>().join(" ");
        match lower.as_str() {
            "mint" => Some(GradeCode::Mint),
            "near mint" | "mint minus" | "mint-" => Some(GradeCode::NearMint),
            "very good plus" | "very good+" => Some(GradeCode::VeryGoodPlus),
            "very good" => Some(GradeCode::VeryGood),
            "good plus" | "good+" => Some(GradeCode::GoodPlus),
            "good" => Some(GradeCode::Good),
            "fair" => Some(GradeCode::Fair),
            "poor" => Some(GradeCode::Poor),
            _ => None,
        }
    }
}

impl fmt::Display for GradeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GradeCode {
    type Err = PricingError;

    /// 嚴格解析：無法辨識就是呼叫端錯誤
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s).ok_or_else(|| PricingError::UnknownGrade {
            field: "condition".to_string(),
            value: s.to_string(),
        })
    }
}

/// 比對優先順序：越長、越具體的寫法越先試
const PATTERN_TABLE: &[(GradeCode, &[&str])] = &[
    (GradeCode::NearMint, &["near mint", "mint minus", "NM", "M-"]),
    (GradeCode::VeryGoodPlus, &["very good plus", "very good+", "VG+"]),
    (GradeCode::VeryGood, &["very good", "VG"]),
    (GradeCode::GoodPlus, &["good plus", "good+", "G+"]),
    (GradeCode::Good, &["good", "G"]),
    (GradeCode::Mint, &["mint", "M"]),
    (GradeCode::Fair, &["fair", "F"]),
    (GradeCode::Poor, &["poor", "P"]),
];

struct GradeMatcher {
    parenthetical: Regex,
    patterns: RegexSet,
    grades: Vec<GradeCode>,
}

impl GradeMatcher {
    fn build() -> Self {
        let mut sources = Vec::new();
        let mut grades = Vec::new();

        for (grade, tokens) in PATTERN_TABLE {
            for token in *tokens {
                // 前後不能接英數字或 +/-，避免 "VG" 命中 "VG+"
                sources.push(format!(
                    r"(?i)(?:^|[^A-Za-z0-9+\-]){}(?:$|[^A-Za-z0-9+\-])",
                    regex::escape(token)
                ));
                grades.push(*grade);
            }
        }

        Self {
            parenthetical: Regex::new(r"\(([^()]*)\)").expect("static parenthetical pattern"),
            patterns: RegexSet::new(&sources).expect("static grade patterns"),
            grades,
        }
    }

    fn normalize(&self, text: &str) -> Option<GradeCode> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(grade) = GradeCode::from_code(text) {
            return Some(grade);
        }

        if let Some(grade) = self
            .parenthetical
            .captures_iter(text)
            .find_map(|caps| GradeCode::from_code(&caps[1]))
        {
            return Some(grade);
        }

        let head = text.split('(').next().unwrap_or_default();
        if let Some(grade) = GradeCode::from_full_name(head) {
            return Some(grade);
        }

        // RegexSet 的 matches 依索引遞增，第一個就是優先權最高的
        self.patterns
            .matches(text)
            .iter()
            .next()
            .map(|index| self.grades[index])
    }
}

fn matcher() -> &'static GradeMatcher {
    static MATCHER: OnceLock<GradeMatcher> = OnceLock::new();
    MATCHER.get_or_init(GradeMatcher::build)
}

/// 把品相文字轉成標準代碼，無法辨識時回傳 `None`
pub fn normalize(text: &str) -> Option<GradeCode> {
    matcher().normalize(text)
}

pub fn rank(code: GradeCode) -> u8 {
    code.rank()
}

/// 未知品相永遠不算比較好
pub fn is_better(candidate: Option<GradeCode>, reference: GradeCode) -> bool {
    candidate.is_some_and(|grade| grade.is_better_than(reference))
}
