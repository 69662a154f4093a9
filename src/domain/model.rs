use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::grade::{self, GradeCode};
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{parse_price, validate_price};

/// 快照裡的一筆競品刊登。建立後不可變，價格在建構時驗證
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawListing")]
pub struct ListingRecord {
    price: Decimal,
    media_grade: String,
    sleeve_grade: String,
    seller_region: String,
    seller_label: String,
}

#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(deserialize_with = "deserialize_price")]
    price: Decimal,
    media_grade: String,
    sleeve_grade: String,
    #[serde(default)]
    seller_region: String,
    #[serde(default)]
    seller_label: String,
}

/// 價格可以是數字，也可以是帶貨幣符號的文字 (例如 "$12.00")
fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Decimal, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceField {
        Text(String),
        Number(Decimal),
    }

    match PriceField::deserialize(deserializer)? {
        PriceField::Text(raw) => parse_price(&raw).map_err(serde::de::Error::custom),
        PriceField::Number(price) => Ok(price),
    }
}

impl TryFrom<RawListing> for ListingRecord {
    type Error = PricingError;

    fn try_from(raw: RawListing) -> Result<Self> {
        ListingRecord::new(
            raw.price,
            raw.media_grade,
            raw.sleeve_grade,
            raw.seller_region,
            raw.seller_label,
        )
    }
}

impl ListingRecord {
    pub fn new(
        price: Decimal,
        media_grade: impl Into<String>,
        sleeve_grade: impl Into<String>,
        seller_region: impl Into<String>,
        seller_label: impl Into<String>,
    ) -> Result<Self> {
        validate_price(price)?;
        Ok(Self {
            price,
            media_grade: media_grade.into(),
            sleeve_grade: sleeve_grade.into(),
            seller_region: seller_region.into(),
            seller_label: seller_label.into(),
        })
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn media_grade(&self) -> &str {
        &self.media_grade
    }

    pub fn sleeve_grade(&self) -> &str {
        &self.sleeve_grade
    }

    pub fn seller_region(&self) -> &str {
        &self.seller_region
    }

    pub fn seller_label(&self) -> &str {
        &self.seller_label
    }
}

/// 賣家自己那張的品相，兩個欄位都必須是已辨識的代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCondition {
    pub media: GradeCode,
    pub sleeve: GradeCode,
}

impl TargetCondition {
    pub fn new(media: GradeCode, sleeve: GradeCode) -> Self {
        Self { media, sleeve }
    }

    /// 從原始文字建立；任一欄位無法辨識即為呼叫端錯誤
    pub fn parse(media: &str, sleeve: &str) -> Result<Self> {
        let media_grade = grade::normalize(media).ok_or_else(|| PricingError::UnknownGrade {
            field: "media".to_string(),
            value: media.to_string(),
        })?;
        let sleeve_grade = grade::normalize(sleeve).ok_or_else(|| PricingError::UnknownGrade {
            field: "sleeve".to_string(),
            value: sleeve.to_string(),
        })?;
        Ok(Self::new(media_grade, sleeve_grade))
    }
}

impl fmt::Display for TargetCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media, self.sleeve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    ExactMatch,
    BetterSleeveMatch,
    MediaOnlyMatch,
    BetterConditionMatch,
    NoMatch,
    EmergencyFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedListing<'a> {
    /// 在輸入快照中的位置，用來做穩定的同價排序
    pub position: usize,
    pub listing: &'a ListingRecord,
    pub tier: MatchTier,
}

/// 非空層級的價格摘要，prices 由低到高
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierAggregate {
    pub tier: MatchTier,
    pub prices: Vec<Decimal>,
    pub count: usize,
    pub min_price: Decimal,
}

impl TierAggregate {
    /// 空集合回傳 `None`
    pub fn from_prices(tier: MatchTier, prices: impl IntoIterator<Item = Decimal>) -> Option<Self> {
        let mut prices: Vec<Decimal> = prices.into_iter().collect();
        prices.sort();
        let min_price = *prices.first()?;

        Some(Self {
            tier,
            count: prices.len(),
            prices,
            min_price,
        })
    }

    /// 合併兩個層級的價格，保持遞增
    pub fn merged(tier: MatchTier, parts: &[Option<&TierAggregate>]) -> Option<Self> {
        Self::from_prices(
            tier,
            parts
                .iter()
                .flatten()
                .flat_map(|agg| agg.prices.iter().copied()),
        )
    }
}

/// 最後採用哪個價格池，序列化後就是 strategy 名稱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "exact-match")]
    ExactMatch,
    #[serde(rename = "media-only-fallback")]
    MediaOnlyFallback,
    #[serde(rename = "same-media")]
    SameMedia,
    #[serde(rename = "same-media-better-sleeve")]
    SameMediaBetterSleeve,
    #[serde(rename = "better-media")]
    BetterMedia,
    #[serde(rename = "emergency fallback")]
    EmergencyFallback,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::ExactMatch => "exact-match",
            Strategy::MediaOnlyFallback => "media-only-fallback",
            Strategy::SameMedia => "same-media",
            Strategy::SameMediaBetterSleeve => "same-media-better-sleeve",
            Strategy::BetterMedia => "better-media",
            Strategy::EmergencyFallback => "emergency fallback",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingRecommendation {
    pub strategy: Strategy,
    pub min: Decimal,
    pub median: Decimal,
    pub max: Decimal,
    pub avg: Decimal,
    pub suggested_price: Decimal,
    pub matching_listings: usize,
    pub total_listings: usize,
    pub competition_ratio_percent: Decimal,
    pub cheapest_listing: Option<ListingRecord>,
    pub suggestion_ladder: Vec<Decimal>,
}

impl PricingRecommendation {
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingMode {
    #[default]
    Full,
    MediaOnly,
    Both,
}

impl PricingMode {
    pub fn includes_full(self) -> bool {
        matches!(self, PricingMode::Full | PricingMode::Both)
    }

    pub fn includes_media_only(self) -> bool {
        matches!(self, PricingMode::MediaOnly | PricingMode::Both)
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PricingMode::Full => "full",
            PricingMode::MediaOnly => "media-only",
            PricingMode::Both => "both",
        })
    }
}

impl FromStr for PricingMode {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(PricingMode::Full),
            "media-only" | "media_only" | "media" => Ok(PricingMode::MediaOnly),
            "both" => Ok(PricingMode::Both),
            other => Err(PricingError::InvalidConfigValueError {
                field: "pricing.mode".to_string(),
                value: other.to_string(),
                reason: "Expected one of: full, media-only, both".to_string(),
            }),
        }
    }
}

/// 一次定價請求需要的全部狀態，由呼叫端每次明確傳入
#[derive(Debug, Clone, Copy)]
pub struct PricingRequest<'a> {
    pub listings: &'a [ListingRecord],
    pub target: TargetCondition,
    pub mode: PricingMode,
}

impl<'a> PricingRequest<'a> {
    pub fn new(listings: &'a [ListingRecord], target: TargetCondition, mode: PricingMode) -> Self {
        Self {
            listings,
            target,
            mode,
        }
    }
}

/// 依模式填入；`None` 表示沒有任何可比較的刊登
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PricingOutcome {
    pub full: Option<PricingRecommendation>,
    pub media_only: Option<PricingRecommendation>,
}

impl PricingOutcome {
    /// 依模式取主要建議；Both 模式以 full 為主
    pub fn primary(&self) -> Option<&PricingRecommendation> {
        self.full.as_ref().or(self.media_only.as_ref())
    }
}
