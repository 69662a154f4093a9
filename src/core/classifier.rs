use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::core::grade::{self, GradeCode};
use crate::domain::model::{
    ClassifiedListing, ListingRecord, MatchTier, TargetCondition, TierAggregate,
};

/// 緊急池涵蓋的層級，也就是分類結果的全部
pub const EVERY_TIER: [MatchTier; 5] = [
    MatchTier::ExactMatch,
    MatchTier::BetterSleeveMatch,
    MatchTier::MediaOnlyMatch,
    MatchTier::BetterConditionMatch,
    MatchTier::NoMatch,
];

/// 依目標品相把單筆刊登歸到一個層級；品相文字無法辨識時一律 NoMatch
pub fn classify(listing: &ListingRecord, target: &TargetCondition) -> MatchTier {
    let media = grade::normalize(listing.media_grade());
    let sleeve = grade::normalize(listing.sleeve_grade());

    let (Some(media), Some(sleeve)) = (media, sleeve) else {
        tracing::debug!(
            "Unrecognized grade text '{}' / '{}' from {}, treating as no match",
            listing.media_grade(),
            listing.sleeve_grade(),
            listing.seller_label()
        );
        return MatchTier::NoMatch;
    };

    tier_for(media, sleeve, target)
}

fn tier_for(media: GradeCode, sleeve: GradeCode, target: &TargetCondition) -> MatchTier {
    let media_match = media == target.media;
    let sleeve_match = sleeve == target.sleeve;
    let better_media = media.is_better_than(target.media);

    if media_match {
        if sleeve_match {
            MatchTier::ExactMatch
        } else if sleeve.is_better_than(target.sleeve) {
            MatchTier::BetterSleeveMatch
        } else {
            MatchTier::MediaOnlyMatch
        }
    } else if better_media {
        MatchTier::BetterConditionMatch
    } else {
        MatchTier::NoMatch
    }
}

/// 一次分類整個國內池的結果。各層級與緊急池的摘要在這裡算好，之後只讀不重算
#[derive(Debug, Clone)]
pub struct ClassificationPass<'a> {
    listings: Vec<ClassifiedListing<'a>>,
    aggregates: HashMap<MatchTier, TierAggregate>,
    emergency: Option<TierAggregate>,
}

impl<'a> ClassificationPass<'a> {
    /// 依輸入順序回傳某一層級的刊登
    pub fn tier(&self, tier: MatchTier) -> Vec<ClassifiedListing<'a>> {
        self.listings
            .iter()
            .filter(|c| c.tier == tier)
            .copied()
            .collect()
    }

    /// 非空層級的摘要；`EmergencyFallback` 對應整個國內池
    pub fn aggregate(&self, tier: MatchTier) -> Option<&TierAggregate> {
        match tier {
            MatchTier::EmergencyFallback => self.emergency.as_ref(),
            _ => self.aggregates.get(&tier),
        }
    }

    /// 給定層級中，輸入順序第一筆價格等於 `price` 的刊登
    pub fn first_at_price(&self, tiers: &[MatchTier], price: Decimal) -> Option<&'a ListingRecord> {
        self.listings
            .iter()
            .find(|c| tiers.contains(&c.tier) && c.listing.price() == price)
            .map(|c| c.listing)
    }

    pub fn total(&self) -> usize {
        self.listings.len()
    }

    pub fn count(&self, tier: MatchTier) -> usize {
        self.listings.iter().filter(|c| c.tier == tier).count()
    }
}

pub fn classify_all<'a>(
    listings: &'a [ListingRecord],
    target: &TargetCondition,
) -> ClassificationPass<'a> {
    let listings: Vec<ClassifiedListing<'a>> = listings
        .iter()
        .enumerate()
        .map(|(position, listing)| ClassifiedListing {
            position,
            listing,
            tier: classify(listing, target),
        })
        .collect();

    let mut buckets: HashMap<MatchTier, Vec<Decimal>> = HashMap::new();
    for classified in &listings {
        buckets
            .entry(classified.tier)
            .or_default()
            .push(classified.listing.price());
    }

    let aggregates = buckets
        .into_iter()
        .filter_map(|(tier, prices)| TierAggregate::from_prices(tier, prices).map(|agg| (tier, agg)))
        .collect();
    let emergency = TierAggregate::from_prices(
        MatchTier::EmergencyFallback,
        listings.iter().map(|c| c.listing.price()),
    );

    ClassificationPass {
        listings,
        aggregates,
        emergency,
    }
}
