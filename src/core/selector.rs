use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::borrow::Cow;

use crate::core::classifier::{ClassificationPass, EVERY_TIER};
use crate::core::rounder::undercut;
use crate::domain::model::{MatchTier, PricingRecommendation, Strategy, TierAggregate};

/// 被選中的價格池、它的來源策略，以及組成它的層級
#[derive(Debug, Clone)]
struct Candidate<'p> {
    strategy: Strategy,
    sources: Vec<MatchTier>,
    aggregate: Option<Cow<'p, TierAggregate>>,
}

impl<'p> Candidate<'p> {
    fn min(&self) -> Option<Decimal> {
        self.aggregate.as_ref().map(|agg| agg.min_price)
    }

    fn is_empty(&self) -> bool {
        self.aggregate.is_none()
    }

    /// 只有對方非空且最低價嚴格較低時才換
    fn undercuts(&self, other: &Candidate<'_>) -> bool {
        match (self.min(), other.min()) {
            (Some(mine), Some(theirs)) => mine < theirs,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// 同一次分類結果上的兩種定價模式，只讀分類時算好的層級摘要
pub struct StrategySelector<'p, 'a> {
    pass: &'p ClassificationPass<'a>,
}

impl<'p, 'a> StrategySelector<'p, 'a> {
    pub fn new(pass: &'p ClassificationPass<'a>) -> Self {
        Self { pass }
    }

    fn candidate(&self, strategy: Strategy, tier: MatchTier) -> Candidate<'p> {
        let sources = match tier {
            MatchTier::EmergencyFallback => EVERY_TIER.to_vec(),
            _ => vec![tier],
        };
        Candidate {
            strategy,
            sources,
            aggregate: self.pass.aggregate(tier).map(Cow::Borrowed),
        }
    }

    /// 唱片與封套都納入考量
    pub fn select_full(&self) -> Option<PricingRecommendation> {
        let exact = self.candidate(Strategy::ExactMatch, MatchTier::ExactMatch);
        let primary = if exact.is_empty() {
            self.candidate(Strategy::MediaOnlyFallback, MatchTier::MediaOnlyMatch)
        } else {
            exact
        };

        // 封套較佳的池只跟完全相符比，退到只有唱片相符時不比
        let better_sleeve =
            self.candidate(Strategy::SameMediaBetterSleeve, MatchTier::BetterSleeveMatch);
        let anchor = if primary.strategy == Strategy::ExactMatch && better_sleeve.undercuts(&primary) {
            better_sleeve
        } else {
            primary
        };

        self.finish(anchor)
    }

    /// 只看唱片品相；完全相符與只有唱片相符合併成一個池，不看封套
    pub fn select_media_only(&self) -> Option<PricingRecommendation> {
        let merged = TierAggregate::merged(
            MatchTier::MediaOnlyMatch,
            &[
                self.pass.aggregate(MatchTier::ExactMatch),
                self.pass.aggregate(MatchTier::MediaOnlyMatch),
            ],
        );

        self.finish(Candidate {
            strategy: Strategy::SameMedia,
            sources: vec![MatchTier::ExactMatch, MatchTier::MediaOnlyMatch],
            aggregate: merged.map(Cow::Owned),
        })
    }

    /// 套用較佳品相的比較，必要時依序退到封套較佳的池與緊急池，最後算統計
    fn finish(&self, anchor: Candidate<'p>) -> Option<PricingRecommendation> {
        let better_condition =
            self.candidate(Strategy::BetterMedia, MatchTier::BetterConditionMatch);

        let mut chosen = if better_condition.undercuts(&anchor) {
            better_condition
        } else {
            anchor
        };

        // 封套較佳的池排在緊急池之前
        if chosen.is_empty() {
            let better_sleeve =
                self.candidate(Strategy::SameMediaBetterSleeve, MatchTier::BetterSleeveMatch);
            if !better_sleeve.is_empty() {
                tracing::debug!("Only better-sleeve listings share the target media grade");
                chosen = better_sleeve;
            }
        }

        if chosen.is_empty() {
            tracing::warn!(
                "⚠️ No listing matches the target condition, using all {} domestic listings",
                self.pass.total()
            );
            chosen = self.candidate(Strategy::EmergencyFallback, MatchTier::EmergencyFallback);
        }

        let aggregate = chosen.aggregate.as_deref()?;
        Some(self.summarize(chosen.strategy, &chosen.sources, aggregate))
    }

    fn summarize(
        &self,
        strategy: Strategy,
        sources: &[MatchTier],
        aggregate: &TierAggregate,
    ) -> PricingRecommendation {
        let prices = &aggregate.prices;
        let count = aggregate.count;
        let min = aggregate.min_price;
        let max = prices[count - 1];
        let median = prices[count / 2];
        let sum: Decimal = prices.iter().sum();
        let avg = (sum / Decimal::from(count))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let total = self.pass.total();
        let competition_ratio_percent = competition_ratio(count, total);
        let cheapest_listing = self.pass.first_at_price(sources, min).cloned();

        tracing::debug!(
            "Strategy '{}' over {} listings: min {}, median {}, max {}",
            strategy,
            count,
            min,
            median,
            max
        );

        PricingRecommendation {
            strategy,
            min,
            median,
            max,
            avg,
            suggested_price: undercut(min),
            matching_listings: count,
            total_listings: total,
            competition_ratio_percent,
            cheapest_listing,
            suggestion_ladder: Vec::new(),
        }
    }
}

/// matching / total × 100，四捨五入到一位小數
pub fn competition_ratio(matching: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(matching) * dec!(100) / Decimal::from(total))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
