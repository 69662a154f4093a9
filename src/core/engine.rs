use crate::core::classifier::classify_all;
use crate::core::rounder::{LadderSettings, PriceLadder};
use crate::core::selector::StrategySelector;
use crate::domain::model::{MatchTier, PricingOutcome, PricingRecommendation, PricingRequest};
use crate::utils::error::Result;
use crate::utils::validation::validate_price;

/// 定價入口。本身不持有任何請求狀態，可在多執行緒間共用
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    ladder: PriceLadder,
}

impl PricingEngine {
    pub fn new(ladder_settings: LadderSettings) -> Self {
        Self {
            ladder: PriceLadder::new(ladder_settings),
        }
    }

    pub fn recommend(&self, request: &PricingRequest<'_>) -> Result<PricingOutcome> {
        // ListingRecord 建構時已驗證，這裡再擋一次以防呼叫端繞過
        for listing in request.listings {
            validate_price(listing.price())?;
        }

        let pass = classify_all(request.listings, &request.target);
        tracing::debug!(
            "Classified {} listings for {}: exact={} better_sleeve={} media_only={} better_condition={} no_match={}",
            pass.total(),
            request.target,
            pass.count(MatchTier::ExactMatch),
            pass.count(MatchTier::BetterSleeveMatch),
            pass.count(MatchTier::MediaOnlyMatch),
            pass.count(MatchTier::BetterConditionMatch),
            pass.count(MatchTier::NoMatch),
        );

        let selector = StrategySelector::new(&pass);
        let mut outcome = PricingOutcome::default();

        if request.mode.includes_full() {
            outcome.full = selector.select_full().map(|rec| self.with_ladder(rec));
        }
        if request.mode.includes_media_only() {
            outcome.media_only = selector.select_media_only().map(|rec| self.with_ladder(rec));
        }

        match outcome.primary() {
            Some(rec) => tracing::info!(
                "💰 Suggested {} via '{}' ({} of {} listings)",
                rec.suggested_price,
                rec.strategy,
                rec.matching_listings,
                rec.total_listings
            ),
            None => tracing::info!("No comparable listings for {}", request.target),
        }

        Ok(outcome)
    }

    fn with_ladder(&self, mut rec: PricingRecommendation) -> PricingRecommendation {
        rec.suggestion_ladder = self.ladder.generate(rec.min, rec.median, rec.suggested_price);
        rec
    }
}
