use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::toml_config::PricingConfig;
use crate::core::engine::PricingEngine;
use crate::domain::model::{PricingMode, PricingOutcome, PricingRequest, TargetCondition};
use crate::domain::ports::{domestic_pool, ListingSource};
use crate::utils::error::Result;

/// CLI 輸出的定價報告
#[derive(Debug, Clone, Serialize)]
pub struct PricingReport {
    pub generated_at: DateTime<Utc>,
    pub target: TargetCondition,
    pub mode: PricingMode,
    pub home_region: Option<String>,
    pub snapshot_listings: usize,
    pub domestic_listings: usize,
    pub outcome: PricingOutcome,
}

/// 讀取快照、過濾國內賣家、執行定價
pub struct PricingJob<S: ListingSource> {
    source: S,
    config: PricingConfig,
    engine: PricingEngine,
}

impl<S: ListingSource> PricingJob<S> {
    pub fn new(source: S, config: PricingConfig) -> Self {
        let engine = PricingEngine::new(config.ladder);
        Self {
            source,
            config,
            engine,
        }
    }

    pub async fn run(&self, target: TargetCondition) -> Result<PricingReport> {
        tracing::info!("📥 Loading listing snapshot");
        let snapshot = self.source.load_listings().await?;
        let snapshot_listings = snapshot.len();

        let listings = domestic_pool(snapshot, self.config.home_region());
        tracing::info!(
            "🔍 Pricing {} ({}) against {} of {} listings",
            target,
            self.config.mode(),
            listings.len(),
            snapshot_listings
        );

        let request = PricingRequest::new(&listings, target, self.config.mode());
        let outcome = self.engine.recommend(&request)?;

        Ok(PricingReport {
            generated_at: Utc::now(),
            target,
            mode: self.config.mode(),
            home_region: self.config.home_region().map(str::to_string),
            snapshot_listings,
            domestic_listings: listings.len(),
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grade::GradeCode;
    use crate::domain::model::{ListingRecord, Strategy};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_job_filters_region_before_pricing() {
        let snapshot = vec![
            ListingRecord::new(dec!(5.00), "VG", "VG", "France", "abroad").unwrap(),
            ListingRecord::new(dec!(11.00), "VG", "VG", "Germany", "local").unwrap(),
        ];
        let mut config = PricingConfig::default();
        config.pricing.home_region = Some("Germany".to_string());

        let job = PricingJob::new(snapshot, config);
        let report = job
            .run(TargetCondition::new(GradeCode::VeryGood, GradeCode::VeryGood))
            .await
            .unwrap();

        assert_eq!(report.snapshot_listings, 2);
        assert_eq!(report.domestic_listings, 1);
        let rec = report.outcome.full.unwrap();
        assert_eq!(rec.strategy, Strategy::ExactMatch);
        assert_eq!(rec.min, dec!(11.00));
        assert_eq!(rec.total_listings, 1);
    }
}
