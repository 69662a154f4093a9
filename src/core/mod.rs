pub mod classifier;
pub mod engine;
pub mod grade;
pub mod job;
pub mod rounder;
pub mod selector;

pub use crate::domain::model::{
    ClassifiedListing, ListingRecord, MatchTier, PricingMode, PricingOutcome,
    PricingRecommendation, PricingRequest, Strategy, TargetCondition, TierAggregate,
};
pub use crate::domain::ports::{domestic_pool, ListingSource};
pub use crate::utils::error::Result;
