pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{snapshot::LocalSnapshot, toml_config::PricingConfig};
pub use crate::core::{
    engine::PricingEngine,
    grade::{normalize, GradeCode},
    job::{PricingJob, PricingReport},
    rounder::{generate_suggestion_ladder, undercut, LadderSettings},
};
pub use domain::model::{
    ListingRecord, MatchTier, PricingMode, PricingOutcome, PricingRecommendation,
    PricingRequest, Strategy, TargetCondition,
};
pub use utils::error::{PricingError, Result};
