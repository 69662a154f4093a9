use crate::config::toml_config::PricingConfig;
use crate::domain::model::{PricingMode, TargetCondition};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "vinyl-pricer")]
#[command(about = "Suggest a sale price from competing marketplace listings")]
pub struct CliConfig {
    /// Listing snapshot (.csv or .json)
    #[arg(short, long)]
    pub listings: String,

    /// Media grade of your copy, e.g. VG+ or "Near Mint (NM or M-)"
    #[arg(long)]
    pub media: String,

    /// Sleeve grade of your copy
    #[arg(long)]
    pub sleeve: String,

    /// full, media-only or both
    #[arg(long)]
    pub mode: Option<PricingMode>,

    /// Only compare against sellers in this region
    #[arg(long)]
    pub region: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Pretty-print the JSON report")]
    pub pretty: bool,
}

impl CliConfig {
    pub fn target(&self) -> Result<TargetCondition> {
        TargetCondition::parse(&self.media, &self.sleeve)
    }

    /// 命令列參數覆蓋 TOML 設定
    pub fn apply_overrides(&self, config: &mut PricingConfig) {
        if let Some(mode) = self.mode {
            config.pricing.mode = mode;
        }
        if let Some(region) = &self.region {
            config.pricing.home_region = Some(region.clone());
        }
        if self.log_json {
            config.logging.json = true;
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("listings", &self.listings)?;
        self.target()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_and_overrides() {
        let cli = CliConfig::parse_from([
            "vinyl-pricer",
            "--listings",
            "snapshot.csv",
            "--media",
            "VG+",
            "--sleeve",
            "Near Mint",
            "--mode",
            "both",
            "--region",
            "Canada",
        ]);
        assert!(cli.validate().is_ok());

        let mut config = PricingConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.mode(), PricingMode::Both);
        assert_eq!(config.home_region(), Some("Canada"));
    }

    #[test]
    fn test_unknown_target_grade_fails_validation() {
        let cli = CliConfig::parse_from([
            "vinyl-pricer",
            "--listings",
            "snapshot.csv",
            "--media",
            "shiny",
            "--sleeve",
            "VG",
        ]);
        assert!(cli.validate().is_err());
    }
}
