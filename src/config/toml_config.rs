use crate::core::rounder::LadderSettings;
use crate::domain::model::PricingMode;
use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub pricing: PricingSection,
    pub ladder: LadderSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    pub mode: PricingMode,
    /// 買家所在地區；設定後只有同地區賣家進入比價
    pub home_region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl PricingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME_REGION})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PricingError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn mode(&self) -> PricingMode {
        self.pricing.mode
    }

    pub fn home_region(&self) -> Option<&str> {
        self.pricing.home_region.as_deref()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(region) = &self.pricing.home_region {
            validate_non_empty_string("pricing.home_region", region)?;
        }

        validate_range("ladder.max_points", self.ladder.max_points, 1, 50)?;
        validate_range("ladder.min_points", self.ladder.min_points, 0, self.ladder.max_points)?;
        validate_range(
            "ladder.min_gap_percent",
            self.ladder.min_gap_percent,
            Decimal::ZERO,
            dec!(50),
        )?;

        if let Some(level) = &self.logging.level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(PricingError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
                });
            }
        }

        Ok(())
    }
}

impl Validate for PricingConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[pricing]
mode = "both"
home_region = "United States"

[ladder]
min_points = 6
max_points = 10
min_gap_percent = 5

[logging]
level = "debug"
json = true
"#;

        let config = PricingConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.mode(), PricingMode::Both);
        assert_eq!(config.home_region(), Some("United States"));
        assert_eq!(config.ladder.min_points, 6);
        assert_eq!(config.ladder.max_points, 10);
        assert_eq!(config.ladder.min_gap_percent, dec!(5));
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PricingConfig::from_toml_str("").unwrap();
        assert_eq!(config.mode(), PricingMode::Full);
        assert_eq!(config.home_region(), None);
        assert_eq!(config.ladder, LadderSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("VINYL_PRICER_TEST_REGION", "Germany");

        let toml_content = r#"
[pricing]
home_region = "${VINYL_PRICER_TEST_REGION}"
"#;

        let config = PricingConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.home_region(), Some("Germany"));

        std::env::remove_var("VINYL_PRICER_TEST_REGION");
    }

    #[test]
    fn test_config_validation() {
        let mut config = PricingConfig::default();
        config.ladder.max_points = 0;
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.ladder.min_points = 20;
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.logging.level = Some("loud".to_string());
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.pricing.home_region = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        let result = PricingConfig::from_toml_str("[pricing]\nmode = \"cheapest\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[pricing]\nmode = \"media-only\"").unwrap();

        let config = PricingConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mode(), PricingMode::MediaOnly);
    }
}
