use crate::utils::error::{PricingError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 單筆刊登價格上限；階梯與削價計算都在此範圍內保證不溢位
pub const MAX_PRICE: Decimal = dec!(10000000.00);

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 價格必須為正、不超過 [`MAX_PRICE`] 且最多兩位小數
pub fn validate_price(price: Decimal) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(PricingError::InvalidPrice {
            value: price.to_string(),
            reason: "Price must be positive".to_string(),
        });
    }

    if price > MAX_PRICE {
        return Err(PricingError::InvalidPrice {
            value: price.to_string(),
            reason: format!("Price must not exceed {}", MAX_PRICE),
        });
    }

    if price.normalize().scale() > 2 {
        return Err(PricingError::InvalidPrice {
            value: price.to_string(),
            reason: "Price must have at most two decimal places".to_string(),
        });
    }

    Ok(())
}

/// 解析價格文字 (允許前後空白與貨幣符號)
pub fn parse_price(raw: &str) -> Result<Decimal> {
    let cleaned = raw.trim().trim_start_matches(&['$', '€', '£'][..]).replace(',', "");
    let price: Decimal = cleaned.parse().map_err(|_| PricingError::InvalidPrice {
        value: raw.to_string(),
        reason: "Not a decimal number".to_string(),
    })?;
    validate_price(price)?;
    Ok(price)
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
