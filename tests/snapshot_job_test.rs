use anyhow::Result;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use vinyl_pricer::domain::ports::ListingSource;
use vinyl_pricer::{
    GradeCode, LocalSnapshot, PricingConfig, PricingError, PricingJob, PricingMode, Strategy,
    TargetCondition,
};

const CSV_SNAPSHOT: &str = "price,media_grade,sleeve_grade,seller_region,seller_label
12.00,Very Good Plus (VG+),Very Good Plus (VG+),United States,crate-digger
9.00,Near Mint (NM or M-),Near Mint (NM or M-),United States,wax-house
15.00,Very Good (VG),Very Good (VG),United States,spin-cycle
4.00,Near Mint (NM or M-),Near Mint (NM or M-),Japan,import-only
";

/// 從 CSV 快照跑完整流程，海外賣家不應影響結果
#[tokio::test]
async fn test_csv_snapshot_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("listings.csv");
    tokio::fs::write(&path, CSV_SNAPSHOT).await?;

    let config = PricingConfig::from_toml_str(
        r#"
[pricing]
mode = "both"
home_region = "United States"
"#,
    )?;

    let job = PricingJob::new(LocalSnapshot::new(&path), config);
    let report = job
        .run(TargetCondition::new(GradeCode::VeryGoodPlus, GradeCode::VeryGoodPlus))
        .await?;

    assert_eq!(report.snapshot_listings, 4);
    assert_eq!(report.domestic_listings, 3);
    assert_eq!(report.mode, PricingMode::Both);

    let full = report.outcome.full.as_ref().expect("full recommendation");
    assert_eq!(full.strategy, Strategy::BetterMedia);
    assert_eq!(full.min, dec!(9.00));
    assert_eq!(full.suggested_price, dec!(8.79));
    assert_eq!(full.total_listings, 3);
    assert_eq!(
        full.cheapest_listing.as_ref().map(|l| l.seller_label()),
        Some("wax-house")
    );

    let media_only = report.outcome.media_only.as_ref().expect("media-only recommendation");
    assert_eq!(media_only.strategy, Strategy::BetterMedia);

    // 報告可以序列化成 JSON 給下游使用
    let json = serde_json::to_value(&report)?;
    assert_eq!(json["outcome"]["full"]["strategy"], "better-media");
    assert_eq!(json["target"]["media"], "VG+");
    assert_eq!(json["outcome"]["full"]["suggested_price"], "8.79");

    Ok(())
}

#[tokio::test]
async fn test_json_snapshot_emergency_fallback() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("listings.json");
    tokio::fs::write(
        &path,
        r#"[
            {"price": "6.00", "media_grade": "G", "sleeve_grade": "G", "seller_region": "US", "seller_label": "a"},
            {"price": "3.50", "media_grade": "Poor (P)", "sleeve_grade": "Generic", "seller_region": "US", "seller_label": "b"}
        ]"#,
    )
    .await?;

    let job = PricingJob::new(LocalSnapshot::new(&path), PricingConfig::default());
    let report = job
        .run(TargetCondition::new(GradeCode::VeryGood, GradeCode::VeryGood))
        .await?;

    let full = report.outcome.full.expect("emergency recommendation");
    assert_eq!(full.strategy_name(), "emergency fallback");
    assert_eq!(full.min, dec!(3.50));
    assert_eq!(full.matching_listings, 2);
    assert!(report.outcome.media_only.is_none());

    Ok(())
}

#[tokio::test]
async fn test_region_filter_can_empty_the_pool() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("listings.csv");
    tokio::fs::write(&path, CSV_SNAPSHOT).await?;

    let mut config = PricingConfig::default();
    config.pricing.home_region = Some("Iceland".to_string());

    let report = PricingJob::new(LocalSnapshot::new(&path), config)
        .run(TargetCondition::new(GradeCode::VeryGoodPlus, GradeCode::VeryGoodPlus))
        .await?;

    assert_eq!(report.domestic_listings, 0);
    assert!(report.outcome.primary().is_none());

    Ok(())
}

#[tokio::test]
async fn test_snapshot_errors() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let missing = LocalSnapshot::new(temp_dir.path().join("missing.csv"));
    assert!(matches!(
        missing.load_listings().await,
        Err(PricingError::IoError(_))
    ));

    let unsupported = LocalSnapshot::new(temp_dir.path().join("listings.txt"));
    assert!(matches!(
        unsupported.load_listings().await,
        Err(PricingError::UnsupportedSnapshotFormat { .. })
    ));

    let bad_price = temp_dir.path().join("bad.csv");
    tokio::fs::write(
        &bad_price,
        "price,media_grade,sleeve_grade,seller_region,seller_label\n-5.00,VG,VG,US,x\n",
    )
    .await?;
    assert!(matches!(
        LocalSnapshot::new(&bad_price).load_listings().await,
        Err(PricingError::CsvError(_))
    ));

    Ok(())
}

#[test]
fn test_unknown_target_condition_is_an_input_error() {
    let err = TargetCondition::parse("Generic", "VG").unwrap_err();
    assert!(matches!(err, PricingError::UnknownGrade { .. }));
    assert_eq!(
        err.category(),
        vinyl_pricer::utils::error::ErrorCategory::Input
    );
}
