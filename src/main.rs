use clap::Parser;
use vinyl_pricer::utils::{logger, validation::Validate};
use vinyl_pricer::{CliConfig, LocalSnapshot, PricingConfig, PricingError, PricingJob};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 載入設定 (沒給就用預設值)，再套用命令列覆蓋
    let mut config = match &cli.config {
        Some(path) => match PricingConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => PricingConfig::default(),
    };
    cli.apply_overrides(&mut config);

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(config.log_level());
    } else {
        let verbose = cli.verbose || config.log_level() == Some("debug");
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting vinyl-pricer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let target = match cli.validate().and_then(|_| config.validate()).and_then(|_| cli.target()) {
        Ok(target) => target,
        Err(e) => fail(&e),
    };

    let job = PricingJob::new(LocalSnapshot::new(&cli.listings), config);
    let report = match job.run(target).await {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    match rendered {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => fail(&PricingError::from(e)),
    }

    if report.outcome.primary().is_none() {
        tracing::warn!("⚠️ No usable comparison data in {}", cli.listings);
    }
}

fn fail(e: &PricingError) -> ! {
    tracing::error!(
        "❌ Pricing failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}
