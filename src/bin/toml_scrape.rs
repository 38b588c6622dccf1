use clap::Parser;
use price_scraper::config::toml_config::TomlConfig;
use price_scraper::core::pages::PageLocator;
use price_scraper::core::ConfigProvider;
use price_scraper::utils::{logger, validation::Validate};
use price_scraper::{ErrorPolicy, EtlEngine, LocalStorage, PricePipeline};

#[derive(Parser)]
#[command(name = "toml-scrape")]
#[command(about = "Price scraper driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "price-scraper.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Skip malformed listings regardless of [run].on_malformed
    #[arg(long)]
    skip_malformed: bool,

    /// Show what would be scraped without sending any request
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based price scraper");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 命令列覆蓋設定
    if args.skip_malformed {
        config.run.on_malformed = ErrorPolicy::SkipMalformed;
        tracing::info!("🔧 Malformed listings will be skipped");
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = match PricePipeline::new(LocalStorage::default(), config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code());
        }
    };
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Price export completed successfully!");
            println!(
                "✅ Wrote {} price row(s) from {} page(s) to {}",
                summary.rows_written, summary.pages_visited, summary.destination
            );
            if summary.rows_skipped > 0 {
                println!("⚠️ Skipped {} malformed listing(s)", summary.rows_skipped);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Price export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    let options = config.csv_options();
    let columns: Vec<&str> = options.columns.iter().map(|c| c.header()).collect();

    println!("📋 Configuration Summary:");
    println!("  Source: {}", config.base_url());
    println!("  Markup: {}", config.markup.version);
    println!("  Output: {}", config.destination_path());
    println!("  Columns: {}", columns.join(", "));
    println!("  On malformed listing: {:?}", config.error_policy());
    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let markup = config.site_markup();
    let locator = PageLocator::new(&markup)?;
    let options = config.csv_options();

    println!("🔍 Dry Run Analysis:");
    println!();
    println!("📡 Pagination:");
    println!("  First page: {}", locator.page_url(config.base_url(), 1)?);
    println!("  Next pages: {}", locator.page_url(config.base_url(), 2)?);
    println!("  Page count from: {}", markup.pagination);
    println!("  Max pages: {}", markup.max_pages);

    println!();
    println!("🧩 Listing markup:");
    println!("  Listing: {}", markup.listing);
    println!("  Address: {}", markup.address);
    println!("  Price: {}", markup.price);
    if let Some(link) = &markup.link {
        println!("  Link: {}", link);
    }

    println!();
    println!("💾 CSV:");
    println!("  Delimiter: {:?}", options.delimiter as char);
    println!("  Quote: {:?}", options.quote as char);
    println!("  Quoting: {:?}", options.quoting);

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
