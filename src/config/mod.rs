pub mod cli;
pub mod toml_config;

use crate::domain::markup::SiteMarkup;
use crate::domain::model::{CsvOptions, ErrorPolicy};
use crate::domain::ports::{ConfigProvider, FetchSettings};
use crate::utils::error::Result;
use crate::utils::validation::{validate_export_settings, Validate};

#[cfg(feature = "cli")]
use crate::domain::markup::{PageScheme, DEFAULT_MAX_PAGES};
#[cfg(feature = "cli")]
use crate::domain::model::{Column, Quoting};
#[cfg(feature = "cli")]
use crate::domain::ports::DEFAULT_USER_AGENT;
#[cfg(feature = "cli")]
use crate::utils::validation::validate_csv_char;
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "https://www.funda.nl/koop/maarssen";
pub const DEFAULT_DESTINATION: &str = "data/price_list.csv";

/// 直接以程式碼組出的設定，給 `export_prices` 與測試使用
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub base_url: String,
    pub destination_path: String,
    pub csv_options: CsvOptions,
    pub markup: SiteMarkup,
    pub fetch: FetchSettings,
    pub error_policy: ErrorPolicy,
}

impl ExportConfig {
    pub fn new(
        base_url: impl Into<String>,
        destination_path: impl Into<String>,
        csv_options: CsvOptions,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            destination_path: destination_path.into(),
            csv_options,
            markup: SiteMarkup::default(),
            fetch: FetchSettings::default(),
            error_policy: ErrorPolicy::default(),
        }
    }

    pub fn with_markup(mut self, markup: SiteMarkup) -> Self {
        self.markup = markup;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }
}

impl ConfigProvider for ExportConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn destination_path(&self) -> &str {
        &self.destination_path
    }

    fn csv_options(&self) -> CsvOptions {
        self.csv_options.clone()
    }

    fn site_markup(&self) -> SiteMarkup {
        self.markup.clone()
    }

    fn fetch_settings(&self) -> FetchSettings {
        self.fetch.clone()
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        validate_export_settings(self)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "price-scraper")]
#[command(about = "Scrape house prices from paginated search results into a CSV file")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = DEFAULT_DESTINATION, help = "The destination file (CSV) of exported prices")]
    pub dest_file: String,

    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    #[arg(long, default_value_t = '"')]
    pub quote: char,

    #[arg(long, default_value = "all", help = "all, necessary, non_numeric or never")]
    pub quoting: Quoting,

    #[arg(long, value_delimiter = ',', default_values_t = vec![Column::Address, Column::Price])]
    pub columns: Vec<Column>,

    #[arg(long, default_value = "query", help = "query[:PARAM] or path[:PREFIX]")]
    pub page_scheme: PageScheme,

    #[arg(long, default_value_t = DEFAULT_MAX_PAGES, help = "Abort when pagination reports more pages")]
    pub max_pages: usize,

    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, help = "Skip listings that cannot be parsed instead of aborting")]
    pub skip_malformed: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn destination_path(&self) -> &str {
        &self.dest_file
    }

    fn csv_options(&self) -> CsvOptions {
        let defaults = CsvOptions::default();
        CsvOptions {
            delimiter: u8::try_from(self.delimiter).unwrap_or(defaults.delimiter),
            quote: u8::try_from(self.quote).unwrap_or(defaults.quote),
            quoting: self.quoting,
            columns: self.columns.clone(),
        }
    }

    fn site_markup(&self) -> SiteMarkup {
        SiteMarkup {
            page_scheme: self.page_scheme.clone(),
            max_pages: self.max_pages,
            ..SiteMarkup::default()
        }
    }

    fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
            ..FetchSettings::default()
        }
    }

    fn error_policy(&self) -> ErrorPolicy {
        if self.skip_malformed {
            ErrorPolicy::SkipMalformed
        } else {
            ErrorPolicy::Abort
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_csv_char("delimiter", self.delimiter)?;
        validate_csv_char("quote", self.quote)?;
        validate_export_settings(self)
    }
}
