pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::export::{export_prices, export_with_config};
pub use app::pipelines::price_pipeline::PricePipeline;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, ExportConfig};
pub use core::etl::EtlEngine;
pub use domain::markup::{PageScheme, SiteMarkup};
pub use domain::model::{Column, CsvOptions, ErrorPolicy, ExportSummary, Price, PriceRow, Quoting};
pub use utils::error::{Result, ScrapeError};
