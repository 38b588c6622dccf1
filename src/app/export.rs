use crate::app::pipelines::price_pipeline::PricePipeline;
use crate::config::cli::LocalStorage;
use crate::config::ExportConfig;
use crate::core::etl::EtlEngine;
use crate::domain::model::CsvOptions;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

/// 抓取 `base_url` 的所有結果頁並把價格寫到 `destination_path`，回傳寫出的列數。
///
/// 使用預設的網站標記與抓取設定；任何階段失敗時不會寫出檔案。
pub async fn export_prices(
    base_url: &str,
    destination_path: impl AsRef<Path>,
    csv_options: CsvOptions,
) -> Result<usize> {
    let destination = destination_path.as_ref().to_string_lossy().into_owned();
    let config = ExportConfig::new(base_url, destination, csv_options);

    export_with_config(config).await
}

pub async fn export_with_config(config: ExportConfig) -> Result<usize> {
    config.validate()?;

    let pipeline = PricePipeline::new(LocalStorage::default(), config)?;
    let summary = EtlEngine::new(pipeline).run().await?;

    Ok(summary.rows_written)
}
