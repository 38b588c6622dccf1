use crate::domain::markup::SiteMarkup;
use crate::domain::model::{CsvOptions, ErrorPolicy, ExtractResult, ListingFragment, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub trait Storage: Send + Sync {
    /// 建立或覆寫檔案
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// HTTP 請求設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub headers: BTreeMap<String, String>,
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn destination_path(&self) -> &str;
    fn csv_options(&self) -> CsvOptions;
    fn site_markup(&self) -> SiteMarkup;
    fn fetch_settings(&self) -> FetchSettings;
    fn error_policy(&self) -> ErrorPolicy;
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 取得網址的 HTML；只有 200 OK 算成功
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, fragments: Vec<ListingFragment>) -> Result<TransformResult>;
    /// 寫出結果並回傳輸出路徑
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
