//! 目標網站的 HTML 標記約定。
//!
//! 所有與網站版面相關的假設 (CSS 選擇器、分頁屬性、頁面網址格式) 都集中在這裡，
//! 由 `Extractor`、`ListingParser` 與 `PageLocator` 使用。網站改版時只需要換一份
//! `SiteMarkup` 並更新 `version`。

use crate::domain::model::PriceFormat;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_MARKUP_VERSION: &str = "funda-search-v1";
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// 頁碼如何加到搜尋網址上
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageScheme {
    /// `base?page=N`
    Query { param: String },
    /// `base/pN`
    PathSuffix { prefix: String },
}

impl Default for PageScheme {
    fn default() -> Self {
        Self::Query {
            param: "page".to_string(),
        }
    }
}

impl FromStr for PageScheme {
    type Err = String;

    /// 接受 `query`、`query:NAME`、`path`、`path:PREFIX`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };

        match kind {
            "query" => Ok(Self::Query {
                param: arg.unwrap_or("page").to_string(),
            }),
            "path" => Ok(Self::PathSuffix {
                prefix: arg.unwrap_or("p").to_string(),
            }),
            other => Err(format!("unknown page scheme '{}' (expected query or path)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMarkup {
    pub version: String,
    /// 每筆搜尋結果的容器
    pub listing: String,
    pub address: String,
    pub price: String,
    /// 物件詳細頁連結，不設定就不輸出網址
    pub link: Option<String>,
    /// 分頁連結
    pub pagination: String,
    /// 頁碼所在屬性；未設定時讀取元素文字
    pub pagination_attribute: Option<String>,
    pub page_scheme: PageScheme,
    pub price_format: PriceFormat,
    /// 分頁標記的頁數超過此值時中止，避免異常標記產生無上限的網址
    pub max_pages: usize,
}

impl Default for SiteMarkup {
    fn default() -> Self {
        Self {
            version: DEFAULT_MARKUP_VERSION.to_string(),
            listing: "li.search-result".to_string(),
            address: "h2.search-result__header-title".to_string(),
            price: "span.search-result-price".to_string(),
            link: Some("a[href]".to_string()),
            pagination: "a[data-pagination-page]".to_string(),
            pagination_attribute: Some("data-pagination-page".to_string()),
            page_scheme: PageScheme::default(),
            price_format: PriceFormat::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}
