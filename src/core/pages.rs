use crate::core::extractor::compile_selector;
use crate::domain::markup::{PageScheme, SiteMarkup};
use crate::domain::ports::Fetcher;
use crate::utils::error::{Result, ScrapeError};
use scraper::{Html, Selector};
use url::Url;

#[derive(Debug, Clone)]
pub struct ProbedPages {
    /// 依頁碼排序，第一個一定是第 1 頁
    pub urls: Vec<String>,
    pub first_page_html: String,
}

/// 根據第一頁的分頁連結列出所有要抓的頁面網址
pub struct PageLocator {
    marker: Selector,
    marker_attribute: Option<String>,
    scheme: PageScheme,
    max_pages: usize,
}

impl PageLocator {
    pub fn new(markup: &SiteMarkup) -> Result<Self> {
        Ok(Self {
            marker: compile_selector(&markup.pagination)?,
            marker_attribute: markup.pagination_attribute.clone(),
            scheme: markup.page_scheme.clone(),
            max_pages: markup.max_pages,
        })
    }

    /// 抓第一頁並回傳 1..=最大頁碼 的網址；抓取失敗直接回傳錯誤
    pub async fn enumerate_pages<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        base_url: &str,
    ) -> Result<Vec<String>> {
        Ok(self.probe(fetcher, base_url).await?.urls)
    }

    /// 同 `enumerate_pages`，但保留第一頁的 HTML 讓呼叫端不必再抓一次
    pub async fn probe<F: Fetcher + ?Sized>(&self, fetcher: &F, base_url: &str) -> Result<ProbedPages> {
        let first_page = self.page_url(base_url, 1)?;
        let html = fetcher.fetch(&first_page).await?;

        Ok(ProbedPages {
            urls: self.page_urls(base_url, &html)?,
            first_page_html: html,
        })
    }

    pub fn page_urls(&self, base_url: &str, first_page_html: &str) -> Result<Vec<String>> {
        let max_page = self.max_page(first_page_html);
        tracing::debug!("Detected {} result page(s) for {}", max_page, base_url);

        if max_page > self.max_pages {
            return Err(ScrapeError::PageLimitError {
                base_url: base_url.to_string(),
                found: max_page,
                limit: self.max_pages,
            });
        }

        (1..=max_page)
            .map(|index| self.page_url(base_url, index))
            .collect()
    }

    /// 分頁標記中的最大數字；找不到、無法解析或為 0 時視為 1 頁
    pub fn max_page(&self, html: &str) -> usize {
        let document = Html::parse_document(html);

        document
            .select(&self.marker)
            .filter_map(|el| {
                let raw = match &self.marker_attribute {
                    Some(attribute) => el.value().attr(attribute)?.to_string(),
                    None => el.text().collect::<String>(),
                };
                let raw = raw.trim();
                if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                // 超出 usize 的頁碼交給 max_pages 檢查
                Some(raw.parse::<usize>().unwrap_or(usize::MAX))
            })
            .max()
            .unwrap_or(1)
            .max(1)
    }

    pub fn page_url(&self, base_url: &str, index: usize) -> Result<String> {
        let mut url = Url::parse(base_url).map_err(|e| ScrapeError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        match &self.scheme {
            PageScheme::Query { param } => {
                let kept: Vec<(String, String)> = url
                    .query_pairs()
                    .filter(|(key, _)| key.as_ref() != param.as_str())
                    .map(|(key, value)| (key.into_owned(), value.into_owned()))
                    .collect();

                url.query_pairs_mut()
                    .clear()
                    .extend_pairs(kept)
                    .append_pair(param, &index.to_string());
            }
            PageScheme::PathSuffix { prefix } => {
                url.path_segments_mut()
                    .map_err(|_| ScrapeError::InvalidConfigValueError {
                        field: "base_url".to_string(),
                        value: base_url.to_string(),
                        reason: "URL cannot carry a path".to_string(),
                    })?
                    .pop_if_empty()
                    .push(&format!("{}{}", prefix, index));
            }
        }

        Ok(url.to_string())
    }
}
