use crate::domain::markup::SiteMarkup;
use crate::domain::model::ListingFragment;
use crate::utils::error::{Result, ScrapeError};
use scraper::{Html, Selector};

/// 編譯 CSS 選擇器，失敗時回傳設定錯誤
pub fn compile_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::SelectorError {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// 從整頁 HTML 切出每一筆搜尋結果
pub struct Extractor {
    listing: Selector,
}

impl Extractor {
    pub fn new(markup: &SiteMarkup) -> Result<Self> {
        Ok(Self {
            listing: compile_selector(&markup.listing)?,
        })
    }

    /// 依文件順序回傳所有符合 listing 選擇器的元素。
    ///
    /// 沒有結果時回傳空的 Vec；壞掉的 HTML 會被盡量解析，不會失敗。
    pub fn extract_fragments(&self, html: &str, page_url: &str) -> Vec<ListingFragment> {
        let document = Html::parse_document(html);

        document
            .select(&self.listing)
            .enumerate()
            .map(|(index, element)| ListingFragment {
                html: element.html(),
                page_url: page_url.to_string(),
                position: index + 1,
            })
            .collect()
    }
}
