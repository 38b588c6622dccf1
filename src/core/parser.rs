use crate::core::cleaner::{clean_address, clean_price};
use crate::core::extractor::compile_selector;
use crate::domain::markup::SiteMarkup;
use crate::domain::model::{ListingFragment, Price, PriceFormat, PriceRow};
use crate::utils::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// 把一筆搜尋結果片段解析成 `PriceRow`
pub struct ListingParser {
    address: Selector,
    price: Selector,
    link: Option<Selector>,
    price_format: PriceFormat,
}

impl ListingParser {
    pub fn new(markup: &SiteMarkup) -> Result<Self> {
        Ok(Self {
            address: compile_selector(&markup.address)?,
            price: compile_selector(&markup.price)?,
            link: markup.link.as_deref().map(compile_selector).transpose()?,
            price_format: markup.price_format,
        })
    }

    /// 地址是必要欄位，價格與連結可以沒有
    pub fn parse(&self, fragment: &ListingFragment) -> Result<PriceRow> {
        let html = fragment_document(&fragment.html);
        self.parse_element(html.root_element(), &fragment.page_url, fragment.position)
    }

    /// 直接在頁面文件中的元素上解析，不需要先轉成字串
    pub fn parse_element(
        &self,
        element: ElementRef<'_>,
        page_url: &str,
        position: usize,
    ) -> Result<PriceRow> {
        Ok(PriceRow {
            address: self.address_from(element, page_url, position)?,
            price: self.price_from(element),
            url: self.link_from(element, page_url),
        })
    }

    pub fn parse_address(&self, fragment: &ListingFragment) -> Result<String> {
        let html = fragment_document(&fragment.html);
        self.address_from(html.root_element(), &fragment.page_url, fragment.position)
    }

    pub fn parse_price(&self, fragment: &ListingFragment) -> Option<Price> {
        let html = fragment_document(&fragment.html);
        self.price_from(html.root_element())
    }

    fn address_from(
        &self,
        element: ElementRef<'_>,
        page_url: &str,
        position: usize,
    ) -> Result<String> {
        let address = element
            .select(&self.address)
            .next()
            .map(|el| clean_address(&el.text().collect::<String>()))
            .filter(|address| !address.is_empty());

        address.ok_or_else(|| ScrapeError::FieldNotFoundError {
            field: "address".to_string(),
            page_url: page_url.to_string(),
            position,
        })
    }

    fn price_from(&self, element: ElementRef<'_>) -> Option<Price> {
        let raw = element.select(&self.price).next()?.text().collect::<String>();
        Price::parse(&clean_price(&raw, self.price_format), self.price_format)
    }

    fn link_from(&self, element: ElementRef<'_>, page_url: &str) -> Option<String> {
        let href = element.select(self.link.as_ref()?).next()?.value().attr("href")?;

        // 相對連結以來源頁面為基準
        let resolved = match Url::parse(page_url) {
            Ok(base) => base.join(href.trim()),
            Err(_) => Url::parse(href.trim()),
        };

        resolved.ok().map(String::from)
    }
}

/// 片段預設放在 `<body>` 中解析；表格元素在那裡會被 HTML5 規則丟掉，
/// 所以依根元素補回所需的表格外層
fn fragment_document(html: &str) -> Html {
    let (open, close) = match root_tag(html).as_deref() {
        Some("tr") => ("<table><tbody>", "</tbody></table>"),
        Some("td" | "th") => ("<table><tbody><tr>", "</tr></tbody></table>"),
        Some("tbody" | "thead" | "tfoot" | "caption" | "colgroup") => ("<table>", "</table>"),
        Some("col") => ("<table><colgroup>", "</colgroup></table>"),
        _ => return Html::parse_fragment(html),
    };

    Html::parse_fragment(&format!("{}{}{}", open, html, close))
}

fn root_tag(html: &str) -> Option<String> {
    let rest = html.trim_start().strip_prefix('<')?;
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();

    (!name.is_empty()).then(|| name.to_ascii_lowercase())
}
