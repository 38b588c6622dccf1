use crate::core::csv_export::to_csv_bytes;
use crate::core::extractor::Extractor;
use crate::core::fetcher::HttpFetcher;
use crate::core::pages::PageLocator;
use crate::core::parser::ListingParser;
use crate::core::{
    ConfigProvider, ExtractResult, Fetcher, ListingFragment, Pipeline, Storage, TransformResult,
};
use crate::domain::model::ErrorPolicy;
use crate::utils::error::Result;

/// 抓取搜尋結果頁 → 切出物件 → 解析價格 → 寫出 CSV
pub struct PricePipeline<S: Storage, C: ConfigProvider, F: Fetcher = HttpFetcher> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) fetcher: F,
    locator: PageLocator,
    extractor: Extractor,
    parser: ListingParser,
}

impl<S: Storage, C: ConfigProvider> PricePipeline<S, C, HttpFetcher> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch_settings())?;
        Self::with_fetcher(storage, config, fetcher)
    }
}

impl<S: Storage, C: ConfigProvider, F: Fetcher> PricePipeline<S, C, F> {
    pub fn with_fetcher(storage: S, config: C, fetcher: F) -> Result<Self> {
        let markup = config.site_markup();
        tracing::debug!("Using site markup '{}'", markup.version);

        Ok(Self {
            locator: PageLocator::new(&markup)?,
            extractor: Extractor::new(&markup)?,
            parser: ListingParser::new(&markup)?,
            storage,
            config,
            fetcher,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: Fetcher> Pipeline for PricePipeline<S, C, F> {
    async fn extract(&self) -> Result<ExtractResult> {
        let base_url = self.config.base_url();
        tracing::info!("🔎 Probing {} for result pages", base_url);

        let probed = self.locator.probe(&self.fetcher, base_url).await?;
        tracing::info!("📄 Found {} result page(s)", probed.urls.len());

        // 第一頁已經在探測時抓過，直接沿用
        let mut pending_first = Some(probed.first_page_html);
        let mut fragments = Vec::new();

        for url in &probed.urls {
            let html = match pending_first.take() {
                Some(html) => html,
                None => self.fetcher.fetch(url).await?,
            };

            let page_fragments = self.extractor.extract_fragments(&html, url);
            tracing::debug!("{} listing(s) on {}", page_fragments.len(), url);
            fragments.extend(page_fragments);
        }

        Ok(ExtractResult {
            pages_visited: probed.urls.len(),
            fragments,
        })
    }

    async fn transform(&self, fragments: Vec<ListingFragment>) -> Result<TransformResult> {
        let policy = self.config.error_policy();
        let mut rows = Vec::with_capacity(fragments.len());
        let mut skipped = 0;

        for fragment in &fragments {
            match self.parser.parse(fragment) {
                Ok(row) => rows.push(row),
                Err(e) if policy == ErrorPolicy::SkipMalformed => {
                    tracing::warn!("⚠️ Skipping listing: {}", e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(TransformResult { rows, skipped })
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let destination = self.config.destination_path();
        let data = to_csv_bytes(&result.rows, &self.config.csv_options())?;

        tracing::debug!(
            "Writing {} row(s) ({} bytes) to {}",
            result.rows.len(),
            data.len(),
            destination
        );
        self.storage.write_file(destination, &data).await?;

        Ok(destination.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use crate::domain::model::{CsvOptions, PriceRow};
    use crate::utils::error::ScrapeError;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn listing(address: &str, price: Option<&str>) -> String {
        let price = price
            .map(|p| format!(r#"<span class="search-result-price">{}</span>"#, p))
            .unwrap_or_default();
        format!(
            r#"<li class="search-result"><h2 class="search-result__header-title">{}</h2>{}</li>"#,
            address, price
        )
    }

    fn page(listings: &[String], last_page: usize) -> String {
        let pagination: String = (1..=last_page)
            .map(|p| format!(r#"<a data-pagination-page="{p}">{p}</a>"#))
            .collect();
        format!(
            "<html><body><ol>{}</ol><nav>{}</nav></body></html>",
            listings.concat(),
            pagination
        )
    }

    fn pipeline(server: &MockServer) -> PricePipeline<MockStorage, ExportConfig> {
        let config = ExportConfig::new(server.url("/koop"), "prices.csv", CsvOptions::default());
        PricePipeline::new(MockStorage::new(), config).unwrap()
    }

    #[tokio::test]
    async fn test_extract_visits_every_page_once() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET).path("/koop").query_param("page", "1");
            then.status(200).body(page(
                &[listing("Main St 1", Some("€ 250.000 k.k.")), listing("Side St 2", None)],
                2,
            ));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path("/koop").query_param("page", "2");
            then.status(200)
                .body(page(&[listing("End St 3", Some("€ 1.000.000"))], 2));
        });

        let result = pipeline(&server).extract().await.unwrap();

        first.assert_hits(1);
        second.assert_hits(1);
        assert_eq!(result.pages_visited, 2);
        assert_eq!(result.fragments.len(), 3);
        assert!(result.fragments[2].html.contains("End St 3"));
        assert!(result.fragments[2].page_url.ends_with("page=2"));
    }

    #[tokio::test]
    async fn test_extract_page_without_listings() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/koop").query_param("page", "1");
            then.status(200).body(page(&[], 0));
        });

        let result = pipeline(&server).extract().await.unwrap();

        assert_eq!(result.pages_visited, 1);
        assert!(result.fragments.is_empty());
    }

    #[tokio::test]
    async fn test_extract_aborts_on_failed_page() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/koop").query_param("page", "1");
            then.status(200).body(page(&[listing("Main St 1", None)], 3));
        });
        server.mock(|when, then| {
            when.method(GET).path("/koop").query_param("page", "2");
            then.status(500);
        });
        let third = server.mock(|when, then| {
            when.method(GET).path("/koop").query_param("page", "3");
            then.status(200).body(page(&[], 3));
        });

        let err = pipeline(&server).extract().await.unwrap_err();

        match err {
            ScrapeError::FetchError { url, .. } => assert!(url.ends_with("/koop?page=2")),
            other => panic!("expected FetchError, got {:?}", other),
        }
        third.assert_hits(0);
    }

    fn fragment(html: String, position: usize) -> ListingFragment {
        ListingFragment {
            html,
            page_url: "http://localhost/koop?page=1".to_string(),
            position,
        }
    }

    #[tokio::test]
    async fn test_transform_aborts_on_malformed_fragment_by_default() {
        let server = MockServer::start();
        let fragments = vec![
            fragment(listing("Main St 1", None), 1),
            fragment(r#"<li class="search-result"><p>no title</p></li>"#.to_string(), 2),
            fragment(listing("End St 3", None), 3),
        ];

        let err = pipeline(&server).transform(fragments).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::FieldNotFoundError { position: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_transform_skip_mode_keeps_order() {
        let server = MockServer::start();
        let config = ExportConfig::new(server.url("/koop"), "prices.csv", CsvOptions::default())
            .with_error_policy(ErrorPolicy::SkipMalformed);
        let pipeline = PricePipeline::new(MockStorage::new(), config).unwrap();

        let fragments = vec![
            fragment(listing("Main St 1", Some("€ 250.000 k.k.")), 1),
            fragment(r#"<li class="search-result"><p>no title</p></li>"#.to_string(), 2),
            fragment(listing("End St 3", Some("€ 1.000.000")), 3),
        ];

        let result = pipeline.transform(fragments).await.unwrap();

        assert_eq!(result.skipped, 1);
        let addresses: Vec<&str> = result.rows.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["Main St 1", "End St 3"]);
    }

    #[tokio::test]
    async fn test_load_writes_csv_to_destination() {
        let server = MockServer::start();
        let storage = MockStorage::new();
        let config = ExportConfig::new(server.url("/koop"), "out/prices.csv", CsvOptions::default());
        let pipeline = PricePipeline::new(storage.clone(), config).unwrap();

        let result = TransformResult {
            rows: vec![PriceRow {
                address: "Main St 1".to_string(),
                price: None,
                url: None,
            }],
            skipped: 0,
        };

        let destination = pipeline.load(&result).await.unwrap();
        assert_eq!(destination, "out/prices.csv");

        let data = storage.get_file("out/prices.csv").await.unwrap();
        let content = String::from_utf8(data).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec![
            r#""address","price""#,
            r#""Main St 1","""#,
        ]);
    }
}
