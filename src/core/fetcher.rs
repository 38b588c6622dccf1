use crate::domain::ports::{FetchSettings, Fetcher};
use crate::utils::error::{FetchFailure, Result, ScrapeError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// 以 reqwest 實作的 `Fetcher`；不重試、不快取
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &settings.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ScrapeError::InvalidConfigValueError {
                    field: "headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| ScrapeError::InvalidConfigValueError {
                    field: format!("headers.{}", name),
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| ScrapeError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn request_failure(err: &reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Connection(err.to_string())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::FetchError {
                url: url.to_string(),
                failure: request_failure(&e),
            })?;

        let status = response.status();
        tracing::debug!("Response status for {}: {}", url, status);

        if status != StatusCode::OK {
            return Err(ScrapeError::FetchError {
                url: url.to_string(),
                failure: FetchFailure::Status(status.as_u16()),
            });
        }

        response.text().await.map_err(|e| ScrapeError::FetchError {
            url: url.to_string(),
            failure: if e.is_timeout() {
                FetchFailure::Timeout
            } else {
                FetchFailure::Body(e.to_string())
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetchSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_returns_body() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/koop");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body("<html><body>ok</body></html>");
        });

        let body = fetcher().fetch(&server.url("/koop")).await.unwrap();

        page_mock.assert();
        assert_eq!(body, "<html><body>ok</body></html>");
    }

    #[tokio::test]
    async fn test_non_ok_status_is_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let url = server.url("/missing");
        match fetcher().fetch(&url).await {
            Err(ScrapeError::FetchError { url: failed, failure }) => {
                assert_eq!(failed, url);
                assert_eq!(failure, FetchFailure::Status(404));
            }
            other => panic!("expected FetchError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_only_200_counts_as_success() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/accepted");
            then.status(202).body("<html></html>");
        });

        let err = fetcher().fetch(&server.url("/accepted")).await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::FetchError {
                failure: FetchFailure::Status(202),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_configured_headers_are_sent() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/koop")
                .header("user-agent", "price-scraper-test")
                .header("accept-language", "nl-NL");
            then.status(200).body("<html></html>");
        });

        let mut settings = FetchSettings {
            user_agent: "price-scraper-test".to_string(),
            ..FetchSettings::default()
        };
        settings
            .headers
            .insert("Accept-Language".to_string(), "nl-NL".to_string());

        let fetcher = HttpFetcher::new(&settings).unwrap();
        fetcher.fetch(&server.url("/koop")).await.unwrap();

        page_mock.assert();
    }

    #[tokio::test]
    async fn test_connection_failure_is_fetch_error() {
        let err = fetcher().fetch("http://127.0.0.1:1/koop").await.unwrap_err();

        assert!(matches!(err, ScrapeError::FetchError { .. }));
        assert!(err.to_string().contains("http://127.0.0.1:1/koop"));
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let mut settings = FetchSettings::default();
        settings
            .headers
            .insert("bad header".to_string(), "x".to_string());

        assert!(matches!(
            HttpFetcher::new(&settings),
            Err(ScrapeError::InvalidConfigValueError { .. })
        ));
    }
}
