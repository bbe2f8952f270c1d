//! 行情页面抓取
//!
//! 对接 https://www.google.com/finance/quote/<symbol>?hl=en

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::FetchError;

/// 行情页面抓取器
///
/// 进程内共享一个 `Client`，连接池由 reqwest 管理；每次请求只尝试一次
pub struct QuoteFetcher {
    /// HTTP 客户端
    client: Client,
    /// 行情页面基础地址
    base_url: Url,
    /// 页面语言
    language: String,
    /// 请求超时（秒），用于错误信息
    timeout_secs: u64,
}

impl QuoteFetcher {
    /// 根据配置创建抓取器
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| anyhow!("上游地址无效 {}: {}", config.base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("上游地址无法追加路径: {}", config.base_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url,
            language: config.language.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// 拼接行情页面地址，代码作为单独一段路径编码
    pub fn quote_url(&self, symbol: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut().append_pair("hl", &self.language);
        Ok(url)
    }

    /// 获取行情页面 HTML
    pub async fn fetch(&self, symbol: &str) -> Result<String, FetchError> {
        let url = self.quote_url(symbol)?;
        log::info!("📡 请求行情页面 URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        log::debug!("行情页面响应状态: {}", status);
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout { secs: self.timeout_secs }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_upstream, upstream_config, AAPL_PAGE};

    #[test]
    fn test_quote_url() {
        let fetcher = QuoteFetcher::new(&UpstreamConfig::default()).unwrap();

        assert_eq!(
            fetcher.quote_url("AAPL").unwrap().as_str(),
            "https://www.google.com/finance/quote/AAPL?hl=en"
        );
        assert_eq!(
            fetcher.quote_url(".INX:INDEXSP").unwrap().as_str(),
            "https://www.google.com/finance/quote/.INX:INDEXSP?hl=en"
        );
        // 路径分隔符和空格需要编码，不能改变目标路径
        assert_eq!(
            fetcher.quote_url("A/B C").unwrap().as_str(),
            "https://www.google.com/finance/quote/A%2FB%20C?hl=en"
        );
    }

    #[test]
    fn test_trailing_slash_base() {
        let config = UpstreamConfig {
            base_url: "http://127.0.0.1:9/quote/".to_string(),
            language: "de".to_string(),
            ..UpstreamConfig::default()
        };
        let fetcher = QuoteFetcher::new(&config).unwrap();

        assert_eq!(
            fetcher.quote_url("SAP").unwrap().as_str(),
            "http://127.0.0.1:9/quote/SAP?hl=de"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        for base_url in ["not a url", "mailto:quotes@example.com"] {
            let config = UpstreamConfig {
                base_url: base_url.to_string(),
                ..UpstreamConfig::default()
            };
            assert!(QuoteFetcher::new(&config).is_err(), "{}", base_url);
        }
    }

    #[actix_web::test]
    async fn test_fetch_page() {
        let upstream = spawn_upstream().await;
        let fetcher = QuoteFetcher::new(&upstream_config(&upstream)).unwrap();

        let html = fetcher.fetch("AAPL").await.unwrap();
        assert_eq!(html, AAPL_PAGE);
    }

    #[actix_web::test]
    async fn test_fetch_upstream_status() {
        let upstream = spawn_upstream().await;
        let fetcher = QuoteFetcher::new(&upstream_config(&upstream)).unwrap();

        match fetcher.fetch("DOWN").await {
            Err(FetchError::Status { status, reason }) => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service Unavailable");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_fetch_timeout() {
        let upstream = spawn_upstream().await;
        let fetcher = QuoteFetcher::new(&upstream_config(&upstream)).unwrap();

        let started = std::time::Instant::now();
        let result = fetcher.fetch("SLOW").await;

        assert!(matches!(result, Err(FetchError::Timeout { secs: 1 })), "{:?}", result);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[actix_web::test]
    async fn test_fetch_connection_refused() {
        // 绑定后立即释放端口，连接会被拒绝
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let fetcher =
            QuoteFetcher::new(&upstream_config(&format!("http://127.0.0.1:{}", port))).unwrap();

        assert!(matches!(fetcher.fetch("AAPL").await, Err(FetchError::Network(_))));
    }
}
