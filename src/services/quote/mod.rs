//! 行情服务模块
//!
//! 抓取行情页面并解析为 `QuoteResult`

pub mod extractor;
pub mod fetcher;
pub mod selectors;

pub use extractor::extract_quote;
pub use fetcher::QuoteFetcher;

use crate::error::QuoteError;
use crate::models::QuoteResult;

/// 获取单只证券行情：先抓取页面，再解析
pub async fn get_quote(fetcher: &QuoteFetcher, symbol: &str) -> Result<QuoteResult, QuoteError> {
    let html = fetcher.fetch(symbol).await?;
    Ok(extract_quote(symbol, &html)?)
}
