//! 行情数据模型

use serde::{Deserialize, Serialize};

/// 单只证券的行情结果
///
/// 每次请求临时生成，响应后即丢弃
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuoteResult {
    /// 证券代码（大写）
    pub symbol: String,
    /// 最新价
    pub price: f64,
    /// 涨跌额，带符号两位小数，如 "-3.23"
    pub abs_change: Option<String>,
    /// 涨跌幅，带符号和百分号，如 "-1.59%"
    pub pct_change: Option<String>,
    /// 市值，保留页面原文；指数页面固定为 None
    pub market_cap: Option<String>,
}

/// 行情查询参数
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    /// 证券代码
    pub symbol: Option<String>,
}

impl QuoteQuery {
    /// 去除空白并转为大写，空值返回 None
    pub fn normalized_symbol(&self) -> Option<String> {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
    }
}

/// 根路径返回的接口说明
#[derive(Debug, Serialize)]
pub struct UsageInfo {
    pub message: &'static str,
    pub usage: &'static str,
    pub example: &'static str,
}

impl UsageInfo {
    pub const fn new() -> Self {
        Self {
            message: "Stock Price Scraper API",
            usage: "GET /quote?symbol=AAPL to get stock quote",
            example: "/quote?symbol=GOOGL",
        }
    }
}
