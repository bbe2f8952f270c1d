//! 错误类型
//!
//! 请求链路上的三类错误：参数校验、上游抓取、页面解析。
//! 每类错误映射到不同的 HTTP 状态码，响应体统一为 `ApiResponse` 错误格式。

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ApiResponse;

/// 上游抓取错误
#[derive(Error, Debug)]
pub enum FetchError {
    /// 超过配置的请求超时
    #[error("upstream request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// 上游返回非 2xx 状态码
    #[error("upstream returned {status} {reason}")]
    Status { status: u16, reason: String },

    /// 连接失败或读取响应体失败
    #[error("upstream request failed: {0}")]
    Network(String),

    /// 基础地址无法拼接股票代码
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),
}

/// 页面解析错误
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("symbol not found or page structure changed: {symbol}")]
    PriceNotFound { symbol: String },
}

/// 请求级错误
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl ResponseError for QuoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            QuoteError::Validation(_) => StatusCode::BAD_REQUEST,
            QuoteError::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            QuoteError::Fetch(FetchError::Status { .. } | FetchError::Network(_)) => {
                StatusCode::BAD_GATEWAY
            }
            QuoteError::Fetch(FetchError::InvalidUrl(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            QuoteError::Extraction(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}
