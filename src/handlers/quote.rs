//! 行情接口处理器
//!
//! - GET / - 接口说明
//! - GET /quote?symbol=AAPL - 获取单只证券行情

use actix_web::{web, HttpResponse, Result};

use crate::error::QuoteError;
use crate::models::{QuoteQuery, UsageInfo};
use crate::services::quote::{self, QuoteFetcher};

/// 接口说明
pub async fn usage() -> HttpResponse {
    HttpResponse::Ok().json(UsageInfo::new())
}

/// 获取单只证券行情
///
/// GET /quote?symbol=AAPL
pub async fn get_quote(
    fetcher: web::Data<QuoteFetcher>,
    query: web::Query<QuoteQuery>,
) -> Result<HttpResponse, QuoteError> {
    let symbol = query
        .normalized_symbol()
        .ok_or_else(|| QuoteError::Validation("symbol query parameter is required".to_string()))?;

    match quote::get_quote(&fetcher, &symbol).await {
        Ok(quote) => Ok(HttpResponse::Ok().json(quote)),
        Err(e) => {
            log::warn!("获取 {} 行情失败: {}", symbol, e);
            Err(e)
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(usage))
        .route("/quote", web::get().to(get_quote));
}
