//! 行情抓取服务
//!
//! 抓取 Google Finance 行情页面，解析价格和涨跌幅后以 JSON 返回

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

#[cfg(test)]
mod test_support;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::io;

use crate::config::AppConfig;
use crate::services::quote::QuoteFetcher;

/// 应用程序入口
///
/// 启动 HTTP 服务器，默认监听 0.0.0.0:8002
#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = AppConfig::load()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match &config.source {
        Some(path) => log::info!("从 {} 加载配置成功", path),
        None => log::info!("使用默认配置"),
    }

    let fetcher = QuoteFetcher::new(&config.upstream)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let fetcher = web::Data::new(fetcher);

    log::info!(
        "启动行情抓取服务，监听 {}，上游 {}",
        config.bind_addr(),
        config.upstream.base_url
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(fetcher.clone())
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(config.bind_addr())?.run().await
}
