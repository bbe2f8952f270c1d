//! 测试用的行情页面样本和本地上游服务

use std::time::Duration;

use actix_web::{web, App, HttpResponse, HttpServer};

use crate::config::UpstreamConfig;

/// 个股页面：只有涨跌幅，没有市值
pub const AAPL_PAGE: &str = r#"<!doctype html>
<html lang="en"><head><title>Apple Inc (AAPL) Stock Price &amp; News - Google Finance</title></head>
<body>
<div class="ticker-strip"><div class="YMlKec">43,010.55</div></div>
<main>
  <div class="zzDege">Apple Inc</div>
  <div class="AHmHk">
    <span><div class="YMlKec fxKbKc">$202.92</div></span>
  </div>
  <div class="enJeMd">
    <span class="NydbP VOXKNe tnNPld" aria-label="Down by 1.59%"><div class="JwB6zf">-1.59%</div></span>
  </div>
  <div class="gyFHrc"><span><div class="mfs7Fc">Previous close</div></span><div class="P6K39c">$206.15</div></div>
  <div class="gyFHrc"><span><div class="mfs7Fc">Day range</div></span><div class="P6K39c">$201.70 - $205.70</div></div>
</main>
</body></html>"#;

/// 个股页面：带 data-last-price 属性、"涨跌额 (涨跌幅)" 格式和市值
pub const MSFT_PAGE: &str = r#"<!doctype html>
<html lang="en"><body>
<main>
  <div data-entity-type="0" data-last-price="415.5" data-exchange="NASDAQ">
    <div class="YMlKec fxKbKc">$415.50</div>
  </div>
  <span class="NydbP">+5.25 (+1.28%)</span>
  <div class="gyFHrc"><span><div class="mfs7Fc">Market cap</div></span><div class="P6K39c">3.09T USD</div></div>
</main>
</body></html>"#;

/// 指数页面：点位超过个股区间，且带有类似市值的数字
pub const INDEX_PAGE: &str = r#"<!doctype html>
<html lang="en"><body>
<main>
  <div data-entity-type="1" data-exchange="INDEXSP">
    <div class="YMlKec fxKbKc">5,967.84</div>
  </div>
  <span class="NydbP" aria-label="Up by 0.55%"><div class="JwB6zf">0.55%</div></span>
  <div class="gyFHrc"><span><div class="mfs7Fc">Market cap</div></span><div class="P6K39c">49.80T USD</div></div>
</main>
</body></html>"#;

/// 代码不存在时上游返回的页面
pub const NOT_FOUND_PAGE: &str = r#"<!doctype html>
<html lang="en"><body>
<main>
  <div class="b4EnYd">We couldn't find any match for your search.</div>
  <div class="ibrbqd">Try searching for a ticker such as AAPL or GOOGL.</div>
</main>
</body></html>"#;

/// 慢响应的延迟，需大于 `upstream_config` 的超时
const SLOW_DELAY: Duration = Duration::from_secs(3);

async fn upstream_page(path: web::Path<String>) -> HttpResponse {
    let page = match path.as_str() {
        "AAPL" => AAPL_PAGE,
        "MSFT" => MSFT_PAGE,
        ".INX:INDEXSP" => INDEX_PAGE,
        "DOWN" => return HttpResponse::ServiceUnavailable().finish(),
        "SLOW" => {
            tokio::time::sleep(SLOW_DELAY).await;
            AAPL_PAGE
        }
        _ => NOT_FOUND_PAGE,
    };

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page)
}

/// 启动本地上游服务，返回其基础地址
pub async fn spawn_upstream() -> String {
    let server = HttpServer::new(|| App::new().route("/quote/{symbol}", web::get().to(upstream_page)))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind upstream");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    format!("http://{}", addr)
}

/// 指向本地上游的配置，超时 1 秒
pub fn upstream_config(upstream: &str) -> UpstreamConfig {
    UpstreamConfig {
        base_url: format!("{}/quote", upstream),
        timeout_secs: 1,
        connect_timeout_secs: 1,
        ..UpstreamConfig::default()
    }
}
