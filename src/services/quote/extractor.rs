//! 行情页面解析
//!
//! 按 `selectors` 中的顺序依次尝试，第一个命中的探针决定结果。
//! 页面通常只给出涨跌幅，涨跌额由价格和涨跌幅推算。

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::selectors::{
    compile, element_text, CHANGE_SELECTORS, INDEX_MARKERS, MARKET_CAP_PROBES, PLAUSIBLE_PRICE,
    PRICE_PROBES,
};
use crate::error::ExtractionError;
use crate::models::QuoteResult;

/// 传统格式 "+1.50 (+0.74%)"
static COMBINED_CHANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([+\-]?\d[\d.,]*)\s*\(\s*([+\-]?\d[\d.,]*)\s*%?\s*\)").expect("valid regex")
});

/// 仅涨跌幅 "-1.59%"
static PERCENT_CHANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([+\-]?\d[\d.,]*)\s*%").expect("valid regex"));

/// 带方向说明的节点
static ARIA_LABELLED: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[aria-label]").expect("valid selector"));

/// 解析行情页面
pub fn extract_quote(symbol: &str, html: &str) -> Result<QuoteResult, ExtractionError> {
    let document = Html::parse_document(html);

    let is_index = is_index_page(symbol, &document);
    let price = find_price(&document, is_index).ok_or_else(|| ExtractionError::PriceNotFound {
        symbol: symbol.to_string(),
    })?;
    let (abs_change, pct_change) = find_change(&document, price);

    // 指数没有市值，页面上即使有类似数字也不输出
    let market_cap = if is_index { None } else { find_market_cap(&document) };

    Ok(QuoteResult {
        symbol: symbol.to_string(),
        price,
        abs_change,
        pct_change,
        market_cap,
    })
}

/// 判断是否为指数/综合行情页面
pub fn is_index_page(symbol: &str, document: &Html) -> bool {
    INDEX_MARKERS.iter().any(|marker| {
        let hit = marker.matches(symbol, document);
        if hit {
            log::debug!("{} 识别为指数页面: {:?}", symbol, marker);
        }
        hit
    })
}

fn find_price(document: &Html, is_index: bool) -> Option<f64> {
    let plausible = (!is_index).then_some(&PLAUSIBLE_PRICE);

    PRICE_PROBES.iter().find_map(|probe| {
        let price = probe.attempt(document, plausible)?;
        log::debug!("价格命中 {:?}: {}", probe, price);
        Some(price)
    })
}

fn find_market_cap(document: &Html) -> Option<String> {
    MARKET_CAP_PROBES.iter().find_map(|probe| {
        let value = probe.attempt(document)?;
        log::debug!("市值命中 {:?}: {}", probe, value);
        Some(value)
    })
}

/// 返回 (涨跌额, 涨跌幅)
fn find_change(document: &Html, price: f64) -> (Option<String>, Option<String>) {
    for css in CHANGE_SELECTORS {
        let Some(selector) = compile(css) else {
            continue;
        };
        if let Some(block) = document.select(&selector).next() {
            log::debug!("涨跌区块命中 {}: {:?}", css, element_text(&block).trim());
            return parse_change(&block, price);
        }
    }
    (None, None)
}

fn parse_change(block: &ElementRef, price: f64) -> (Option<String>, Option<String>) {
    let text = element_text(block).replace('\u{2212}', "-").replace(',', "");
    let sign = direction_hint(block);

    if let Some(caps) = COMBINED_CHANGE.captures(&text) {
        let pct_change = format!("{}%", with_sign(&caps[2], sign));
        // 涨跌额没有符号时跟随涨跌幅
        let pct_sign = if pct_change.starts_with('-') { '-' } else { '+' };
        let abs_change = with_sign(&caps[1], pct_sign)
            .parse::<f64>()
            .ok()
            .map(|value| format!("{:+.2}", value))
            .or_else(|| synthesize_abs_change(price, &pct_change));
        return (abs_change, Some(pct_change));
    }

    if let Some(caps) = PERCENT_CHANGE.captures(&text) {
        let pct_change = format!("{}%", with_sign(&caps[1], sign));
        return (synthesize_abs_change(price, &pct_change), Some(pct_change));
    }

    (None, None)
}

/// 没有符号时，从 aria-label（"Down by 1.59%" / "Up by ..."）判断方向，默认为正
fn direction_hint(block: &ElementRef) -> char {
    std::iter::once(*block)
        .chain(block.ancestors().filter_map(ElementRef::wrap).take(2))
        .chain(block.select(&ARIA_LABELLED))
        .filter_map(|element| element.value().attr("aria-label"))
        .find_map(|label| {
            let label = label.trim_start();
            if label.starts_with("Down") {
                Some('-')
            } else if label.starts_with("Up") {
                Some('+')
            } else {
                None
            }
        })
        .unwrap_or('+')
}

fn with_sign(number: &str, sign: char) -> String {
    if number.starts_with(|c: char| c == '+' || c == '-') {
        number.to_string()
    } else {
        format!("{}{}", sign, number)
    }
}

/// 涨跌额 = 价格 × 涨跌幅 / 100，保留两位小数，符号与涨跌幅一致
pub fn synthesize_abs_change(price: f64, pct_change: &str) -> Option<String> {
    let pct = pct_change.trim().trim_end_matches('%').parse::<f64>().ok()?;
    let value = (price * pct / 100.0 * 100.0).round() / 100.0;
    let sign = if pct.is_sign_negative() { '-' } else { '+' };
    Some(format!("{}{:.2}", sign, value.abs()))
}
