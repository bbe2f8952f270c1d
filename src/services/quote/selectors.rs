//! 行情页面选择器表
//!
//! 每张表按优先级排列，取第一个命中的探针；后面的条目用于兼容不同语言或改版后的页面。
//! 新增页面变体只需要在表里加一行。

use std::ops::RangeInclusive;

use scraper::{ElementRef, Html, Selector};

/// 个股页面上合理的价格区间，超出的文本候选通常是混入页面的指数点位
pub const PLAUSIBLE_PRICE: RangeInclusive<f64> = 1.0..=1000.0;

/// 市值行的标签文本
pub const MARKET_CAP_LABELS: &[&str] = &["Market cap", "Mkt cap"];

/// 市值行内的数值节点
pub const MARKET_CAP_VALUE: &str = "div.P6K39c";

/// 价格探针
#[derive(Debug, Clone, Copy)]
pub enum PriceProbe {
    /// 读取第一个匹配元素的属性
    Attribute { selector: &'static str, attr: &'static str },
    /// 依次读取匹配元素的文本
    Text(&'static str),
}

pub const PRICE_PROBES: &[PriceProbe] = &[
    PriceProbe::Attribute { selector: r#"div[data-entity-type="0"]"#, attr: "data-last-price" },
    PriceProbe::Attribute { selector: "div[data-last-price]", attr: "data-last-price" },
    PriceProbe::Text("main div.YMlKec.fxKbKc"),
    PriceProbe::Text("div.AHmHk div.YMlKec.fxKbKc"),
    PriceProbe::Text("div.YMlKec.fxKbKc"),
    PriceProbe::Text("main div.YMlKec"),
    PriceProbe::Text("div.YMlKec"),
    PriceProbe::Text("span.YMlKec"),
    PriceProbe::Text(".YMlKec"),
    PriceProbe::Text("div[data-last-price]"),
    PriceProbe::Text("span[data-last-price]"),
    PriceProbe::Text("div[data-price]"),
    PriceProbe::Text("span[data-price]"),
    PriceProbe::Text("div[data-value]"),
    PriceProbe::Text("span[data-value]"),
    PriceProbe::Text(".price"),
    PriceProbe::Text("[data-price]"),
    PriceProbe::Text("div[class*='price']"),
    PriceProbe::Text("span[class*='price']"),
    PriceProbe::Text("div[class*='value']"),
    PriceProbe::Text("span[class*='value']"),
    PriceProbe::Text("div[class*='last']"),
    PriceProbe::Text("span[class*='last']"),
    PriceProbe::Text("div[class*='quote']"),
    PriceProbe::Text("span[class*='quote']"),
];

/// 涨跌幅区块，第一个存在的元素即为结果
pub const CHANGE_SELECTORS: &[&str] = &[
    "div.JwB6zf",
    "span.NydbP",
    "div[data-change]",
    "span[data-change]",
    ".change",
    "[data-change]",
    "div[class*='change']",
    "span[class*='change']",
    "div[class*='diff']",
    "span[class*='diff']",
];

/// 市值探针
#[derive(Debug, Clone, Copy)]
pub enum MarketCapProbe {
    /// 直接读取属性
    Attribute { selector: &'static str, attr: &'static str },
    /// 文本中含有市值标签的行
    LabelledRow(&'static str),
}

pub const MARKET_CAP_PROBES: &[MarketCapProbe] = &[
    MarketCapProbe::Attribute { selector: "[data-market-cap]", attr: "data-market-cap" },
    MarketCapProbe::LabelledRow("div.gyFHrc"),
    MarketCapProbe::LabelledRow("div.P6K39c"),
    MarketCapProbe::LabelledRow("div.KFglDc"),
    MarketCapProbe::LabelledRow(".market-cap"),
    MarketCapProbe::LabelledRow("div[class*='cap']"),
    MarketCapProbe::LabelledRow("span[class*='cap']"),
];

/// 指数/综合行情页面的标记
#[derive(Debug, Clone, Copy)]
pub enum IndexMarker {
    /// 代码前缀，如 `.INX:INDEXSP`
    SymbolPrefix(&'static str),
    /// 代码中的交易所段，如 `NDX:INDEXNASDAQ`
    SymbolContains(&'static str),
    /// 页面结构标记，只看行情主体容器，侧栏里的指数链接不算
    Markup(&'static str),
}

pub const INDEX_MARKERS: &[IndexMarker] = &[
    IndexMarker::SymbolPrefix("."),
    IndexMarker::SymbolContains(":INDEX"),
    IndexMarker::Markup(r#"[data-entity-type][data-exchange^="INDEX"]"#),
    IndexMarker::Markup(r#"[data-last-price][data-exchange^="INDEX"]"#),
];

/// 编译选择器，无效的选择器记录警告后跳过
pub fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::warn!("无效的选择器 {}: {:?}", css, e);
            None
        }
    }
}

/// 元素的全部文本
pub fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

/// 把页面上的价格文本转为数值
///
/// 去掉千分位、空白和货币符号，"−" 按负号处理
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '$' | '€' | '£' | '¥' | '₹'))
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl PriceProbe {
    pub fn selector(&self) -> &'static str {
        match self {
            PriceProbe::Attribute { selector, .. } | PriceProbe::Text(selector) => *selector,
        }
    }

    /// 尝试提取价格
    ///
    /// `plausible` 只约束文本候选；属性值来自页面数据，原样采用
    pub fn attempt(&self, document: &Html, plausible: Option<&RangeInclusive<f64>>) -> Option<f64> {
        let selector = compile(self.selector())?;

        match self {
            PriceProbe::Attribute { attr, .. } => document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr(attr))
                .and_then(parse_number),
            PriceProbe::Text(_) => document
                .select(&selector)
                .filter_map(|element| parse_number(&element_text(&element)))
                .find(|price| plausible.map_or(true, |range| range.contains(price))),
        }
    }
}

impl MarketCapProbe {
    pub fn selector(&self) -> &'static str {
        match self {
            MarketCapProbe::Attribute { selector, .. } | MarketCapProbe::LabelledRow(selector) => {
                *selector
            }
        }
    }

    pub fn attempt(&self, document: &Html) -> Option<String> {
        let selector = compile(self.selector())?;

        match self {
            MarketCapProbe::Attribute { attr, .. } => document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr(attr))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            MarketCapProbe::LabelledRow(_) => {
                let value_selector = compile(MARKET_CAP_VALUE)?;
                document.select(&selector).find_map(|row| {
                    let text = element_text(&row);
                    let label = MARKET_CAP_LABELS.iter().find(|label| text.contains(*label))?;

                    let value = match row.select(&value_selector).next() {
                        Some(value) => element_text(&value),
                        None => text.split_once(label).map(|(_, rest)| rest.to_string())?,
                    };
                    let value = value.trim().trim_start_matches(':').trim();
                    (!value.is_empty()).then(|| value.to_string())
                })
            }
        }
    }
}

impl IndexMarker {
    pub fn matches(&self, symbol: &str, document: &Html) -> bool {
        match self {
            IndexMarker::SymbolPrefix(prefix) => symbol.starts_with(prefix),
            IndexMarker::SymbolContains(needle) => symbol.contains(needle),
            IndexMarker::Markup(css) => compile(css)
                .map(|selector| document.select(&selector).next().is_some())
                .unwrap_or(false),
        }
    }
}
