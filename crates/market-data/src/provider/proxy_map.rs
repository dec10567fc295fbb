//! Fund name → listed proxy mapping.
//!
//! Many open-end funds are feeder funds or QDII vehicles whose intraday
//! behavior tracks an exchange-listed ETF. When the official estimate is
//! flat or missing, the proxy's live change is the next best signal.
//! Matching is by name keyword; the longest matching keyword wins so
//! that e.g. "纳斯达克" beats "纳".

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    /// Keyword → proxy ETF code.
    static ref PROXY_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        // Precious metals & commodities
        m.insert("上海金", "518600");
        m.insert("黄金", "518880");
        m.insert("豆粕", "159985");
        m.insert("有色", "512400");
        m.insert("能源", "159930");
        // Cross-border & QDII
        m.insert("纳斯达克", "513100");
        m.insert("纳指", "513100");
        m.insert("标普500", "513500");
        m.insert("标普", "513500");
        m.insert("恒生科技", "513130");
        m.insert("恒生互联网", "513330");
        m.insert("中概互联", "513050");
        m.insert("恒生医疗", "513060");
        m.insert("日经", "513520");
        m.insert("东南亚", "513910");
        // Broad indices
        m.insert("沪深300", "510300");
        m.insert("中证500", "510500");
        m.insert("中证1000", "512100");
        m.insert("创业板", "159915");
        m.insert("创业板50", "159949");
        m.insert("科创50", "588000");
        m.insert("上证50", "510050");
        m.insert("A50", "560050");
        // Sectors
        m.insert("白酒", "512690");
        m.insert("食品饮料", "512690");
        m.insert("半导体", "512480");
        m.insert("芯片", "512480");
        m.insert("医疗", "512170");
        m.insert("医药", "512010");
        m.insert("光伏", "515790");
        m.insert("新能源车", "515030");
        m.insert("电池", "159755");
        m.insert("军工", "512660");
        m.insert("证券", "512880");
        m.insert("券商", "512880");
        m.insert("银行", "512800");
        m.insert("人工智能", "515070");
        m.insert("计算机", "512720");
        m.insert("游戏", "516010");
        m.insert("传媒", "512980");
        m.insert("红利", "515080");
        m.insert("煤炭", "515220");
        m.insert("地产", "512200");
        // Bonds (as a directional signal)
        m.insert("可转债", "511380");
        m.insert("短债", "511260");
        m.insert("国债", "511010");
        m
    };
}

/// Code prefixes of funds that trade on an exchange themselves and can
/// therefore act as their own proxy.
const LISTED_PREFIXES: [&str; 4] = ["51", "56", "58", "159"];

/// Find the listed proxy for a fund, if any.
///
/// An exchange-listed fund proxies itself; otherwise the fund name is
/// scanned against the keyword table, longest match first.
pub fn find_proxy(code: &str, name: &str) -> Option<String> {
    if LISTED_PREFIXES.iter().any(|p| code.starts_with(p)) {
        return Some(code.to_string());
    }

    let mut best_key = "";
    let mut best_code = None;
    for (key, proxy) in PROXY_MAP.iter() {
        if name.contains(key) && key.len() > best_key.len() {
            best_key = key;
            best_code = Some((*proxy).to_string());
        }
    }
    best_code
}
