//! 字串清理。全部是純函式且具冪等性：清理過的結果再清理一次不會改變。

use crate::domain::model::{Price, PriceFormat};

/// 去除前後空白並把連續空白壓成單一空格
pub fn clean_address(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 把價格文字整理成只有數字 (以及必要時一個小數點符號) 的字串。
///
/// 只取第一段數字，因此 `€`、`k.k.`、`v.o.n.` 之類的前後綴都會被丟掉；
/// 千分位符號移除，小數部分去掉結尾的 0。沒有任何數字時回傳空字串。
pub fn clean_price(raw: &str, format: PriceFormat) -> String {
    let Some(start) = raw.find(|c: char| c.is_ascii_digit()) else {
        return String::new();
    };

    let run: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == format.thousands || *c == format.decimal)
        .collect();

    let (whole, fraction) = run.split_once(format.decimal).unwrap_or((run.as_str(), ""));

    let whole: String = whole.chars().filter(char::is_ascii_digit).collect();
    let fraction: String = fraction.chars().filter(char::is_ascii_digit).collect();
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole
    } else {
        format!("{}{}{}", whole, format.decimal, fraction)
    }
}

/// `clean_price` + `Price::parse`；`None` 表示沒有標價
pub fn price_from_text(raw: &str, format: PriceFormat) -> Option<Price> {
    Price::parse(&clean_price(raw, format), format)
}
