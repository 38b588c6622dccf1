use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 房屋售價；整數與小數部分各自以整數保存，大額價格也不會失去精度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price {
    whole: u128,
    /// 小數部分的數字，不含結尾的 0
    fraction: u64,
    fraction_digits: u32,
}

impl Price {
    /// 解析 `clean_price` 的輸出；空字串代表沒有價格
    pub fn parse(cleaned: &str, format: PriceFormat) -> Option<Self> {
        let (whole, fraction) = cleaned
            .split_once(format.decimal)
            .unwrap_or((cleaned, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return None;
        }

        let fraction = fraction.trim_end_matches('0');
        Some(Self {
            whole: whole.parse().ok()?,
            fraction: if fraction.is_empty() {
                0
            } else {
                fraction.parse().ok()?
            },
            fraction_digits: u32::try_from(fraction.len()).ok()?,
        })
    }

    /// 近似的浮點數值，只用於比較或計算，輸出請用 `Display`
    pub fn amount(&self) -> f64 {
        self.whole as f64 + self.fraction as f64 / 10f64.powi(self.fraction_digits as i32)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.whole)?;
        if self.fraction_digits > 0 {
            write!(
                f,
                ".{:0width$}",
                self.fraction,
                width = self.fraction_digits as usize
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub address: String,
    pub price: Option<Price>,
    pub url: Option<String>,
}

impl PriceRow {
    /// 依欄位順序輸出 CSV 欄位值；沒有價格時輸出空欄位
    pub fn field(&self, column: Column) -> String {
        match column {
            Column::Address => self.address.clone(),
            Column::Price => self.price.map(|p| p.to_string()).unwrap_or_default(),
            Column::Url => self.url.clone().unwrap_or_default(),
        }
    }
}

/// 一筆搜尋結果的 HTML 片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFragment {
    pub html: String,
    pub page_url: String,
    /// 在該頁中的位置 (從 1 起算)
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFormat {
    pub thousands: char,
    pub decimal: char,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            thousands: '.',
            decimal: ',',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Address,
    Price,
    Url,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Price => "price",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "address" => Ok(Self::Address),
            "price" => Ok(Self::Price),
            "url" => Ok(Self::Url),
            other => Err(format!("unknown column '{}' (expected address, price or url)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quoting {
    #[default]
    All,
    Necessary,
    NonNumeric,
    Never,
}

impl Quoting {
    pub fn quote_style(&self) -> csv::QuoteStyle {
        match self {
            Self::All => csv::QuoteStyle::Always,
            Self::Necessary => csv::QuoteStyle::Necessary,
            Self::NonNumeric => csv::QuoteStyle::NonNumeric,
            Self::Never => csv::QuoteStyle::Never,
        }
    }
}

impl FromStr for Quoting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Self::All),
            "necessary" | "minimal" => Ok(Self::Necessary),
            "non_numeric" => Ok(Self::NonNumeric),
            "never" | "none" => Ok(Self::Never),
            other => Err(format!(
                "unknown quoting policy '{}' (expected all, necessary, non_numeric or never)",
                other
            )),
        }
    }
}

/// CSV 輸出格式：分隔符、引號字元、引號策略與欄位順序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote: u8,
    pub quoting: Quoting,
    pub columns: Vec<Column>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            quoting: Quoting::All,
            columns: vec![Column::Address, Column::Price],
        }
    }
}

/// 單筆片段解析失敗時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    #[default]
    Abort,
    #[serde(alias = "skip")]
    SkipMalformed,
}

/// 所有頁面抓取與切分後的結果
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub pages_visited: usize,
    pub fragments: Vec<ListingFragment>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub rows: Vec<PriceRow>,
    /// 在 SkipMalformed 模式下被略過的片段數
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub destination: String,
    pub pages_visited: usize,
    pub rows_written: usize,
    pub rows_skipped: usize,
}
