use crate::core::extractor::compile_selector;
use crate::domain::model::CsvOptions;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScrapeError};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ScrapeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    if path.ends_with('/') || path.ends_with('\\') {
        return Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path must name a file, not a directory".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// CSV 分隔符與引號只能是單一 ASCII 字元
pub fn validate_csv_char(field_name: &str, value: char) -> Result<u8> {
    if !value.is_ascii() || value == '\n' || value == '\r' {
        return Err(ScrapeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Must be a single ASCII character other than a line break".to_string(),
        });
    }
    Ok(value as u8)
}

pub fn validate_csv_options(options: &CsvOptions) -> Result<()> {
    validate_csv_char("delimiter", char::from(options.delimiter))?;
    validate_csv_char("quote", char::from(options.quote))?;

    if options.delimiter == options.quote {
        return Err(ScrapeError::InvalidConfigValueError {
            field: "quote".to_string(),
            value: (options.quote as char).to_string(),
            reason: "Quote character must differ from the delimiter".to_string(),
        });
    }

    if options.columns.is_empty() {
        return Err(ScrapeError::InvalidConfigValueError {
            field: "columns".to_string(),
            value: String::new(),
            reason: "At least one column is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for column in &options.columns {
        if !seen.insert(column) {
            return Err(ScrapeError::InvalidConfigValueError {
                field: "columns".to_string(),
                value: column.header().to_string(),
                reason: "Column listed more than once".to_string(),
            });
        }
    }

    Ok(())
}

/// 所有設定來源共用的檢查
pub fn validate_export_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("base_url", config.base_url())?;
    validate_path("destination_path", config.destination_path())?;
    validate_csv_options(&config.csv_options())?;
    validate_positive_number("timeout_secs", config.fetch_settings().timeout_secs, 1)?;

    let markup = config.site_markup();
    validate_positive_number("markup.max_pages", markup.max_pages as u64, 1)?;
    for selector in [
        &markup.listing,
        &markup.address,
        &markup.price,
        &markup.pagination,
    ]
    .into_iter()
    .chain(markup.link.as_ref())
    {
        compile_selector(selector)?;
    }

    if markup.price_format.thousands == markup.price_format.decimal {
        return Err(ScrapeError::InvalidConfigValueError {
            field: "markup.price_format".to_string(),
            value: markup.price_format.decimal.to_string(),
            reason: "Thousands and decimal separators must differ".to_string(),
        });
    }

    Ok(())
}
