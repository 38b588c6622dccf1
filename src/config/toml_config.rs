use crate::domain::markup::SiteMarkup;
use crate::domain::model::{Column, CsvOptions, ErrorPolicy, Quoting};
use crate::domain::ports::{ConfigProvider, FetchSettings};
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{validate_csv_char, validate_export_settings, Validate};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub markup: SiteMarkup,
    pub output: OutputConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub delimiter: Option<char>,
    pub quote: Option<char>,
    pub quoting: Option<Quoting>,
    pub columns: Option<Vec<Column>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub on_malformed: ErrorPolicy,
    #[serde(default)]
    pub monitor: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| ScrapeError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${FUNDA_CITY})；找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ScrapeError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.run.monitor
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.source.base_url
    }

    fn destination_path(&self) -> &str {
        &self.output.path
    }

    fn csv_options(&self) -> CsvOptions {
        let defaults = CsvOptions::default();
        CsvOptions {
            delimiter: self
                .output
                .delimiter
                .and_then(|c| u8::try_from(c).ok())
                .unwrap_or(defaults.delimiter),
            quote: self
                .output
                .quote
                .and_then(|c| u8::try_from(c).ok())
                .unwrap_or(defaults.quote),
            quoting: self.output.quoting.unwrap_or(defaults.quoting),
            columns: self.output.columns.clone().unwrap_or(defaults.columns),
        }
    }

    fn site_markup(&self) -> SiteMarkup {
        self.markup.clone()
    }

    fn fetch_settings(&self) -> FetchSettings {
        let defaults = FetchSettings::default();
        FetchSettings {
            timeout_secs: self.source.timeout_seconds.unwrap_or(defaults.timeout_secs),
            user_agent: self
                .source
                .user_agent
                .clone()
                .unwrap_or(defaults.user_agent),
            headers: self.source.headers.clone().unwrap_or_default(),
        }
    }

    fn error_policy(&self) -> ErrorPolicy {
        self.run.on_malformed
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(delimiter) = self.output.delimiter {
            validate_csv_char("output.delimiter", delimiter)?;
        }
        if let Some(quote) = self.output.quote {
            validate_csv_char("output.quote", quote)?;
        }
        validate_export_settings(self)
    }
}
