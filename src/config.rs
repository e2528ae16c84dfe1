use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use std::path::PathBuf;

pub struct ConfigurationKey {
    pub variable_name: &'static str,
}

const PAGE_KEY: ConfigurationKey = ConfigurationKey {
    variable_name: "PORTFOLIO_PAGE",
};
const BASE_URL_KEY: ConfigurationKey = ConfigurationKey {
    variable_name: "PORTFOLIO_BASE_URL",
};
const DATA_KEY: ConfigurationKey = ConfigurationKey {
    variable_name: "PORTFOLIO_DATA",
};
const OUTPUT_KEY: ConfigurationKey = ConfigurationKey {
    variable_name: "PORTFOLIO_OUTPUT",
};

const DEFAULT_PAGE: &str = "index.html";
pub const DEFAULT_DATA: &str = "./data.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTML shell to open.
    pub page: PathBuf,
    /// Url relative paths are resolved against, defaults to the page's file url.
    pub base_url: Option<Url>,
    /// Portfolio document, relative to the page.
    pub data: String,
    /// Rendered page destination, stdout when unset.
    pub output: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |key: ConfigurationKey| {
            lookup(key.variable_name).filter(|it| !it.trim().is_empty())
        };
        let base_url = value(BASE_URL_KEY)
            .map(|it| {
                Url::parse(&it).with_context(|| {
                    format!("{} must be an absolute url", BASE_URL_KEY.variable_name)
                })
            })
            .transpose()?;
        Ok(Self {
            page: PathBuf::from(value(PAGE_KEY).unwrap_or_else(|| DEFAULT_PAGE.to_string())),
            base_url,
            data: value(DATA_KEY).unwrap_or_else(|| DEFAULT_DATA.to_string()),
            output: value(OUTPUT_KEY).map(PathBuf::from),
        })
    }

    pub async fn page_url(&self) -> Result<Url> {
        if let Some(ref url) = self.base_url {
            return Ok(url.clone());
        }
        let path = tokio::fs::canonicalize(&self.page)
            .await
            .with_context(|| format!("failed to resolve page {}", self.page.display()))?;
        Url::from_file_path(&path).map_err(|_| anyhow!("{} has no file url", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(PathBuf::from("index.html"), config.page);
        assert_eq!(None, config.base_url);
        assert_eq!("./data.json", config.data);
        assert_eq!(None, config.output);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORTFOLIO_PAGE", "site/index.html"),
            ("PORTFOLIO_BASE_URL", "https://me.example.com/"),
            ("PORTFOLIO_DATA", "../data.json"),
            ("PORTFOLIO_OUTPUT", "out.html"),
        ])
        .unwrap();
        assert_eq!(PathBuf::from("site/index.html"), config.page);
        assert_eq!(
            Some(Url::parse("https://me.example.com/").unwrap()),
            config.base_url
        );
        assert_eq!("../data.json", config.data);
        assert_eq!(Some(PathBuf::from("out.html")), config.output);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config(&[("PORTFOLIO_DATA", "  "), ("PORTFOLIO_OUTPUT", "")]).unwrap();
        assert_eq!("./data.json", config.data);
        assert_eq!(None, config.output);
    }

    #[test]
    fn test_relative_base_url_is_rejected() {
        assert!(config(&[("PORTFOLIO_BASE_URL", "portfolio/")]).is_err());
    }

    #[tokio::test]
    async fn test_page_url_prefers_base_url() {
        let config = config(&[("PORTFOLIO_BASE_URL", "https://me.example.com/")]).unwrap();
        assert_eq!(
            "https://me.example.com/",
            config.page_url().await.unwrap().as_str()
        );
    }

    #[tokio::test]
    async fn test_page_url_of_missing_page() {
        let config = config(&[("PORTFOLIO_PAGE", "does/not/exist.html")]).unwrap();
        assert!(config.page_url().await.is_err());
    }
}
