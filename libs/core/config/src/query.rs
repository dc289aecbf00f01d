use crate::{ConfigError, FromEnv, env_or_default, env_parse_or};

pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const DEFAULT_MAX_PAGE_LIMIT: u64 = 350;
pub const DEFAULT_SEARCH_INDEX: &str = "product-search";

/// Pagination and search settings for list endpoints
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    /// Page size when the request has no `limit`
    pub page_limit_default: u64,
    /// Largest accepted `limit`
    pub page_limit_max: u64,
    /// Atlas Search index used for `q`
    pub product_search_index: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_limit_default: DEFAULT_PAGE_LIMIT,
            page_limit_max: DEFAULT_MAX_PAGE_LIMIT,
            product_search_index: DEFAULT_SEARCH_INDEX.to_string(),
        }
    }
}

impl FromEnv for QueryConfig {
    /// Reads from environment variables:
    /// - PAGE_LIMIT_DEFAULT: defaults to 20
    /// - PAGE_LIMIT_MAX: defaults to 350
    /// - PRODUCT_SEARCH_INDEX: defaults to "product-search"
    fn from_env() -> Result<Self, ConfigError> {
        let page_limit_default = env_parse_or("PAGE_LIMIT_DEFAULT", DEFAULT_PAGE_LIMIT)?;
        let page_limit_max = env_parse_or("PAGE_LIMIT_MAX", DEFAULT_MAX_PAGE_LIMIT)?;

        if page_limit_default == 0 || page_limit_default > page_limit_max {
            return Err(ConfigError::ParseError {
                key: "PAGE_LIMIT_DEFAULT".to_string(),
                details: format!("must be between 1 and PAGE_LIMIT_MAX ({page_limit_max})"),
            });
        }

        Ok(Self {
            page_limit_default,
            page_limit_max,
            product_search_index: env_or_default("PRODUCT_SEARCH_INDEX", DEFAULT_SEARCH_INDEX),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 3] = ["PAGE_LIMIT_DEFAULT", "PAGE_LIMIT_MAX", "PRODUCT_SEARCH_INDEX"];

    #[test]
    fn test_query_config_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let config = QueryConfig::from_env().unwrap();
            assert_eq!(config, QueryConfig::default());
            assert_eq!(config.page_limit_default, 20);
            assert_eq!(config.page_limit_max, 350);
            assert_eq!(config.product_search_index, "product-search");
        });
    }

    #[test]
    fn test_query_config_custom_values() {
        temp_env::with_vars(
            [
                ("PAGE_LIMIT_DEFAULT", Some("10")),
                ("PAGE_LIMIT_MAX", Some("100")),
                ("PRODUCT_SEARCH_INDEX", Some("catalog")),
            ],
            || {
                let config = QueryConfig::from_env().unwrap();
                assert_eq!(config.page_limit_default, 10);
                assert_eq!(config.page_limit_max, 100);
                assert_eq!(config.product_search_index, "catalog");
            },
        );
    }

    #[test]
    fn test_query_config_rejects_default_above_max() {
        temp_env::with_vars(
            [("PAGE_LIMIT_DEFAULT", Some("500")), ("PAGE_LIMIT_MAX", None)],
            || {
                let err = QueryConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("PAGE_LIMIT_DEFAULT"));
            },
        );
    }

    #[test]
    fn test_query_config_rejects_garbage() {
        temp_env::with_vars(
            [("PAGE_LIMIT_DEFAULT", None), ("PAGE_LIMIT_MAX", Some("lots"))],
            || {
                let err = QueryConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("PAGE_LIMIT_MAX"));
            },
        );
    }
}
