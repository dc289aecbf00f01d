//! Configuration for Marketplace API

use core_config::{app_info, query::QueryConfig, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub query: QueryConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let query = QueryConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            query,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_mongodb_url() {
        temp_env::with_vars_unset(["MONGODB_URL", "MONGO_URL"], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("marketplace_test")),
                ("PORT", Some("9090")),
                ("PAGE_LIMIT_DEFAULT", Some("15")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.database(), "marketplace_test");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.query.page_limit_default, 15);
                assert_eq!(config.app.name, "marketplace_api");
            },
        );
    }
}
