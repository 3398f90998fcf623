//! Service configuration, read from flags or the environment.

use std::net::SocketAddr;

use clap::Parser;

use crate::summary::Presentation;

#[derive(Clone, Debug, Parser)]
#[command(name = "billsplit", about = "Shared bill ledger service")]
pub struct Config {
    /// MongoDB connection string.
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: String,

    #[arg(long, env = "BILLSPLIT_DATABASE", default_value = "BillSplit")]
    pub database: String,

    #[arg(long, env = "BILLSPLIT_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Symbol put in front of formatted amounts.
    #[arg(long, env = "BILLSPLIT_CURRENCY", default_value = "₹")]
    pub currency: String,

    /// Origins allowed by CORS. Any origin is allowed when none is given.
    #[arg(long = "allowed-origin", env = "BILLSPLIT_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn presentation(&self) -> Presentation {
        Presentation {
            currency: self.currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn applies_defaults() {
        let config =
            Config::try_parse_from(["billsplit", "--mongodb-uri", "mongodb://localhost:27017"])
                .unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "BillSplit");
        assert_eq!(config.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.presentation(), Presentation::default());
        assert!(config.allowed_origins.is_empty());
    }

    #[rstest]
    fn reads_overrides() {
        let config = Config::try_parse_from([
            "billsplit",
            "--mongodb-uri",
            "mongodb://db:27017",
            "--bind",
            "127.0.0.1:9000",
            "--currency",
            "$",
            "--allowed-origin",
            "https://a.example,https://b.example",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.presentation().currency, "$");
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
