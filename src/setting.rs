use crate::{Error, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CARGO_PKG_VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// number of threads config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Thread {
    /// number of http server threads
    pub http: usize,
}

/// network config
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Network {
    /// server bind host
    pub host: String,
    /// server bind port
    pub port: u16,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Static payment routing used to render transfer instructions.
/// The recipient receives SBP transfers by phone number; there is no
/// payment processor in the loop.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Payment {
    /// display name of the receiving bank
    pub bank: String,
    /// recipient phone number the buyer transfers to
    pub phone: String,
    /// NSPK member id of the receiving bank, used in the SBP deep link
    pub sbp_bank_id: String,
}

impl Default for Payment {
    fn default() -> Self {
        Self {
            bank: "T-Bank".to_string(),
            phone: "+79179231812".to_string(),
            sbp_bank_id: "100000000111".to_string(),
        }
    }
}

/// a fixed-price privilege package
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// whole currency units
    pub price: i64,
}

fn default_packages() -> Vec<Package> {
    [("Starter", 99), ("VIP", 299), ("Premium", 599), ("Legend", 999)]
        .into_iter()
        .map(|(name, price)| Package {
            name: name.to_string(),
            price,
        })
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// database url
    /// https://www.sea-ql.org/SeaORM/docs/install-and-config/connection/
    pub db_url: String,

    /// the site url
    pub site: Option<String>,

    pub thread: Thread,
    pub network: Network,

    pub payment: Payment,

    /// package catalog; order creation validates name and price against it
    pub packages: Vec<Package>,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            db_url: "sqlite://donatebox.sqlite".to_string(),
            site: None,
            thread: Default::default(),
            network: Default::default(),
            payment: Default::default(),
            packages: default_packages(),
        }
    }
}

impl Setting {
    /// canonical catalog price for a package name
    pub fn package_price(&self, name: &str) -> Option<i64> {
        self.packages
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.price)
    }

    /// read config from file and env
    pub fn read<P: AsRef<Path>>(file: P, env_prefix: Option<String>) -> Result<Self> {
        let builder = Config::builder();
        let mut config = builder
            // override with file contents
            .add_source(File::with_name(file.as_ref().to_str().unwrap()));
        if let Some(prefix) = env_prefix {
            config = config.add_source(Self::env_source(&prefix));
        }

        let config = config.build()?;
        let setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn env_source(prefix: &str) -> Environment {
        Environment::with_prefix(prefix)
            .try_parsing(true)
            .prefix_separator("_")
            .separator("__")
    }

    /// read config from env
    pub fn from_env(env_prefix: String) -> Result<Self> {
        let mut config = Config::builder();
        config = config.add_source(Self::env_source(&env_prefix));

        let config = config.build()?;
        let setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    /// config from str
    pub fn from_str(s: &str, format: FileFormat) -> Result<Self> {
        let builder = Config::builder();
        let config = builder.add_source(File::from_str(s, format)).build()?;
        let setting: Setting = config.try_deserialize()?;
        setting.validate()?;
        Ok(setting)
    }

    fn validate(&self) -> Result<()> {
        if self.packages.is_empty() {
            return Err(Error::Message("the package catalog is empty".to_owned()));
        }
        for (i, p) in self.packages.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(Error::Message(format!("package {} has an empty name", i)));
            }
            if p.price <= 0 {
                return Err(Error::Message(format!(
                    "package {:?} has non-positive price {}",
                    p.name, p.price
                )));
            }
            if self.packages[..i].iter().any(|o| o.name == p.name) {
                return Err(Error::Message(format!(
                    "duplicate package name {:?}",
                    p.name
                )));
            }
        }
        Ok(())
    }
}
