use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ROUTE_BASE_URL: &str = "https://www.jt2345.com";
pub const DEFAULT_AMAP_BASE_URL: &str = "https://restapi.amap.com";
pub const DEFAULT_BAIDU_BASE_URL: &str = "http://api.map.baidu.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub route_base_url: String,
    pub amap_base_url: String,
    pub amap_key: Option<String>,
    pub baidu_base_url: String,
    pub baidu_ak: Option<String>,
    pub data_dir: PathBuf,
    pub overrides_path: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let route_base_url =
            dotenvy::var("ROUTE_BASE_URL").unwrap_or_else(|_| DEFAULT_ROUTE_BASE_URL.to_string());
        let amap_base_url =
            dotenvy::var("AMAP_BASE_URL").unwrap_or_else(|_| DEFAULT_AMAP_BASE_URL.to_string());
        let baidu_base_url =
            dotenvy::var("BAIDU_BASE_URL").unwrap_or_else(|_| DEFAULT_BAIDU_BASE_URL.to_string());

        let amap_key = dotenvy::var("AMAP_KEY").ok().filter(|s| !s.is_empty());
        let baidu_ak = dotenvy::var("BAIDU_AK").ok().filter(|s| !s.is_empty());

        let data_dir = PathBuf::from(dotenvy::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let overrides_path = dotenvy::var("OVERRIDES_PATH")
            .map_or_else(|_| data_dir.join("overrides.csv"), PathBuf::from);

        let timeout_secs = dotenvy::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| Error::Config("Invalid HTTP_TIMEOUT_SECS".to_string()))?;

        Ok(Self {
            route_base_url,
            amap_base_url,
            amap_key,
            baidu_base_url,
            baidu_ak,
            data_dir,
            overrides_path,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn amap_key(&self) -> Result<&str> {
        self.amap_key
            .as_deref()
            .ok_or_else(|| Error::Config("AMAP_KEY is required".to_string()))
    }

    pub fn baidu_ak(&self) -> Result<&str> {
        self.baidu_ak
            .as_deref()
            .ok_or_else(|| Error::Config("BAIDU_AK is required".to_string()))
    }

    pub fn train_file(&self, category: &str) -> PathBuf {
        self.data_dir.join(format!("train_{category}.txt"))
    }

    pub fn failed_train_file(&self, category: &str) -> PathBuf {
        self.data_dir.join(format!("train_{category}_failed.txt"))
    }

    pub fn coordinates_file(&self) -> PathBuf {
        self.data_dir.join("coords.csv")
    }

    pub fn addresses_file(&self) -> PathBuf {
        self.data_dir.join("address.csv")
    }
}
