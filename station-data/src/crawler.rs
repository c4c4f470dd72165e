use crate::error::{Error, Result};
use crate::progress;
use crate::route_page;
use crate::types::TrainRecord;
use indicatif::ProgressIterator;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/55.0.2883.87 Safari/537.36";

/// Route pages are served in GBK without declaring it.
const PAGE_ENCODING: &str = "gbk";

/// Outcome of a crawl batch: parsed trains and the identifiers that failed, both in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub trains: Vec<TrainRecord>,
    pub failed: Vec<String>,
}

impl CrawlReport {
    pub fn lines(&self) -> Vec<String> {
        self.trains.iter().map(TrainRecord::to_line).collect()
    }
}

pub struct RouteCrawler {
    client: Client,
    base_url: String,
}

impl RouteCrawler {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client, base_url })
    }

    pub fn page_url(&self, train: &str) -> String {
        format!(
            "{}/huoche/checi/{}.htm",
            self.base_url.trim_end_matches('/'),
            train
        )
    }

    /// Fetches one train's page and returns its stops in route order.
    pub async fn crawl_train(&self, train: &str) -> Result<TrainRecord> {
        let html = self.fetch_page(train).await?;
        let stations = route_page::parse_route_page(&html)?;
        debug!("Train {} has {} stops", train, stations.len());

        Ok(TrainRecord::new(train, stations))
    }

    /// Crawls each identifier in turn; a failing train is recorded and the batch moves on.
    pub async fn crawl_batch<S: AsRef<str>>(&self, trains: &[S]) -> CrawlReport {
        let mut report = CrawlReport::default();

        for train in trains
            .iter()
            .progress_with_style(progress::style())
            .with_message("Crawling routes")
        {
            let train = train.as_ref();
            match self.crawl_train(train).await {
                Ok(record) => report.trains.push(record),
                Err(e) => {
                    warn!("Failed to crawl train {}: {}", train, e);
                    report.failed.push(train.to_string());
                }
            }
        }

        info!(
            "Crawled {} train(s), {} failed",
            report.trains.len(),
            report.failed.len()
        );
        report
    }

    async fn fetch_page(&self, train: &str) -> Result<String> {
        let url = self.page_url(train);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::InvalidResponse(format!(
                "HTTP {} for url={}",
                response.status(),
                url
            )));
        }

        let html = response.text_with_charset(PAGE_ENCODING).await?;
        debug!("Fetched route page {}, length: {}", url, html.len());

        Ok(html)
    }
}
