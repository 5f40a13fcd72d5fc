use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

/// Single blocking GET of a page, strictly decoded as UTF-8.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        // The blocking client times out after 30s unless told otherwise
        let client = Client::builder()
            .timeout(config.timeout.map(Duration::from_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    pub fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("RequestFetcher: GET {}", url);
        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.bytes()?;
        debug!("RequestFetcher: received {} bytes", body.len());

        Ok(String::from_utf8(body.to_vec())?)
    }
}
